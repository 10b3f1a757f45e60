//! In-memory `EspApi` for driver and step tests

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use esp_client::{
    ApiKey, BoxFuture, CreateDomainRequest, CreateIpPoolRequest, CreateSubAccountRequest,
    CreateWebhookRequest, DailyStats, DateRange, DedicatedIp, DnsRecord, Domain, EspApi, IpPool,
    MessageDetails, MessageEvent, Result, SendEmailRequest, SendEmailResponse, StatsCounters,
    SubAccount, Webhook,
};

/// One recorded call: operation, bearer key used and an op-specific detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub key: String,
    pub detail: Option<String>,
}

#[derive(Default)]
pub struct StubEsp {
    calls: Mutex<Vec<Call>>,
    sub_accounts: Vec<String>,
    ips: Vec<String>,
    message_ids: Mutex<VecDeque<String>>,
    rejected: HashSet<&'static str>,
    unreachable: HashSet<&'static str>,
    reject_all: bool,
}

impl StubEsp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sub_accounts(mut self, ids: &[&str]) -> Self {
        self.sub_accounts = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_ips(mut self, ips: &[&str]) -> Self {
        self.ips = ips.iter().map(|ip| ip.to_string()).collect();
        self
    }

    /// Ids handed out by successive `send_email` calls.
    pub fn with_message_ids(self, ids: &[&str]) -> Self {
        *self.message_ids.lock().unwrap() = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn rejecting(mut self, op: &'static str) -> Self {
        self.rejected.insert(op);
        self
    }

    pub fn rejecting_everything(mut self) -> Self {
        self.reject_all = true;
        self
    }

    pub fn unreachable(mut self, op: &'static str) -> Self {
        self.unreachable.insert(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, op: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|call| call.op == op).collect()
    }

    fn respond<'a, T: Send + 'a>(
        &'a self,
        op: &'static str,
        key: &ApiKey,
        detail: Option<String>,
        value: impl FnOnce() -> T,
    ) -> BoxFuture<'a, Result<T>> {
        self.calls.lock().unwrap().push(Call {
            op,
            key: key.expose().clone(),
            detail,
        });

        let result = if self.unreachable.contains(op) {
            Err(esp_client::Error::Transport("connection refused".into()))
        } else if self.reject_all || self.rejected.contains(op) {
            Err(esp_client::Error::Remote {
                status: 422,
                body: format!(r#"{{"error":"{op} rejected"}}"#),
            })
        } else {
            Ok(value())
        };
        Box::pin(async move { result })
    }
}

fn range_detail(range: &DateRange) -> String {
    format!("{}..{}", range.from, range.to)
}

fn one_day(range: &DateRange) -> Vec<DailyStats> {
    vec![DailyStats {
        date: range.to.clone(),
        counters: StatsCounters {
            processed: 2,
            delivered: 1,
            ..StatsCounters::default()
        },
    }]
}

impl EspApi for StubEsp {
    fn create_sub_account<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateSubAccountRequest,
    ) -> BoxFuture<'a, Result<SubAccount>> {
        self.respond("create_sub_account", key, Some(request.name.clone()), || {
            SubAccount {
                id: "acc_created".into(),
                name: request.name.clone(),
                api_key: Some("sk-created".into()),
                created_at: None,
            }
        })
    }

    fn list_sub_accounts<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<SubAccount>>> {
        self.respond("list_sub_accounts", key, None, || {
            self.sub_accounts
                .iter()
                .map(|id| SubAccount {
                    id: id.clone(),
                    name: format!("{id}-name"),
                    api_key: None,
                    created_at: None,
                })
                .collect()
        })
    }

    fn create_webhook<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateWebhookRequest,
    ) -> BoxFuture<'a, Result<Webhook>> {
        self.respond("create_webhook", key, Some(request.url.clone()), || Webhook {
            id: "wh_1".into(),
            url: request.url.clone(),
            enabled: request.enabled,
            events: request.events.clone(),
        })
    }

    fn list_webhooks<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<Webhook>>> {
        self.respond("list_webhooks", key, None, Vec::new)
    }

    fn create_domain<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateDomainRequest,
    ) -> BoxFuture<'a, Result<Domain>> {
        self.respond("create_domain", key, Some(request.domain.clone()), || Domain {
            id: "dom_1".into(),
            domain: request.domain.clone(),
            verified: false,
            dns_records: vec![DnsRecord {
                kind: "TXT".into(),
                host: format!("esp._domainkey.{}", request.domain),
                value: "k=rsa; p=MIGf".into(),
                purpose: Some("dkim".into()),
            }],
        })
    }

    fn list_domains<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<Domain>>> {
        self.respond("list_domains", key, None, Vec::new)
    }

    fn list_dedicated_ips<'a>(
        &'a self,
        key: &'a ApiKey,
    ) -> BoxFuture<'a, Result<Vec<DedicatedIp>>> {
        self.respond("list_dedicated_ips", key, None, || {
            self.ips
                .iter()
                .map(|ip| DedicatedIp {
                    ip: ip.clone(),
                    pool: None,
                    warmup_complete: true,
                })
                .collect()
        })
    }

    fn create_ip_pool<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateIpPoolRequest,
    ) -> BoxFuture<'a, Result<IpPool>> {
        self.respond("create_ip_pool", key, Some(request.ips.join(",")), || IpPool {
            id: "pool_1".into(),
            name: request.name.clone(),
            ips: request.ips.clone(),
            routing_strategy: Some(request.routing_strategy),
            warmup_interval: Some(request.warmup_interval.get()),
            overflow_strategy: Some(request.overflow_strategy),
        })
    }

    fn list_ip_pools<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<IpPool>>> {
        self.respond("list_ip_pools", key, None, Vec::new)
    }

    fn send_email<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a SendEmailRequest,
    ) -> BoxFuture<'a, Result<SendEmailResponse>> {
        self.respond("send_email", key, request.ip_pool.clone(), || {
            let message_id = self
                .message_ids
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "m-default".into());
            SendEmailResponse { message_id }
        })
    }

    fn sub_account_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        sub_account_id: &'a str,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<Vec<DailyStats>>> {
        let detail = format!("{sub_account_id} {}", range_detail(range));
        self.respond("sub_account_stats", key, Some(detail), || one_day(range))
    }

    fn sub_account_aggregate_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        sub_account_id: &'a str,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<StatsCounters>> {
        let detail = format!("{sub_account_id} {}", range_detail(range));
        self.respond("sub_account_aggregate_stats", key, Some(detail), || {
            StatsCounters {
                processed: 2,
                delivered: 1,
                ..StatsCounters::default()
            }
        })
    }

    fn account_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<Vec<DailyStats>>> {
        self.respond("account_stats", key, Some(range_detail(range)), || {
            one_day(range)
        })
    }

    fn message_details<'a>(
        &'a self,
        key: &'a ApiKey,
        message_id: &'a str,
    ) -> BoxFuture<'a, Result<MessageDetails>> {
        self.respond("message_details", key, Some(message_id.to_string()), || {
            MessageDetails {
                id: message_id.to_string(),
                status: Some("delivered".into()),
                from: None,
                to: None,
                subject: None,
                created_at: None,
                events: vec![MessageEvent {
                    kind: "delivered".into(),
                    timestamp: None,
                }],
            }
        })
    }
}
