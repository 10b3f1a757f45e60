//! HTTP implementation of `EspApi` over reqwest
//!
//! Each call carries `Authorization: Bearer <key>` plus a fresh
//! `x-request-id`. Non-success statuses become `Error::Remote` with the raw
//! body; anything that prevents a decoded response becomes a transport-class
//! error.

use std::time::Duration;

use reqwest::{RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::types::*;
use crate::{ApiKey, BoxFuture, EspApi};

/// Production API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.esp.example.com";

/// Version prefix prepended to every path.
const API_VERSION: &str = "v1";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// reqwest-backed ESP client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpEspClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpEspClient {
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| Error::Url(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Url(format!("{base_url} cannot be used as an API root")));
        }
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Build `<base>/v1/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .push(API_VERSION)
            .extend(segments);
        Ok(url)
    }

    async fn get<T>(
        &self,
        operation: &'static str,
        key: &ApiKey,
        segments: &[&str],
        range: Option<&DateRange>,
    ) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let mut request = self.client.get(self.endpoint(segments)?);
        if let Some(range) = range {
            request = request.query(range);
        }
        self.execute(operation, key, request).await
    }

    async fn post<B, T>(
        &self,
        operation: &'static str,
        key: &ApiKey,
        segments: &[&str],
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let request = self.client.post(self.endpoint(segments)?).json(body);
        self.execute(operation, key, request).await
    }

    async fn list<T>(&self, operation: &'static str, key: &ApiKey, segments: &[&str]) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let list: ListResponse<T> = self.get(operation, key, segments, None).await?;
        Ok(list.data)
    }

    #[instrument(skip_all, fields(operation = operation))]
    async fn execute<T>(
        &self,
        operation: &'static str,
        key: &ApiKey,
        request: RequestBuilder,
    ) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let request_id = format!("req_{}", uuid::Uuid::new_v4().as_simple());

        let response = request
            .bearer_auth(key.expose())
            .header(REQUEST_ID_HEADER, &request_id)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                record_request(operation, "transport".to_string());
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                Error::Transport(format!("{operation} request {kind}: {e}"))
            })?;

        let status = response.status();
        record_request(operation, status.as_u16().to_string());

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            warn!(%request_id, status = status.as_u16(), "ESP rejected request");
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%request_id, status = status.as_u16(), "ESP request succeeded");
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Decode(format!("{operation}: {e}")))
    }
}

fn record_request(operation: &'static str, status: String) {
    metrics::counter!("esp_requests_total", "operation" => operation, "status" => status)
        .increment(1);
}

impl EspApi for HttpEspClient {
    fn create_sub_account<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateSubAccountRequest,
    ) -> BoxFuture<'a, Result<SubAccount>> {
        Box::pin(self.post("create_sub_account", key, &["subaccounts"], request))
    }

    fn list_sub_accounts<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<SubAccount>>> {
        Box::pin(self.list("list_sub_accounts", key, &["subaccounts"]))
    }

    fn create_webhook<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateWebhookRequest,
    ) -> BoxFuture<'a, Result<Webhook>> {
        Box::pin(self.post("create_webhook", key, &["webhooks"], request))
    }

    fn list_webhooks<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<Webhook>>> {
        Box::pin(self.list("list_webhooks", key, &["webhooks"]))
    }

    fn create_domain<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateDomainRequest,
    ) -> BoxFuture<'a, Result<Domain>> {
        Box::pin(self.post("create_domain", key, &["domains"], request))
    }

    fn list_domains<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<Domain>>> {
        Box::pin(self.list("list_domains", key, &["domains"]))
    }

    fn list_dedicated_ips<'a>(
        &'a self,
        key: &'a ApiKey,
    ) -> BoxFuture<'a, Result<Vec<DedicatedIp>>> {
        Box::pin(self.list("list_dedicated_ips", key, &["ips"]))
    }

    fn create_ip_pool<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateIpPoolRequest,
    ) -> BoxFuture<'a, Result<IpPool>> {
        Box::pin(self.post("create_ip_pool", key, &["ip-pools"], request))
    }

    fn list_ip_pools<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<IpPool>>> {
        Box::pin(self.list("list_ip_pools", key, &["ip-pools"]))
    }

    fn send_email<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a SendEmailRequest,
    ) -> BoxFuture<'a, Result<SendEmailResponse>> {
        Box::pin(self.post("send_email", key, &["emails"], request))
    }

    fn sub_account_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        sub_account_id: &'a str,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<Vec<DailyStats>>> {
        Box::pin(async move {
            let list: ListResponse<DailyStats> = self
                .get(
                    "sub_account_stats",
                    key,
                    &["stats", "subaccounts", sub_account_id],
                    Some(range),
                )
                .await?;
            Ok(list.data)
        })
    }

    fn sub_account_aggregate_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        sub_account_id: &'a str,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<StatsCounters>> {
        Box::pin(async move {
            self.get(
                "sub_account_aggregate_stats",
                key,
                &["stats", "subaccounts", sub_account_id, "aggregate"],
                Some(range),
            )
            .await
        })
    }

    fn account_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<Vec<DailyStats>>> {
        Box::pin(async move {
            let list: ListResponse<DailyStats> =
                self.get("account_stats", key, &["stats"], Some(range)).await?;
            Ok(list.data)
        })
    }

    fn message_details<'a>(
        &'a self,
        key: &'a ApiKey,
        message_id: &'a str,
    ) -> BoxFuture<'a, Result<MessageDetails>> {
        Box::pin(async move {
            self.get("message_details", key, &["messages", message_id], None)
                .await
        })
    }
}
