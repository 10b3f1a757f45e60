//! Request and response bodies for the ESP HTTP API
//!
//! All bodies use camelCase field names on the wire. Response types default
//! optional fields so a sparse reply from the service still decodes.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::ops::AddAssign;

use common::Secret;
use serde::{Deserialize, Serialize};

/// Envelope for every list endpoint: `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

// --- Sub-accounts ---

#[derive(Debug, Clone, Serialize)]
pub struct CreateSubAccountRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Only returned on creation and by some listing endpoints
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// --- Webhooks ---

/// Per-event subscription flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookEvents {
    pub processed: bool,
    pub delivered: bool,
    pub dropped: bool,
    pub soft_bounced: bool,
    pub hard_bounced: bool,
    pub opened: bool,
    pub clicked: bool,
    pub unsubscribed: bool,
    pub marked_as_spam: bool,
}

impl WebhookEvents {
    /// Subscribe to every delivery and engagement event.
    pub fn all() -> Self {
        Self {
            processed: true,
            delivered: true,
            dropped: true,
            soft_bounced: true,
            hard_bounced: true,
            opened: true,
            clicked: true,
            unsubscribed: true,
            marked_as_spam: true,
        }
    }

    /// Names of the subscribed events, in declaration order.
    pub fn subscribed(&self) -> Vec<&'static str> {
        [
            (self.processed, "processed"),
            (self.delivered, "delivered"),
            (self.dropped, "dropped"),
            (self.soft_bounced, "soft_bounced"),
            (self.hard_bounced, "hard_bounced"),
            (self.opened, "opened"),
            (self.clicked, "clicked"),
            (self.unsubscribed, "unsubscribed"),
            (self.marked_as_spam, "marked_as_spam"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWebhookRequest {
    pub url: String,
    pub enabled: bool,
    pub events: WebhookEvents,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub events: WebhookEvents,
}

// --- Domains ---

#[derive(Debug, Clone, Serialize)]
pub struct CreateDomainRequest {
    pub domain: String,
}

/// A DNS record the domain owner must publish before sending is authorized.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub host: String,
    pub value: String,
    /// e.g. "dkim", "spf", "return_path"
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub domain: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub dns_records: Vec<DnsRecord>,
}

// --- Dedicated IPs and pools ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedicatedIp {
    pub ip: String,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub warmup_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    RoundRobin,
    Weighted,
}

/// What the service does once every pool member is at its sending limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowStrategy {
    None,
    SharedPool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIpPoolRequest {
    pub name: String,
    pub ips: Vec<String>,
    pub routing_strategy: RoutingStrategy,
    /// Warm-up ramp in hours; the service rejects zero
    pub warmup_interval: NonZeroU32,
    pub overflow_strategy: OverflowStrategy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpPool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub routing_strategy: Option<RoutingStrategy>,
    #[serde(default)]
    pub warmup_interval: Option<u32>,
    #[serde(default)]
    pub overflow_strategy: Option<OverflowStrategy>,
}

// --- Email ---

#[derive(Debug, Clone, Serialize)]
pub struct EmailAddress {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Merge fields substituted into this recipient's copy
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Tracking {
    pub opens: bool,
    pub clicks: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub from: EmailAddress,
    pub to: Vec<Recipient>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub tracking: Tracking,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_pool: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub message_id: String,
}

// --- Statistics ---

/// Inclusive calendar-date range, `YYYY-MM-DD` on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

/// Named delivery counters. `opens`/`clicks` are only reported account-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsCounters {
    pub processed: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub hard_bounced: u64,
    pub soft_bounced: u64,
    pub unsubscribed: u64,
    pub spam: u64,
    pub opens: Option<u64>,
    pub clicks: Option<u64>,
}

impl AddAssign<&StatsCounters> for StatsCounters {
    fn add_assign(&mut self, rhs: &StatsCounters) {
        self.processed = self.processed.saturating_add(rhs.processed);
        self.delivered = self.delivered.saturating_add(rhs.delivered);
        self.dropped = self.dropped.saturating_add(rhs.dropped);
        self.hard_bounced = self.hard_bounced.saturating_add(rhs.hard_bounced);
        self.soft_bounced = self.soft_bounced.saturating_add(rhs.soft_bounced);
        self.unsubscribed = self.unsubscribed.saturating_add(rhs.unsubscribed);
        self.spam = self.spam.saturating_add(rhs.spam);
        self.opens = add_optional(self.opens, rhs.opens);
        self.clicks = add_optional(self.clicks, rhs.clicks);
    }
}

/// Absent on both sides stays absent; otherwise missing counts as zero.
/// Sums saturate at `u64::MAX`.
fn add_optional(lhs: Option<u64>, rhs: Option<u64>) -> Option<u64> {
    match (lhs, rhs) {
        (None, None) => None,
        (l, r) => Some(l.unwrap_or(0).saturating_add(r.unwrap_or(0))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DailyStats {
    pub date: String,
    #[serde(flatten)]
    pub counters: StatsCounters,
}

// --- Messages ---

#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDetails {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub events: Vec<MessageEvent>,
}
