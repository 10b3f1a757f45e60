//! Literal values the workflow sends: addresses, domain, webhook target

use std::num::NonZeroU32;
use std::time::Duration;

/// Inputs supplied at process start. Steps read these, never write them.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
    pub domain: String,
    pub webhook_url: String,
    /// When set, a sub-account with this name is created before listing.
    pub sub_account_name: Option<String>,
    /// Pool names are `<prefix>-<random suffix>` so reruns don't collide.
    pub ip_pool_prefix: String,
    pub warmup_interval_hours: NonZeroU32,
    /// Wait before message lookup so the message store can catch up.
    pub message_lookup_delay: Duration,
}

pub const DEFAULT_WARMUP_INTERVAL_HOURS: NonZeroU32 = NonZeroU32::new(24).unwrap();

pub const DEFAULT_MESSAGE_LOOKUP_DELAY: Duration = Duration::from_secs(5);

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            from_email: "sender@example.com".into(),
            from_name: "ESP Workflow Demo".into(),
            to_email: "recipient@example.com".into(),
            domain: "mail.example.com".into(),
            webhook_url: "https://example.com/webhooks/esp".into(),
            sub_account_name: None,
            ip_pool_prefix: "demo-pool".into(),
            warmup_interval_hours: DEFAULT_WARMUP_INTERVAL_HOURS,
            message_lookup_delay: DEFAULT_MESSAGE_LOOKUP_DELAY,
        }
    }
}
