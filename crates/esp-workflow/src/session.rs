//! Session state accumulated across one run
//!
//! Writers and readers per field:
//!
//! | field | written by | read by |
//! |---|---|---|
//! | `sub_account_id` | create/list sub-account | statistics steps |
//! | `sub_account_api_key` | create/list sub-account | nobody downstream |
//! | `webhook_id` | create webhook | informational |
//! | `domain_id` | add domain | informational |
//! | `dedicated_ips` | list dedicated IPs | create IP pool |
//! | `ip_pool_id` / `ip_pool_name` | create IP pool | both send steps |
//! | `sent_message_id` | either send step, first writer wins | message details |
//!
//! Steps only ever see `&Session`; the driver applies their `SessionUpdate`
//! after a successful call. Nothing is cleared once set.

use common::Secret;

#[derive(Debug, Default)]
pub struct Session {
    sub_account_id: Option<String>,
    sub_account_api_key: Option<Secret<String>>,
    webhook_id: Option<String>,
    domain_id: Option<String>,
    dedicated_ips: Vec<String>,
    ip_pool_id: Option<String>,
    ip_pool_name: Option<String>,
    sent_message_id: Option<String>,
}

/// Identifiers a successful step hands back to the driver.
#[derive(Debug, Default)]
pub enum SessionUpdate {
    #[default]
    Nothing,
    /// A freshly created sub-account always becomes the active one.
    SubAccountCreated {
        id: String,
        api_key: Option<Secret<String>>,
    },
    /// A listed sub-account is adopted only when none is active yet.
    SubAccountListed {
        id: String,
        api_key: Option<Secret<String>>,
    },
    Webhook {
        id: String,
    },
    Domain {
        id: String,
    },
    DedicatedIps(Vec<String>),
    IpPool {
        id: String,
        name: String,
    },
    /// Kept only if no message id was captured earlier in the run.
    MessageSent {
        id: String,
    },
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sub_account_id(&self) -> Option<&str> {
        self.sub_account_id.as_deref()
    }

    pub fn sub_account_api_key(&self) -> Option<&Secret<String>> {
        self.sub_account_api_key.as_ref()
    }

    pub fn webhook_id(&self) -> Option<&str> {
        self.webhook_id.as_deref()
    }

    pub fn domain_id(&self) -> Option<&str> {
        self.domain_id.as_deref()
    }

    pub fn dedicated_ips(&self) -> &[String] {
        &self.dedicated_ips
    }

    pub fn ip_pool_id(&self) -> Option<&str> {
        self.ip_pool_id.as_deref()
    }

    pub fn ip_pool_name(&self) -> Option<&str> {
        self.ip_pool_name.as_deref()
    }

    pub fn sent_message_id(&self) -> Option<&str> {
        self.sent_message_id.as_deref()
    }

    /// Fold a step's result into the session.
    pub fn apply(&mut self, update: SessionUpdate) {
        match update {
            SessionUpdate::Nothing => {}
            SessionUpdate::SubAccountCreated { id, api_key } => {
                self.sub_account_id = Some(id);
                if api_key.is_some() {
                    self.sub_account_api_key = api_key;
                }
            }
            SessionUpdate::SubAccountListed { id, api_key } => {
                if self.sub_account_id.is_none() {
                    self.sub_account_id = Some(id);
                    self.sub_account_api_key = api_key;
                }
            }
            SessionUpdate::Webhook { id } => self.webhook_id = Some(id),
            SessionUpdate::Domain { id } => self.domain_id = Some(id),
            SessionUpdate::DedicatedIps(ips) => {
                if !ips.is_empty() {
                    self.dedicated_ips = ips;
                }
            }
            SessionUpdate::IpPool { id, name } => {
                self.ip_pool_id = Some(id);
                self.ip_pool_name = Some(name);
            }
            SessionUpdate::MessageSent { id } => {
                self.sent_message_id.get_or_insert(id);
            }
        }
    }
}
