//! The ordered step catalog

pub mod accounts;
pub mod domains;
pub mod email;
pub mod ip_pools;
pub mod messages;
pub mod statistics;
pub mod webhooks;

pub use accounts::{CreateSubAccount, ListSubAccounts};
pub use domains::{AddDomain, ListDomains};
pub use email::{SendMarketingEmail, SendTransactionalEmail};
pub use ip_pools::{CreateIpPool, ListDedicatedIps, ListIpPools};
pub use messages::MessageDetails;
pub use statistics::{AccountStatistics, SubAccountAggregateStatistics, SubAccountStatistics};
pub use webhooks::{CreateWebhook, ListWebhooks};

use crate::settings::WorkflowSettings;
use crate::step::Step;

/// Steps in execution order. Sub-account creation is included only when a
/// name is configured.
pub fn catalog(settings: &WorkflowSettings) -> Vec<Box<dyn Step>> {
    let mut steps: Vec<Box<dyn Step>> = Vec::new();
    if let Some(name) = &settings.sub_account_name {
        steps.push(Box::new(CreateSubAccount::new(name.clone())));
    }
    steps.push(Box::new(ListSubAccounts));
    steps.push(Box::new(CreateWebhook));
    steps.push(Box::new(ListWebhooks));
    steps.push(Box::new(AddDomain));
    steps.push(Box::new(ListDomains));
    steps.push(Box::new(ListDedicatedIps));
    steps.push(Box::new(CreateIpPool));
    steps.push(Box::new(ListIpPools));
    steps.push(Box::new(SendTransactionalEmail));
    steps.push(Box::new(SendMarketingEmail));
    steps.push(Box::new(SubAccountStatistics));
    steps.push(Box::new(SubAccountAggregateStatistics));
    steps.push(Box::new(AccountStatistics));
    steps.push(Box::new(MessageDetails));
    steps
}
