//! Client for the remote email-service-provider API
//!
//! Defines the `EspApi` trait that decouples the workflow from transport.
//! `HttpEspClient` is the real implementation over reqwest; tests substitute
//! in-memory stubs. Every method takes the bearer key to use, so the caller
//! decides which credential tier a call runs under.

pub mod error;
pub mod http;
pub mod types;

pub use error::{Error, Result};
pub use http::HttpEspClient;
pub use types::*;

use common::Secret;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by `EspApi` methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Bearer credential passed to each call.
pub type ApiKey = Secret<String>;

/// Remote operations the workflow consumes.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility (`&dyn EspApi`).
pub trait EspApi: Send + Sync {
    fn create_sub_account<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateSubAccountRequest,
    ) -> BoxFuture<'a, Result<SubAccount>>;

    fn list_sub_accounts<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<SubAccount>>>;

    fn create_webhook<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateWebhookRequest,
    ) -> BoxFuture<'a, Result<Webhook>>;

    fn list_webhooks<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<Webhook>>>;

    fn create_domain<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateDomainRequest,
    ) -> BoxFuture<'a, Result<Domain>>;

    fn list_domains<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<Domain>>>;

    fn list_dedicated_ips<'a>(&'a self, key: &'a ApiKey)
    -> BoxFuture<'a, Result<Vec<DedicatedIp>>>;

    fn create_ip_pool<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a CreateIpPoolRequest,
    ) -> BoxFuture<'a, Result<IpPool>>;

    fn list_ip_pools<'a>(&'a self, key: &'a ApiKey) -> BoxFuture<'a, Result<Vec<IpPool>>>;

    fn send_email<'a>(
        &'a self,
        key: &'a ApiKey,
        request: &'a SendEmailRequest,
    ) -> BoxFuture<'a, Result<SendEmailResponse>>;

    /// Per-day statistics for one sub-account.
    fn sub_account_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        sub_account_id: &'a str,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<Vec<DailyStats>>>;

    /// Totals for one sub-account over the range, summed by the service.
    fn sub_account_aggregate_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        sub_account_id: &'a str,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<StatsCounters>>;

    /// Per-day statistics across the whole account, including opens/clicks.
    fn account_stats<'a>(
        &'a self,
        key: &'a ApiKey,
        range: &'a DateRange,
    ) -> BoxFuture<'a, Result<Vec<DailyStats>>>;

    fn message_details<'a>(
        &'a self,
        key: &'a ApiKey,
        message_id: &'a str,
    ) -> BoxFuture<'a, Result<MessageDetails>>;
}
