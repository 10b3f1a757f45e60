//! Credential context: account-level and sub-account-level API keys
//!
//! Every remote operation belongs to one resource tier. The workflow attaches
//! a `Scope` to each step and resolves it here, so no step ever picks a key
//! by hand.

use std::fmt;

use crate::Secret;

/// Resource tier a remote call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Sub-accounts, webhooks, IPs, IP pools, statistics, message lookup
    Account,
    /// Domains and email sending
    SubAccount,
}

impl Scope {
    pub fn label(&self) -> &'static str {
        match self {
            Scope::Account => "account",
            Scope::SubAccount => "sub_account",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two bearer credentials a run is configured with.
#[derive(Debug, Clone)]
pub struct Credentials {
    account: Secret<String>,
    sub_account: Secret<String>,
}

impl Credentials {
    pub fn new(account: Secret<String>, sub_account: Secret<String>) -> Self {
        Self {
            account,
            sub_account,
        }
    }

    /// Key to send for a call in the given scope.
    pub fn resolve(&self, scope: Scope) -> &Secret<String> {
        match scope {
            Scope::Account => &self.account,
            Scope::SubAccount => &self.sub_account,
        }
    }

    /// Scopes whose key is empty or still a template placeholder.
    pub fn placeholder_scopes(&self) -> Vec<Scope> {
        [Scope::Account, Scope::SubAccount]
            .into_iter()
            .filter(|scope| is_placeholder(self.resolve(*scope).expose()))
            .collect()
    }
}

/// Placeholder markers left in sample configs.
const PLACEHOLDER_MARKERS: &[&str] = &["your-", "your_", "changeme", "replace-me", "<"];

/// True when a configured value is blank or still looks like template text
/// (`your-account-api-key`, `<domain>`, `CHANGEME`).
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    value.is_empty()
        || PLACEHOLDER_MARKERS
            .iter()
            .any(|marker| value.starts_with(marker))
}
