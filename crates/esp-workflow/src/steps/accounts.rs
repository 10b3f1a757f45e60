//! Sub-account steps

use common::Scope;
use esp_client::{BoxFuture, CreateSubAccountRequest};
use tracing::info;

use crate::error::StepError;
use crate::session::SessionUpdate;
use crate::step::{Step, StepContext, StepOutput};

/// Create a sub-account and make it the active one.
pub struct CreateSubAccount {
    name: String,
}

impl CreateSubAccount {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Step for CreateSubAccount {
    fn name(&self) -> &'static str {
        "create-sub-account"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let request = CreateSubAccountRequest {
                name: self.name.clone(),
            };
            let account = ctx.api.create_sub_account(ctx.key, &request).await?;
            info!(sub_account_id = %account.id, "sub-account created");

            let mut lines = vec![format!("created sub-account {} ({})", account.id, account.name)];
            if account.api_key.is_some() {
                lines.push("sub-account API key issued (captured, not printed)".to_string());
            }
            Ok(StepOutput::new(
                SessionUpdate::SubAccountCreated {
                    id: account.id,
                    api_key: account.api_key,
                },
                lines,
            ))
        })
    }
}

/// List sub-accounts; adopt the first one if none is active yet.
pub struct ListSubAccounts;

impl Step for ListSubAccounts {
    fn name(&self) -> &'static str {
        "list-sub-accounts"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let accounts = ctx.api.list_sub_accounts(ctx.key).await?;

            let mut lines = vec![format!("{} sub-account(s)", accounts.len())];
            lines.extend(
                accounts
                    .iter()
                    .map(|account| format!("- {} {}", account.id, account.name)),
            );

            let update = match (ctx.session.sub_account_id(), accounts.into_iter().next()) {
                (Some(active), _) => {
                    lines.push(format!("keeping active sub-account {active}"));
                    SessionUpdate::Nothing
                }
                (None, Some(first)) => {
                    lines.push(format!("selected sub-account {}", first.id));
                    SessionUpdate::SubAccountListed {
                        id: first.id,
                        api_key: first.api_key,
                    }
                }
                (None, None) => {
                    lines.push("no sub-accounts to select".to_string());
                    SessionUpdate::Nothing
                }
            };
            Ok(StepOutput::new(update, lines))
        })
    }
}
