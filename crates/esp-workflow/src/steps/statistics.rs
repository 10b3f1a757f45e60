//! Statistics steps over the trailing window

use common::Scope;
use esp_client::BoxFuture;

use crate::error::StepError;
use crate::session::Session;
use crate::stats::{daily_lines, format_counters};
use crate::step::{Step, StepContext, StepOutput};

fn require_sub_account(session: &Session) -> Result<&str, StepError> {
    session.sub_account_id().ok_or_else(|| {
        StepError::precondition("no active sub-account; create or list sub-accounts first")
    })
}

fn window_line(ctx: &StepContext<'_>) -> String {
    let range = ctx.window.range();
    format!("window {} .. {}", range.from, range.to)
}

/// Per-day counters for the active sub-account, plus a summed total.
pub struct SubAccountStatistics;

impl Step for SubAccountStatistics {
    fn name(&self) -> &'static str {
        "sub-account-statistics"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn precondition(&self, session: &Session) -> Result<(), StepError> {
        require_sub_account(session).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let sub_account_id = require_sub_account(ctx.session)?;
            let range = ctx.window.range();
            let days = ctx
                .api
                .sub_account_stats(ctx.key, sub_account_id, &range)
                .await?;

            let mut lines = vec![format!("sub-account {sub_account_id}, {}", window_line(&ctx))];
            lines.extend(daily_lines(&days));
            Ok(StepOutput::lines(lines))
        })
    }
}

/// Service-side totals for the active sub-account.
pub struct SubAccountAggregateStatistics;

impl Step for SubAccountAggregateStatistics {
    fn name(&self) -> &'static str {
        "sub-account-aggregate-statistics"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn precondition(&self, session: &Session) -> Result<(), StepError> {
        require_sub_account(session).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let sub_account_id = require_sub_account(ctx.session)?;
            let range = ctx.window.range();
            let totals = ctx
                .api
                .sub_account_aggregate_stats(ctx.key, sub_account_id, &range)
                .await?;

            Ok(StepOutput::lines(vec![
                format!("sub-account {sub_account_id}, {}", window_line(&ctx)),
                format!("aggregate: {}", format_counters(&totals)),
            ]))
        })
    }
}

/// Account-wide per-day counters, including opens and clicks.
pub struct AccountStatistics;

impl Step for AccountStatistics {
    fn name(&self) -> &'static str {
        "account-statistics"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let range = ctx.window.range();
            let days = ctx.api.account_stats(ctx.key, &range).await?;

            let mut lines = vec![format!("account-wide, {}", window_line(&ctx))];
            lines.extend(daily_lines(&days));
            Ok(StepOutput::lines(lines))
        })
    }
}
