//! Dedicated IP and IP pool steps

use common::Scope;
use esp_client::{BoxFuture, CreateIpPoolRequest, OverflowStrategy, RoutingStrategy};
use tracing::info;

use crate::error::StepError;
use crate::session::{Session, SessionUpdate};
use crate::step::{Step, StepContext, StepOutput};

/// Record the account's dedicated IPs for pool creation.
pub struct ListDedicatedIps;

impl Step for ListDedicatedIps {
    fn name(&self) -> &'static str {
        "list-dedicated-ips"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let ips = ctx.api.list_dedicated_ips(ctx.key).await?;

            let mut lines = vec![format!("{} dedicated IP(s)", ips.len())];
            lines.extend(ips.iter().map(|ip| {
                let pool = ip.pool.as_deref().unwrap_or("unassigned");
                let warmup = if ip.warmup_complete { "warm" } else { "warming" };
                format!("- {} pool={pool} {warmup}", ip.ip)
            }));
            let addresses = ips.into_iter().map(|ip| ip.ip).collect();
            Ok(StepOutput::new(SessionUpdate::DedicatedIps(addresses), lines))
        })
    }
}

/// Create a round-robin pool around the first known dedicated IP.
pub struct CreateIpPool;

impl Step for CreateIpPool {
    fn name(&self) -> &'static str {
        "create-ip-pool"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn precondition(&self, session: &Session) -> Result<(), StepError> {
        if session.dedicated_ips().is_empty() {
            return Err(StepError::precondition(
                "no dedicated IPs available; a pool needs at least one member",
            ));
        }
        Ok(())
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let first_ip = ctx
                .session
                .dedicated_ips()
                .first()
                .cloned()
                .ok_or_else(|| StepError::precondition("no dedicated IPs available"))?;

            let request = CreateIpPoolRequest {
                name: pool_name(&ctx.settings.ip_pool_prefix),
                ips: vec![first_ip],
                routing_strategy: RoutingStrategy::RoundRobin,
                warmup_interval: ctx.settings.warmup_interval_hours,
                overflow_strategy: OverflowStrategy::None,
            };
            let pool = ctx.api.create_ip_pool(ctx.key, &request).await?;
            info!(pool_id = %pool.id, pool_name = %pool.name, "IP pool created");

            let lines = vec![
                format!("created IP pool {} ({})", pool.name, pool.id),
                format!(
                    "members: {}, routing: round_robin, warm-up: {}h, overflow: none",
                    request.ips.join(", "),
                    request.warmup_interval
                ),
            ];
            Ok(StepOutput::new(
                SessionUpdate::IpPool {
                    id: pool.id,
                    name: pool.name,
                },
                lines,
            ))
        })
    }
}

/// `<prefix>-<8 hex chars>`; unique enough to rerun the demo without clashes.
fn pool_name(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &suffix[..8])
}

pub struct ListIpPools;

impl Step for ListIpPools {
    fn name(&self) -> &'static str {
        "list-ip-pools"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let pools = ctx.api.list_ip_pools(ctx.key).await?;
            let mut lines = vec![format!("{} IP pool(s)", pools.len())];
            lines.extend(
                pools
                    .iter()
                    .map(|pool| format!("- {} {} [{}]", pool.id, pool.name, pool.ips.join(", "))),
            );
            Ok(StepOutput::lines(lines))
        })
    }
}
