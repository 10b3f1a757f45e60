//! Sending-domain steps
//!
//! Adding a domain does not verify it. The service answers with DNS records
//! (DKIM and friends) the domain owner has to publish; those are surfaced
//! verbatim.

use common::Scope;
use esp_client::{BoxFuture, CreateDomainRequest, DnsRecord};

use crate::error::StepError;
use crate::session::SessionUpdate;
use crate::step::{Step, StepContext, StepOutput};

pub struct AddDomain;

impl Step for AddDomain {
    fn name(&self) -> &'static str {
        "add-domain"
    }

    fn scope(&self) -> Scope {
        Scope::SubAccount
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let request = CreateDomainRequest {
                domain: ctx.settings.domain.clone(),
            };
            let domain = ctx.api.create_domain(ctx.key, &request).await?;

            let mut lines = vec![format!(
                "added domain {} ({}), verified: {}",
                domain.domain,
                domain.id,
                if domain.verified { "yes" } else { "no" }
            )];
            if !domain.dns_records.is_empty() {
                lines.push("publish these DNS records to verify the domain:".to_string());
                lines.extend(domain.dns_records.iter().map(format_record));
            }
            Ok(StepOutput::new(SessionUpdate::Domain { id: domain.id }, lines))
        })
    }
}

fn format_record(record: &DnsRecord) -> String {
    match &record.purpose {
        Some(purpose) => format!(
            "  {} {} {} [{purpose}]",
            record.kind, record.host, record.value
        ),
        None => format!("  {} {} {}", record.kind, record.host, record.value),
    }
}

pub struct ListDomains;

impl Step for ListDomains {
    fn name(&self) -> &'static str {
        "list-domains"
    }

    fn scope(&self) -> Scope {
        Scope::SubAccount
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let domains = ctx.api.list_domains(ctx.key).await?;
            let mut lines = vec![format!("{} domain(s)", domains.len())];
            lines.extend(domains.iter().map(|domain| {
                let state = if domain.verified { "verified" } else { "pending" };
                format!("- {} {} ({state})", domain.id, domain.domain)
            }));
            Ok(StepOutput::lines(lines))
        })
    }
}
