//! Message lookup
//!
//! The message store is eventually consistent, so the lookup waits a fixed
//! delay first. There is no polling: a message that is still missing after
//! the delay is reported as whatever the service returns.

use std::time::Duration;

use common::Scope;
use esp_client::BoxFuture;

use crate::error::StepError;
use crate::session::Session;
use crate::settings::WorkflowSettings;
use crate::step::{Step, StepContext, StepOutput};

pub struct MessageDetails;

fn require_message_id(session: &Session) -> Result<&str, StepError> {
    session.sent_message_id().ok_or_else(|| {
        StepError::precondition("no message id captured; neither send step succeeded")
    })
}

impl Step for MessageDetails {
    fn name(&self) -> &'static str {
        "message-details"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn precondition(&self, session: &Session) -> Result<(), StepError> {
        require_message_id(session).map(|_| ())
    }

    fn settle_delay(&self, settings: &WorkflowSettings) -> Option<Duration> {
        Some(settings.message_lookup_delay).filter(|delay| !delay.is_zero())
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let message_id = require_message_id(ctx.session)?;
            let message = ctx.api.message_details(ctx.key, message_id).await?;

            let mut lines = vec![format!(
                "message {} status: {}",
                message.id,
                message.status.as_deref().unwrap_or("unknown")
            )];
            if let Some(subject) = &message.subject {
                lines.push(format!("subject: {subject}"));
            }
            if let (Some(from), Some(to)) = (&message.from, &message.to) {
                lines.push(format!("{from} -> {to}"));
            }
            if let Some(created_at) = &message.created_at {
                lines.push(format!("created at {created_at}"));
            }
            lines.extend(message.events.iter().map(|event| {
                format!(
                    "- {} {}",
                    event.timestamp.as_deref().unwrap_or("-"),
                    event.kind
                )
            }));
            Ok(StepOutput::lines(lines))
        })
    }
}
