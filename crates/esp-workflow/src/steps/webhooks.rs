//! Webhook steps

use common::Scope;
use esp_client::{BoxFuture, CreateWebhookRequest, WebhookEvents};

use crate::error::StepError;
use crate::session::SessionUpdate;
use crate::step::{Step, StepContext, StepOutput};

/// Register the configured callback URL for every delivery event.
pub struct CreateWebhook;

impl Step for CreateWebhook {
    fn name(&self) -> &'static str {
        "create-webhook"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let request = CreateWebhookRequest {
                url: ctx.settings.webhook_url.clone(),
                enabled: true,
                events: WebhookEvents::all(),
            };
            let webhook = ctx.api.create_webhook(ctx.key, &request).await?;

            let lines = vec![
                format!("created webhook {} -> {}", webhook.id, webhook.url),
                format!("events: {}", request.events.subscribed().join(", ")),
            ];
            Ok(StepOutput::new(
                SessionUpdate::Webhook { id: webhook.id },
                lines,
            ))
        })
    }
}

pub struct ListWebhooks;

impl Step for ListWebhooks {
    fn name(&self) -> &'static str {
        "list-webhooks"
    }

    fn scope(&self) -> Scope {
        Scope::Account
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let webhooks = ctx.api.list_webhooks(ctx.key).await?;
            let mut lines = vec![format!("{} webhook(s)", webhooks.len())];
            lines.extend(webhooks.iter().map(|hook| {
                let state = if hook.enabled { "enabled" } else { "disabled" };
                format!("- {} {} ({state})", hook.id, hook.url)
            }));
            Ok(StepOutput::lines(lines))
        })
    }
}
