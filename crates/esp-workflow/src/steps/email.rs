//! Transactional and marketing sends
//!
//! Both go out under the sub-account credential and through the IP pool
//! created earlier in the run, when there is one. Only the first successful
//! send's message id is kept for the lookup at the end.

use std::collections::BTreeMap;

use common::Scope;
use esp_client::{BoxFuture, EmailAddress, Recipient, SendEmailRequest, Tracking};
use tracing::info;

use crate::error::StepError;
use crate::session::{Session, SessionUpdate};
use crate::settings::WorkflowSettings;
use crate::step::{Step, StepContext, StepOutput};

const TRACK_ALL: Tracking = Tracking {
    opens: true,
    clicks: true,
};

fn sender(settings: &WorkflowSettings) -> EmailAddress {
    EmailAddress {
        email: settings.from_email.clone(),
        name: Some(settings.from_name.clone()),
    }
}

fn string_map<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Order-confirmation style message with per-recipient merge fields.
pub fn transactional_request(
    settings: &WorkflowSettings,
    ip_pool: Option<&str>,
) -> SendEmailRequest {
    SendEmailRequest {
        from: sender(settings),
        to: vec![Recipient {
            email: settings.to_email.clone(),
            name: None,
            custom_fields: string_map([
                ("first_name", "Demo".to_string()),
                ("order_id", "ORD-1001".to_string()),
            ]),
        }],
        subject: "Your order ORD-1001 is confirmed".to_string(),
        html: "<h1>Thanks, {{first_name}}!</h1>\
               <p>Order <strong>{{order_id}}</strong> is confirmed and on its way.</p>\
               <p><a href=\"https://example.com/orders\">Track your order</a></p>"
            .to_string(),
        text: "Thanks, {{first_name}}! Order {{order_id}} is confirmed and on its way.\n\
               Track your order: https://example.com/orders"
            .to_string(),
        tracking: TRACK_ALL,
        headers: string_map([
            ("X-Message-Type", "transactional".to_string()),
            ("X-Mailer", "esp-workflow-demo".to_string()),
        ]),
        tags: Vec::new(),
        ip_pool: ip_pool.map(str::to_owned),
    }
}

/// Newsletter style message with campaign headers and group tags.
pub fn marketing_request(settings: &WorkflowSettings, ip_pool: Option<&str>) -> SendEmailRequest {
    SendEmailRequest {
        from: sender(settings),
        to: vec![Recipient {
            email: settings.to_email.clone(),
            name: None,
            custom_fields: BTreeMap::new(),
        }],
        subject: "This week's product updates".to_string(),
        html: "<h1>What's new</h1>\
               <p>Faster sending, better analytics and a refreshed dashboard.</p>\
               <p><a href=\"https://example.com/blog\">Read more</a></p>"
            .to_string(),
        text: "What's new: faster sending, better analytics and a refreshed dashboard.\n\
               Read more: https://example.com/blog"
            .to_string(),
        tracking: TRACK_ALL,
        headers: string_map([
            ("X-Campaign-Id", "weekly-product-updates".to_string()),
            (
                "List-Unsubscribe",
                format!("<mailto:unsubscribe@{}>", settings.domain),
            ),
        ]),
        tags: vec!["newsletter".to_string(), "product-updates".to_string()],
        ip_pool: ip_pool.map(str::to_owned),
    }
}

fn routing_line(session: &Session) -> String {
    match session.ip_pool_name() {
        Some(pool) => format!("routed through IP pool {pool}"),
        None => "routed through the shared pool".to_string(),
    }
}

pub struct SendTransactionalEmail;

impl Step for SendTransactionalEmail {
    fn name(&self) -> &'static str {
        "send-transactional-email"
    }

    fn scope(&self) -> Scope {
        Scope::SubAccount
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let request = transactional_request(ctx.settings, ctx.session.ip_pool_name());
            let sent = ctx.api.send_email(ctx.key, &request).await?;
            info!(message_id = %sent.message_id, "transactional email accepted");

            let lines = vec![
                format!(
                    "sent transactional email {} to {}",
                    sent.message_id, ctx.settings.to_email
                ),
                routing_line(ctx.session),
            ];
            Ok(StepOutput::new(
                SessionUpdate::MessageSent {
                    id: sent.message_id,
                },
                lines,
            ))
        })
    }
}

pub struct SendMarketingEmail;

impl Step for SendMarketingEmail {
    fn name(&self) -> &'static str {
        "send-marketing-email"
    }

    fn scope(&self) -> Scope {
        Scope::SubAccount
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>> {
        Box::pin(async move {
            let request = marketing_request(ctx.settings, ctx.session.ip_pool_name());
            let sent = ctx.api.send_email(ctx.key, &request).await?;
            info!(message_id = %sent.message_id, "marketing email accepted");

            let mut lines = vec![
                format!(
                    "sent marketing email {} to {}",
                    sent.message_id, ctx.settings.to_email
                ),
                format!("tags: {}", request.tags.join(", ")),
                routing_line(ctx.session),
            ];
            if let Some(earlier) = ctx.session.sent_message_id() {
                lines.push(format!("message lookup keeps earlier id {earlier}"));
            }
            Ok(StepOutput::new(
                SessionUpdate::MessageSent {
                    id: sent.message_id,
                },
                lines,
            ))
        })
    }
}
