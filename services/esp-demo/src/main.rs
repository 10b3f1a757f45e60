//! ESP Workflow Demo
//!
//! One-shot binary that:
//! 1. Loads configuration and both API keys
//! 2. Warns about placeholder credentials and settings
//! 3. Runs the step catalog against the ESP API, printing a block per step
//! 4. Prints a summary and writes a metrics snapshot if configured
//!
//! Step failures are reported, never fatal: once the run starts the process
//! exits zero.

mod config;
mod metrics;

use anyhow::{Context, Result};
use common::{Credentials, is_placeholder};
use esp_client::{EspApi, HttpEspClient};
use esp_workflow::{Driver, RunReport, Session, StatsWindow, WorkflowSettings, catalog};
use std::io::Write;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs on stderr; stdout carries the step report
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    info!("starting esp-workflow-demo");

    let prometheus_handle =
        metrics::install_recorder().context("failed to install Prometheus recorder")?;

    // CLI: simple --config flag parsing
    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let config = match Config::resolve_path(cli_config_path) {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            Config::load(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => {
            info!("no configuration file, using defaults and environment");
            Config::from_env().context("invalid configuration from environment")?
        }
    };

    let credentials = config.credentials();
    let settings = config.settings();

    info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout_secs,
        domain = %settings.domain,
        create_sub_account = settings.sub_account_name.is_some(),
        "configuration loaded"
    );

    warn_unconfigured(&credentials, &settings);

    let http = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let client = HttpEspClient::new(http, &config.api.base_url, config.timeout())
        .context("invalid base_url")?;

    let mut stdout = std::io::stdout();
    let report = run_workflow(
        &client,
        &credentials,
        &settings,
        StatsWindow::current(),
        &mut stdout,
    )
    .await;

    metrics::record_run_totals(report.succeeded(), report.failed(), report.skipped());
    if let Some(path) = &config.metrics_file {
        match metrics::write_snapshot(&prometheus_handle, path) {
            Ok(()) => info!(path = %path.display(), "metrics snapshot written"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write metrics snapshot"),
        }
    }

    Ok(())
}

/// Run the whole catalog once with a fresh session and print the summary.
async fn run_workflow(
    api: &dyn EspApi,
    credentials: &Credentials,
    settings: &WorkflowSettings,
    window: StatsWindow,
    out: &mut impl Write,
) -> RunReport {
    let steps = catalog(settings);
    info!(
        steps = steps.len(),
        from = %window.from(),
        to = %window.to(),
        "running workflow"
    );

    let driver = Driver::new(api, credentials, settings, window);
    let mut session = Session::new();
    let report = driver.run(&steps, &mut session, out).await;

    if let Err(e) = writeln!(out, "{}", report.summary_line()) {
        warn!(error = %e, "failed to write run summary");
    }
    report
}

/// Settings that still hold template text or a reserved example domain.
fn unconfigured_settings(settings: &WorkflowSettings) -> Vec<&'static str> {
    [
        ("from_email", settings.from_email.as_str()),
        ("to_email", settings.to_email.as_str()),
        ("domain", settings.domain.as_str()),
        ("webhook_url", settings.webhook_url.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| is_placeholder(value) || uses_example_domain(value))
    .map(|(name, _)| name)
    .collect()
}

/// True when the host part of an address or URL is `example.com` or one of
/// its subdomains.
fn uses_example_domain(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    let rest = value
        .split_once("://")
        .map_or(value.as_str(), |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    let host = host.split(':').next().unwrap_or(host);
    host == "example.com" || host.ends_with(".example.com")
}

fn warn_unconfigured(credentials: &Credentials, settings: &WorkflowSettings) {
    for scope in credentials.placeholder_scopes() {
        warn!(
            scope = %scope,
            "API key is unset or a placeholder; calls in this scope will likely be rejected"
        );
    }
    for name in unconfigured_settings(settings) {
        warn!(setting = name, "setting is unset or a placeholder");
    }
}
