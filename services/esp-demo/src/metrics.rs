//! Prometheus metrics for a workflow run
//!
//! Series recorded elsewhere in the workspace:
//!
//! - `workflow_steps_total` (counter): labels `step`, `outcome`
//! - `workflow_step_duration_seconds` (histogram): label `step`
//! - `esp_requests_total` (counter): labels `operation`, `status`
//!
//! The process is a one-shot run, so there is no scrape endpoint; the text
//! exposition is written to `metrics_file` once the run finishes.

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::path::Path;

/// Bucket boundaries from 10ms to 120s; the slowest step sleeps the settle
/// delay before its call.
const STEP_DURATION_BUCKETS: &[f64] = &[
    0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
];

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("workflow_step_duration_seconds".to_string()),
        STEP_DURATION_BUCKETS,
    )
}

/// Install the Prometheus recorder and return a handle for rendering metrics.
///
/// Renders `workflow_step_duration_seconds` as a histogram with `_bucket`
/// lines rather than the default summary.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    builder()?.install_recorder()
}

/// Record the end-of-run totals as gauges so the snapshot carries them even
/// when a counter never fired for some outcome.
pub fn record_run_totals(succeeded: usize, failed: usize, skipped: usize) {
    metrics::gauge!("workflow_run_steps", "outcome" => "succeeded").set(succeeded as f64);
    metrics::gauge!("workflow_run_steps", "outcome" => "failed").set(failed as f64);
    metrics::gauge!("workflow_run_steps", "outcome" => "skipped").set(skipped as f64);
}

/// Write the current Prometheus text rendering to `path`.
pub fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, handle.render())
}
