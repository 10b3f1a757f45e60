//! Driver loop: runs each step once, in order, and never stops early

use std::io::Write;
use std::time::Instant;

use common::Credentials;
use esp_client::EspApi;
use tracing::{info, instrument, warn};

use crate::report::{RunReport, StepOutcome, StepRecord};
use crate::session::Session;
use crate::settings::WorkflowSettings;
use crate::step::{Step, StepContext};
use crate::window::StatsWindow;

pub struct Driver<'a> {
    api: &'a dyn EspApi,
    credentials: &'a Credentials,
    settings: &'a WorkflowSettings,
    /// Fixed for the whole run so every statistics step queries the same range
    window: StatsWindow,
}

impl<'a> Driver<'a> {
    pub fn new(
        api: &'a dyn EspApi,
        credentials: &'a Credentials,
        settings: &'a WorkflowSettings,
        window: StatsWindow,
    ) -> Self {
        Self {
            api,
            credentials,
            settings,
            window,
        }
    }

    /// Run every step, printing each block to `out` as it completes.
    pub async fn run(
        &self,
        steps: &[Box<dyn Step>],
        session: &mut Session,
        out: &mut impl Write,
    ) -> RunReport {
        let total = steps.len();
        let mut report = RunReport::default();

        for (index, step) in steps.iter().enumerate() {
            let record = self.run_step(step.as_ref(), session).await;
            if let Err(e) = record.render(index + 1, total, out) {
                warn!(error = %e, step = record.name, "failed to write step output");
            }
            report.records.push(record);
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "workflow finished"
        );
        report
    }

    /// Run a single step and fold its result into `session`.
    #[instrument(skip_all, fields(step = step.name(), scope = %step.scope()))]
    pub async fn run_step(&self, step: &dyn Step, session: &mut Session) -> StepRecord {
        let started = Instant::now();
        let outcome = self.execute(step, session).await;
        let elapsed = started.elapsed();

        metrics::counter!(
            "workflow_steps_total",
            "step" => step.name(),
            "outcome" => outcome.label()
        )
        .increment(1);
        metrics::histogram!("workflow_step_duration_seconds", "step" => step.name())
            .record(elapsed.as_secs_f64());

        match &outcome {
            StepOutcome::Succeeded { .. } => {
                info!(elapsed_ms = elapsed.as_millis() as u64, "step succeeded");
            }
            StepOutcome::Failed(err) if err.is_precondition() => {
                warn!(reason = %err, "step skipped");
            }
            StepOutcome::Failed(err) => {
                warn!(error = %err, "step failed, continuing");
            }
        }

        StepRecord {
            name: step.name(),
            scope: step.scope(),
            outcome,
            elapsed,
        }
    }

    async fn execute(&self, step: &dyn Step, session: &mut Session) -> StepOutcome {
        if let Err(err) = step.precondition(session) {
            return StepOutcome::Failed(err);
        }

        if let Some(delay) = step.settle_delay(self.settings) {
            info!(delay_ms = delay.as_millis() as u64, "waiting before remote call");
            tokio::time::sleep(delay).await;
        }

        let ctx = StepContext {
            api: self.api,
            key: self.credentials.resolve(step.scope()),
            session,
            settings: self.settings,
            window: &self.window,
        };
        let result = step.run(ctx).await;

        match result {
            Ok(output) => {
                session.apply(output.update);
                StepOutcome::Succeeded {
                    lines: output.lines,
                }
            }
            Err(err) => StepOutcome::Failed(err),
        }
    }
}
