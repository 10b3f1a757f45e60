//! Run report and console rendering

use std::io::{self, Write};
use std::time::Duration;

use common::Scope;

use crate::error::StepError;

/// How a single step ended.
#[derive(Debug)]
pub enum StepOutcome {
    Succeeded { lines: Vec<String> },
    Failed(StepError),
}

impl StepOutcome {
    /// `succeeded`, `skipped` (precondition) or `failed`; also the metrics label.
    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Succeeded { .. } => "succeeded",
            StepOutcome::Failed(err) if err.is_precondition() => "skipped",
            StepOutcome::Failed(_) => "failed",
        }
    }

    pub fn error(&self) -> Option<&StepError> {
        match self {
            StepOutcome::Failed(err) => Some(err),
            StepOutcome::Succeeded { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct StepRecord {
    pub name: &'static str,
    pub scope: Scope,
    pub outcome: StepOutcome,
    pub elapsed: Duration,
}

impl StepRecord {
    /// Console block for this step: a header line then indented detail.
    pub fn render(&self, position: usize, total: usize, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "== [{position}/{total}] {} ({} credential)",
            self.name, self.scope
        )?;
        match &self.outcome {
            StepOutcome::Succeeded { lines } => {
                for line in lines {
                    writeln!(out, "   {line}")?;
                }
            }
            StepOutcome::Failed(StepError::RemoteRejection { status, body }) => {
                writeln!(out, "   rejected by service ({status}): {body}")?;
            }
            StepOutcome::Failed(StepError::TransportFailure(msg)) => {
                writeln!(out, "   transport failure: {msg}")?;
            }
            StepOutcome::Failed(StepError::PreconditionUnmet(reason)) => {
                writeln!(out, "   skipped: {reason}")?;
            }
        }
        Ok(())
    }
}

/// Outcome of every step in catalog order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub records: Vec<StepRecord>,
}

impl RunReport {
    pub fn record(&self, name: &str) -> Option<&StepRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    fn count(&self, label: &str) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome.label() == label)
            .count()
    }

    pub fn succeeded(&self) -> usize {
        self.count("succeeded")
    }

    pub fn failed(&self) -> usize {
        self.count("failed")
    }

    pub fn skipped(&self) -> usize {
        self.count("skipped")
    }

    pub fn summary_line(&self) -> String {
        format!(
            "run finished: {} succeeded, {} failed, {} skipped",
            self.succeeded(),
            self.failed(),
            self.skipped()
        )
    }
}
