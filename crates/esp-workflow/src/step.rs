//! Step descriptor trait

use std::time::Duration;

use common::Scope;
use esp_client::{ApiKey, BoxFuture, EspApi};

use crate::error::StepError;
use crate::session::{Session, SessionUpdate};
use crate::settings::WorkflowSettings;
use crate::window::StatsWindow;

/// Everything a step action may read. The session is borrowed immutably;
/// changes go back through `StepOutput::update`.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub api: &'a dyn EspApi,
    /// Credential already resolved from the step's scope
    pub key: &'a ApiKey,
    pub session: &'a Session,
    pub settings: &'a WorkflowSettings,
    pub window: &'a StatsWindow,
}

/// Result of a successful step.
#[derive(Debug, Default)]
pub struct StepOutput {
    pub update: SessionUpdate,
    /// Human-readable summary, one entry per console line
    pub lines: Vec<String>,
}

impl StepOutput {
    pub fn new(update: SessionUpdate, lines: Vec<String>) -> Self {
        Self { update, lines }
    }

    /// Output that only reports, without touching the session.
    pub fn lines(lines: Vec<String>) -> Self {
        Self {
            update: SessionUpdate::Nothing,
            lines,
        }
    }
}

/// One entry in the workflow catalog.
///
/// Uses `Pin<Box<dyn Future>>` return types so the catalog can hold
/// `Box<dyn Step>`.
pub trait Step: Send + Sync {
    /// Stable kebab-case name for the console, logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Which credential the driver hands to `run`.
    fn scope(&self) -> Scope;

    /// Checked before any delay or remote call. `Err` skips the step.
    fn precondition(&self, _session: &Session) -> Result<(), StepError> {
        Ok(())
    }

    /// Fixed wait between a passed precondition and the remote call.
    fn settle_delay(&self, _settings: &WorkflowSettings) -> Option<Duration> {
        None
    }

    fn run<'a>(&'a self, ctx: StepContext<'a>) -> BoxFuture<'a, Result<StepOutput, StepError>>;
}
