//! Sequential ESP workflow orchestration
//!
//! Runs a fixed, ordered catalog of remote operations against an `EspApi`,
//! one at a time. Each step is a descriptor with a name, a credential scope,
//! an optional precondition over the session and an action. The driver:
//! 1. Checks the precondition (skips with `PreconditionUnmet` if it fails)
//! 2. Waits out the step's settle delay, if it has one
//! 3. Resolves the step's scope to a credential and runs the action
//! 4. Folds the returned `SessionUpdate` into the session on success only
//! 5. Records the outcome in the `RunReport` and moves on regardless
//!
//! No step failure ever stops the run.

pub mod driver;
pub mod error;
pub mod report;
pub mod session;
pub mod settings;
pub mod stats;
pub mod step;
pub mod steps;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::Driver;
pub use error::StepError;
pub use report::{RunReport, StepOutcome, StepRecord};
pub use session::{Session, SessionUpdate};
pub use settings::WorkflowSettings;
pub use step::{Step, StepContext, StepOutput};
pub use steps::catalog;
pub use window::{STATS_WINDOW_DAYS, StatsWindow};
