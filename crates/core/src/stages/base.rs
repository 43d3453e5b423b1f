//! Base stage trait and supporting types.

use crate::state::tracker::{StageTracker, TransitionError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tp_protocol::planning_models::PlanningContext;
use tp_protocol::stage_models::{StageKind, StageState, StageStatus};
use tp_protocol::trip_models::{BookingOutput, PlannerOutput, SchedulerOutput, StageOutput};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// A provider call came back with `success = false`; message kept verbatim.
    #[error("{0}")]
    Provider(String),
    #[error("Missing output from upstream stage {0}")]
    MissingUpstream(StageKind),
    #[error("Stage {stage} was already executed (state: {state:?})")]
    AlreadyExecuted { stage: StageKind, state: StageState },
    #[error("Stage {stage} timed out after {}s", .after.as_secs())]
    TimedOut { stage: StageKind, after: Duration },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<TransitionError> for StageError {
    fn from(err: TransitionError) -> Self {
        Self::AlreadyExecuted {
            stage: err.stage,
            state: err.state,
        }
    }
}

/// What a stage sees: the immutable planning context plus the outputs of
/// every earlier stage that succeeded.
#[derive(Debug, Clone)]
pub struct StageContext {
    planning: Arc<PlanningContext>,
    outputs: BTreeMap<StageKind, StageOutput>,
}

impl StageContext {
    pub fn new(planning: Arc<PlanningContext>) -> Self {
        Self {
            planning,
            outputs: BTreeMap::new(),
        }
    }

    pub fn planning(&self) -> &PlanningContext {
        &self.planning
    }

    /// Store a stage output under its own kind.
    pub fn record(&mut self, output: StageOutput) {
        self.outputs.insert(output.kind(), output);
    }

    pub fn with_output(mut self, output: StageOutput) -> Self {
        self.record(output);
        self
    }

    pub fn outputs(&self) -> &BTreeMap<StageKind, StageOutput> {
        &self.outputs
    }

    pub fn into_outputs(self) -> BTreeMap<StageKind, StageOutput> {
        self.outputs
    }

    pub fn planner(&self) -> Result<&PlannerOutput, StageError> {
        match self.outputs.get(&StageKind::Planner) {
            Some(StageOutput::Planner(output)) => Ok(output),
            _ => Err(StageError::MissingUpstream(StageKind::Planner)),
        }
    }

    pub fn booking(&self) -> Result<&BookingOutput, StageError> {
        match self.outputs.get(&StageKind::Booking) {
            Some(StageOutput::Booking(output)) => Ok(output),
            _ => Err(StageError::MissingUpstream(StageKind::Booking)),
        }
    }

    pub fn scheduler(&self) -> Result<&SchedulerOutput, StageError> {
        match self.outputs.get(&StageKind::Scheduler) {
            Some(StageOutput::Scheduler(output)) => Ok(output),
            _ => Err(StageError::MissingUpstream(StageKind::Scheduler)),
        }
    }
}

/// One step of the planning pipeline.
///
/// Implementors provide [`StageAgent::run`]; the provided
/// [`StageAgent::execute`] wraps it in the status state machine so every
/// stage moves `pending -> running -> completed | failed` exactly once.
#[async_trait]
pub trait StageAgent: Send + Sync {
    fn kind(&self) -> StageKind;

    /// The tracker owning this stage's status.
    fn tracker(&self) -> &StageTracker;

    /// Produce the stage output. Called at most once, while running.
    async fn run(&self, context: &StageContext) -> Result<StageOutput, StageError>;

    fn status(&self) -> StageStatus {
        self.tracker().snapshot()
    }

    /// Run the stage and record the outcome in its status.
    ///
    /// # Errors
    ///
    /// - `StageError::AlreadyExecuted` if the stage has left `pending`; the
    ///   recorded status is left as it was
    /// - Any error returned by [`StageAgent::run`], which also marks the
    ///   stage failed
    async fn execute(&self, context: &StageContext) -> Result<StageOutput, StageError> {
        self.tracker().begin()?;
        tracing::debug!(stage = %self.kind(), "stage started");

        match self.run(context).await {
            Ok(output) => {
                self.tracker().complete();
                tracing::debug!(stage = %self.kind(), "stage completed");
                Ok(output)
            }
            Err(err) => {
                self.tracker().fail(err.to_string());
                tracing::warn!(stage = %self.kind(), error = %err, "stage failed");
                Err(err)
            }
        }
    }

    /// Mark a running stage failed from the outside (e.g. on timeout).
    fn abort(&self, error: &StageError) {
        self.tracker().fail(error.to_string());
    }
}
