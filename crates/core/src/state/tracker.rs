//! Stage status state machine.
//!
//! A `StageTracker` owns one stage's [`StageStatus`] and publishes every
//! change through a `tokio::sync::watch` channel, so readers take snapshots
//! without ever blocking the stage.

use thiserror::Error;
use tokio::sync::watch;
use tp_protocol::stage_models::{StageKind, StageState, StageStatus};

/// Progress ceiling while a stage is still running.
const RUNNING_CEILING: u8 = 99;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Stage {stage} cannot start from state {state:?}")]
pub struct TransitionError {
    pub stage: StageKind,
    pub state: StageState,
}

#[derive(Debug)]
pub struct StageTracker {
    kind: StageKind,
    tx: watch::Sender<StageStatus>,
}

impl StageTracker {
    pub fn new(kind: StageKind) -> Self {
        let (tx, _rx) = watch::channel(StageStatus::default());
        Self { kind, tx }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Current status.
    pub fn snapshot(&self) -> StageStatus {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StageStatus> {
        self.tx.subscribe()
    }

    /// Move `Pending -> Running`.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` and leaves the status untouched when the
    /// stage has already left `Pending`.
    pub fn begin(&self) -> Result<(), TransitionError> {
        let mut rejected = None;
        self.tx.send_if_modified(|status| {
            if status.state == StageState::Pending {
                status.state = StageState::Running;
                status.progress = 0;
                status.error = None;
                true
            } else {
                rejected = Some(status.state);
                false
            }
        });

        match rejected {
            Some(state) => Err(TransitionError {
                stage: self.kind,
                state,
            }),
            None => Ok(()),
        }
    }

    /// Raise progress while running. Never lowers it and never reaches 100.
    pub fn advance(&self, progress: u8) {
        let target = progress.min(RUNNING_CEILING);
        self.tx.send_if_modified(|status| {
            if status.state == StageState::Running && target > status.progress {
                status.progress = target;
                true
            } else {
                false
            }
        });
    }

    /// Move `Running -> Completed` at 100%.
    pub fn complete(&self) -> bool {
        self.tx.send_if_modified(|status| {
            if status.state == StageState::Running {
                status.state = StageState::Completed;
                status.progress = 100;
                true
            } else {
                false
            }
        })
    }

    /// Move `Running -> Failed`, keeping the progress reached so far.
    pub fn fail(&self, error: impl Into<String>) -> bool {
        let error = error.into();
        self.tx.send_if_modified(|status| {
            if status.state == StageState::Running {
                status.state = StageState::Failed;
                status.error = Some(error);
                true
            } else {
                false
            }
        })
    }
}
