//! Lifecycle event emission for a run.
//!
//! The orchestrator reports through an `EventSink`. Without a channel every
//! call is a no-op, and a dropped receiver never fails the run.

use tokio::sync::mpsc::Sender;
use tp_protocol::ipc::Event;
use tp_protocol::stage_models::{StageKind, StageStatus};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSink {
    run_id: Uuid,
    tx: Option<Sender<Event>>,
}

impl EventSink {
    pub fn new(run_id: Uuid, tx: Option<Sender<Event>>) -> Self {
        Self { run_id, tx }
    }

    pub fn is_attached(&self) -> bool {
        self.tx.is_some()
    }

    async fn emit(&self, event: Event) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event).await;
        }
    }

    /// Announce the start of the run.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user the run plans for
    /// * `destination` - Requested destination, if any
    pub async fn run_started(&self, user_id: &str, destination: Option<&str>) {
        self.emit(Event::RunStarted {
            run_id: self.run_id,
            user_id: user_id.to_string(),
            destination: destination.map(str::to_string),
        })
        .await;
    }

    /// Publish a stage status snapshot.
    pub async fn stage_update(&self, stage: StageKind, status: &StageStatus) {
        self.emit(Event::StageStatusUpdate {
            run_id: self.run_id,
            stage,
            state: status.state,
            progress: status.progress,
        })
        .await;
    }

    pub async fn log(&self, content: impl Into<String>) {
        self.emit(Event::RunLogChunk {
            run_id: self.run_id,
            content: content.into(),
        })
        .await;
    }

    pub async fn run_completed(&self) {
        self.emit(Event::RunCompleted { run_id: self.run_id }).await;
    }

    /// Report the failure that ended the run.
    ///
    /// # Arguments
    ///
    /// * `stage` - The stage at fault, if any
    /// * `error` - Error message describing the failure
    pub async fn run_failed(&self, stage: Option<StageKind>, error: &str) {
        self.emit(Event::RunFailed {
            run_id: self.run_id,
            stage,
            error: error.to_string(),
        })
        .await;
    }
}
