//! Events emitted by a running orchestration.
//!
//! The orchestrator pushes these onto an optional channel so a front end
//! (the CLI today, a websocket bridge tomorrow) can follow a run live
//! without polling.
//!
//! Uses tagged enum serialization for TypeScript compatibility:
//! ```json
//! {
//!   "type": "stageStatusUpdate",
//!   "payload": {
//!     "run_id": "uuid-here",
//!     "stage": "booking",
//!     "state": "running",
//!     "progress": 0
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::stage_models::{StageKind, StageState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A run has started executing its stages.
    RunStarted {
        #[ts(type = "string")]
        run_id: Uuid,
        user_id: String,
        destination: Option<String>,
    },

    /// A stage changed state.
    StageStatusUpdate {
        #[ts(type = "string")]
        run_id: Uuid,
        stage: StageKind,
        state: StageState,
        progress: u8,
    },

    /// Free-form progress message.
    RunLogChunk {
        #[ts(type = "string")]
        run_id: Uuid,
        content: String,
    },

    /// All stages completed.
    RunCompleted {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// The run ended because a stage failed.
    RunFailed {
        #[ts(type = "string")]
        run_id: Uuid,
        stage: Option<StageKind>,
        error: String,
    },
}

impl Event {
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::StageStatusUpdate { run_id, .. }
            | Self::RunLogChunk { run_id, .. }
            | Self::RunCompleted { run_id }
            | Self::RunFailed { run_id, .. } => *run_id,
        }
    }
}
