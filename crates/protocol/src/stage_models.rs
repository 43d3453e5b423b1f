//! Stage identity, status and progress models.
//!
//! A run always consists of the same four stages in the same order. Each
//! stage publishes a [`StageStatus`]; the orchestrator folds those snapshots
//! into a [`ProgressReport`].

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

/// One sequential unit of the planning pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Planner,
    Booking,
    Scheduler,
    Ui,
}

impl StageKind {
    /// Fixed execution order of a run.
    pub const ORDER: [StageKind; 4] = [
        StageKind::Planner,
        StageKind::Booking,
        StageKind::Scheduler,
        StageKind::Ui,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planner => "planner",
            Self::Booking => "booking",
            Self::Scheduler => "scheduler",
            Self::Ui => "ui",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a stage.
///
/// Pending -> Running -> Completed | Failed. Completed and Failed are final.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl StageState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Status record owned by a stage agent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "camelCase")]
pub struct StageStatus {
    pub state: StageState,
    /// Percentage in `0..=100`. Only a completed stage reports 100.
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Lifecycle of a whole orchestration run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    #[default]
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// One row of the per-stage progress breakdown.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct StageProgress {
    pub stage: StageKind,
    pub state: StageState,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate progress of a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    #[ts(type = "string")]
    pub run_id: Uuid,
    pub state: RunState,
    /// Integer mean of all stage progress values.
    pub overall: u8,
    pub stages: Vec<StageProgress>,
}

impl ProgressReport {
    pub fn stage(&self, kind: StageKind) -> Option<&StageProgress> {
        self.stages.iter().find(|s| s.stage == kind)
    }
}
