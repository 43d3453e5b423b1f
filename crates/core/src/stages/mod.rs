//! Stage agents of the planning pipeline.
//!
//! Every run executes the same four stages in order:
//! planner → booking → scheduler → ui. Each stage reads the planning context
//! plus the outputs of the stages before it.

pub mod base;
pub mod booking;
pub mod catalog;
pub mod planner;
pub mod scheduler;
pub mod summary;
pub mod ui;

pub use base::{StageAgent, StageContext, StageError};
pub use booking::BookingStage;
pub use planner::PlannerStage;
pub use scheduler::SchedulerStage;
pub use ui::UiStage;

use crate::providers::ApiServiceManager;
use std::sync::Arc;
use tp_protocol::config_models::GlobalConfig;

/// Build the standard stage line-up in execution order.
pub fn default_stages(
    providers: &Arc<ApiServiceManager>,
    config: &GlobalConfig,
) -> Vec<Box<dyn StageAgent>> {
    vec![
        Box::new(PlannerStage::new(Arc::clone(providers), config.planner.clone())),
        Box::new(BookingStage::new(Arc::clone(providers), config.booking.clone())),
        Box::new(SchedulerStage::new(config.scheduler.clone())),
        Box::new(UiStage::new()),
    ]
}
