//! Run and stage state.
//!
//! This module provides:
//! - `StageTracker`, the per-stage status state machine
//! - `EventSink` for lifecycle events
//! - `RunRegistry` for coordinating multiple planning runs

pub mod events;
pub mod registry;
pub mod tracker;

pub use events::EventSink;
pub use registry::RunRegistry;
pub use tracker::StageTracker;
