//! # tp-protocol
//!
//! Core protocol definitions and data models for the family trip planner.
//!
//! This crate defines all shared data structures used for:
//! - The inbound planning request and the outbound trip-plan response
//! - Travel-data provider queries, records and result envelopes
//! - Per-stage status and progress of an orchestration run
//! - Configuration file parsing (TOML settings, YAML provider definitions)
//! - Lifecycle events emitted while a run executes
//!
//! ## Modules
//!
//! - [`planning_models`]: Family profile, trip preferences, planning context
//! - [`travel_models`]: Provider capabilities, queries, records, envelopes
//! - [`stage_models`]: Stage identity, status and progress reports
//! - [`trip_models`]: Stage outputs, trip summary and orchestration result
//! - [`config_models`]: Settings from config.toml and provider definitions
//! - [`ipc`]: Events emitted by the orchestrator
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, chrono and uuid
//! - TypeScript generation: All types derive `TS` for the web frontend
//! - Independent compilation: No dependencies on other trip-planner crates

pub mod config_models;
pub mod ipc;
pub mod planning_models;
pub mod stage_models;
pub mod travel_models;
pub mod trip_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use ipc::*;
pub use planning_models::*;
pub use stage_models::*;
pub use travel_models::*;
pub use trip_models::*;
