//! # tp-core
//!
//! Core orchestration engine and travel-data providers for the trip planner.
//!
//! This crate provides:
//! - Configuration loading from the `.trip-planner/` directory
//! - The provider facade over mock and live travel-data adapters
//! - The four planning stages and the orchestrator that runs them
//! - State tracking for stages and concurrent runs
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`providers`]: Provider trait, adapters and the `ApiServiceManager`
//! - [`stages`]: Planner, booking, scheduler and UI stages
//! - [`engine`]: The orchestrator
//! - [`state`]: Stage trackers, lifecycle events and the run registry
//! - [`request`]: Request parsing and validation
//! - [`init`]: Project scaffolding

pub mod config;
pub mod engine;
pub mod init;
pub mod providers;
pub mod request;
pub mod stages;
pub mod state;

pub use engine::{plan_trip, Orchestrator};
pub use providers::ApiServiceManager;
pub use state::RunRegistry;
