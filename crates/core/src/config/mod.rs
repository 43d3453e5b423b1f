//! Configuration loading and management.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.trip-planner/` directory structure.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, CONFIG_DIR};
pub use models::AppConfig;
