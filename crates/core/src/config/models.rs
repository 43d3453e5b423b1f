//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines the
//! global settings and the provider definitions into a single configuration
//! object.

use crate::providers::{ApiServiceManager, ProviderFactory};
use tp_protocol::config_models::{GlobalConfig, ProviderDefinition};
use tp_protocol::travel_models::Capability;

/// Unified application configuration loaded from `.trip-planner/`.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Engine and stage settings
/// - `providers/*.yaml`: One adapter definition per capability
///
/// # Example
///
/// ```rust,no_run
/// use tp_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} provider definitions", config.providers.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Provider definitions from `providers/*.yaml`, sorted by file name.
    pub providers: Vec<ProviderDefinition>,
}

impl AppConfig {
    /// The definition configured for a capability, if any.
    pub fn provider(&self, capability: Capability) -> Option<&ProviderDefinition> {
        self.providers.iter().find(|p| p.capability == capability)
    }

    /// Build the provider facade. Capabilities without a definition get a mock.
    pub fn build_providers(&self) -> ApiServiceManager {
        ProviderFactory::build(&self.providers)
    }
}
