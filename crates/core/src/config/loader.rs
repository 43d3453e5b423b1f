//! Configuration file loader for the `.trip-planner/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.trip-planner/` directory, including:
//! - `config.toml`: Engine and stage settings
//! - `providers/*.yaml`: Provider definitions

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tp_protocol::config_models::{GlobalConfig, ProviderDefinition, ProviderKind};
use tp_protocol::travel_models::Capability;
use walkdir::WalkDir;

/// Name of the project configuration directory.
pub const CONFIG_DIR: &str = ".trip-planner";

/// Loads all configuration from the `.trip-planner/` directory.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.trip-planner/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. Missing directories
/// or files yield defaults rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid TOML or YAML syntax
/// - Values are out of range (zero timeouts or limits)
/// - Two provider files define the same capability
/// - An HTTP provider has no base URL
///
/// # Example
///
/// ```rust,no_run
/// use tp_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Stage timeout: {}s", config.global.engine.stage_timeout_secs);
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let config_dir = root.join(CONFIG_DIR);

    if !config_dir.exists() {
        tracing::debug!(path = %config_dir.display(), "no config directory, using defaults");
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&config_dir)?;
    let providers = load_providers(&config_dir)?;

    Ok(AppConfig { global, providers })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(config_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = config_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    validate_global(&config).map_err(|reason| ConfigError::InvalidConfig {
        path: config_path,
        reason,
    })?;

    Ok(config)
}

fn validate_global(config: &GlobalConfig) -> Result<(), String> {
    if config.engine.stage_timeout_secs == 0 {
        return Err("engine.stage_timeout_secs must be at least 1".to_string());
    }
    if config.planner.attraction_limit == 0 || config.planner.place_limit == 0 {
        return Err("planner limits must be at least 1".to_string());
    }
    if config.scheduler.max_activities_per_day == 0 {
        return Err("scheduler.max_activities_per_day must be at least 1".to_string());
    }
    if config.booking.default_origin.trim().is_empty() {
        return Err("booking.default_origin must not be empty".to_string());
    }
    Ok(())
}

fn validate_provider(definition: &ProviderDefinition) -> Result<(), String> {
    if definition.name.trim().is_empty() {
        return Err("provider name must not be empty".to_string());
    }
    if definition.kind == ProviderKind::Http
        && definition
            .base_url
            .as_deref()
            .map_or(true, |url| url.trim().is_empty())
    {
        return Err(format!(
            "http provider '{}' needs a base-url",
            definition.name
        ));
    }
    if definition.timeout_secs == 0 {
        return Err(format!(
            "provider '{}' needs a timeout-secs of at least 1",
            definition.name
        ));
    }
    Ok(())
}

/// Loads all provider definitions from `providers/*.yaml` and `providers/*.yml`.
fn load_providers(config_dir: &Path) -> ConfigResult<Vec<ProviderDefinition>> {
    let providers_dir = config_dir.join("providers");

    if !providers_dir.exists() {
        return Ok(Vec::new());
    }

    let mut providers = Vec::new();
    let mut seen: HashMap<Capability, PathBuf> = HashMap::new();

    for entry in WalkDir::new(&providers_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: providers_dir.clone(),
            source,
        })?;

        let path = entry.path();

        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let definition: ProviderDefinition =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        validate_provider(&definition).map_err(|reason| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        })?;

        if let Some(previous) = seen.get(&definition.capability) {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!(
                    "capability '{}' is already defined in {}",
                    definition.capability,
                    previous.display()
                ),
            });
        }
        seen.insert(definition.capability, path.to_path_buf());

        tracing::debug!(
            provider = %definition.name,
            capability = %definition.capability,
            kind = ?definition.kind,
            "loaded provider definition"
        );
        providers.push(definition);
    }

    Ok(providers)
}
