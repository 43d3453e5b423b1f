//! Configuration models for `.trip-planner/`.
//!
//! - `config.toml` holds the engine and stage settings ([`GlobalConfig`]).
//! - `providers/*.yaml` each define the adapter for one capability
//!   ([`ProviderDefinition`]).

use crate::travel_models::Capability;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Represents global settings from `.trip-planner/config.toml`.
///
/// Every section and field is optional; missing values fall back to the
/// defaults below.
///
/// # Example
///
/// ```toml
/// # .trip-planner/config.toml
/// [engine]
/// stage_timeout_secs = 30
///
/// [scheduler]
/// max_activities_per_day = 3
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, TS)]
pub struct GlobalConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub booking: BookingConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct EngineConfig {
    /// Upper bound on the wall-clock time of a single stage.
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: default_stage_timeout_secs(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct PlannerConfig {
    #[serde(default = "default_attraction_limit")]
    pub attraction_limit: u32,

    #[serde(default = "default_place_limit")]
    pub place_limit: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            attraction_limit: default_attraction_limit(),
            place_limit: default_place_limit(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct BookingConfig {
    /// Departure city used when the request names no origin.
    #[serde(default = "default_origin")]
    pub default_origin: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_origin: default_origin(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct SchedulerConfig {
    #[serde(default = "default_max_activities_per_day")]
    pub max_activities_per_day: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_activities_per_day: default_max_activities_per_day(),
        }
    }
}

/// How a capability is served.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Deterministic in-process generator.
    #[default]
    Mock,
    /// Live HTTP API.
    Http,
}

/// Adapter definition from `.trip-planner/providers/*.yaml`.
///
/// # Example
///
/// ```yaml
/// name: open-weather
/// capability: weather
/// kind: http
/// base-url: https://weather.example.com/v1
/// api-key-env: WEATHER_API_KEY
/// timeout-secs: 10
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderDefinition {
    pub name: String,

    pub capability: Capability,

    #[serde(default)]
    pub kind: ProviderKind,

    /// Root URL of the HTTP API. Required for `kind: http`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Environment variable holding the API key, if the API needs one.
    #[serde(default)]
    pub api_key_env: Option<String>,

    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,

    /// Artificial latency for mock providers.
    #[serde(default)]
    pub latency_ms: Option<u64>,
}

fn default_stage_timeout_secs() -> u64 {
    30
}

fn default_attraction_limit() -> u32 {
    20
}

fn default_place_limit() -> u32 {
    10
}

fn default_origin() -> String {
    "New York".to_string()
}

fn default_max_activities_per_day() -> u32 {
    3
}

fn default_provider_timeout_secs() -> u64 {
    10
}
