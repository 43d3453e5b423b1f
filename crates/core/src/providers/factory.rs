//! Provider factory for building adapters from configuration.

use crate::providers::base::ProviderAdapter;
use crate::providers::http::HttpProvider;
use crate::providers::manager::ApiServiceManager;
use crate::providers::mock::{MisconfiguredProvider, MockBehavior, MockProvider};
use std::sync::Arc;
use std::time::Duration;
use tp_protocol::config_models::{ProviderDefinition, ProviderKind};
use tp_protocol::travel_models::Capability;

/// Factory for creating provider adapters from `.trip-planner/providers/*.yaml`.
///
/// Construction never fails: a definition that cannot produce a working
/// adapter yields a [`MisconfiguredProvider`], which then shows up as
/// unhealthy in the health check.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create an adapter from a definition, reading API keys from the process
    /// environment.
    pub fn create(definition: &ProviderDefinition) -> Arc<dyn ProviderAdapter> {
        Self::create_with_env(definition, |key| std::env::var(key).ok())
    }

    /// Create an adapter from a definition.
    ///
    /// # Arguments
    ///
    /// * `definition` - The provider definition
    /// * `env` - Lookup used to resolve `api_key_env`
    ///
    /// # Behavior
    ///
    /// - `kind: mock` → `MockProvider`, with `latency_ms` applied
    /// - `kind: http` → `HttpProvider`
    /// - `kind: http` without `base_url`, or whose `api_key_env` is unset →
    ///   `MisconfiguredProvider`
    pub fn create_with_env<F>(definition: &ProviderDefinition, env: F) -> Arc<dyn ProviderAdapter>
    where
        F: Fn(&str) -> Option<String>,
    {
        match definition.kind {
            ProviderKind::Mock => {
                let behavior = MockBehavior {
                    latency: definition.latency_ms.map(Duration::from_millis),
                    ..MockBehavior::default()
                };
                Arc::new(
                    MockProvider::new(definition.capability, behavior)
                        .with_name(definition.name.clone()),
                )
            }
            ProviderKind::Http => match Self::http(definition, env) {
                Ok(provider) => Arc::new(provider),
                Err(reason) => {
                    tracing::warn!(
                        provider = %definition.name,
                        capability = %definition.capability,
                        %reason,
                        "provider is misconfigured"
                    );
                    Arc::new(MisconfiguredProvider::new(
                        definition.name.clone(),
                        definition.capability,
                        reason,
                    ))
                }
            },
        }
    }

    fn http<F>(definition: &ProviderDefinition, env: F) -> Result<HttpProvider, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = definition
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| "base-url is required for http providers".to_string())?;

        let api_key = match &definition.api_key_env {
            Some(var) => Some(
                env(var)
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| format!("environment variable {var} is not set"))?,
            ),
            None => None,
        };

        HttpProvider::new(
            definition.name.clone(),
            definition.capability,
            base_url,
            api_key,
            Duration::from_secs(definition.timeout_secs.max(1)),
        )
        .map_err(|e| e.to_string())
    }

    /// Build a manager from definitions, using the process environment.
    pub fn build(definitions: &[ProviderDefinition]) -> ApiServiceManager {
        Self::build_with_env(definitions, |key| std::env::var(key).ok())
    }

    /// Build a manager from definitions.
    ///
    /// Every capability without a definition is served by a healthy mock, so
    /// an empty slice yields the all-mock manager.
    pub fn build_with_env<F>(definitions: &[ProviderDefinition], env: F) -> ApiServiceManager
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ApiServiceManager::builder();
        for capability in Capability::ALL {
            let adapter = match definitions.iter().find(|d| d.capability == capability) {
                Some(definition) => Self::create_with_env(definition, &env),
                None => Arc::new(MockProvider::success(capability)) as Arc<dyn ProviderAdapter>,
            };
            builder = builder.with_adapter(adapter);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tp_protocol::travel_models::HealthStatus;

    fn definition(capability: Capability, kind: ProviderKind) -> ProviderDefinition {
        ProviderDefinition {
            name: format!("{capability}-provider"),
            capability,
            kind,
            base_url: None,
            api_key_env: None,
            timeout_secs: 10,
            latency_ms: None,
        }
    }

    #[test]
    fn test_empty_definitions_yield_all_mocks() {
        let manager = ProviderFactory::build_with_env(&[], |_| None);
        assert_eq!(manager.capabilities(), Capability::ALL.to_vec());
        assert_eq!(
            manager.adapter(Capability::Flights).unwrap().name(),
            "mock-flights"
        );
    }

    #[test]
    fn test_mock_definition_keeps_name() {
        let manager = ProviderFactory::build_with_env(
            &[definition(Capability::Places, ProviderKind::Mock)],
            |_| None,
        );
        assert_eq!(
            manager.adapter(Capability::Places).unwrap().name(),
            "places-provider"
        );
    }

    #[tokio::test]
    async fn test_http_without_base_url_is_misconfigured() {
        let manager = ProviderFactory::build_with_env(
            &[definition(Capability::Weather, ProviderKind::Http)],
            |_| None,
        );

        let report = manager.health_check().await;
        let weather = &report.providers[&Capability::Weather];
        assert_eq!(weather.status, HealthStatus::Unhealthy);
        assert!(weather.error.as_deref().unwrap().contains("base-url"));
        assert_eq!(
            report.providers[&Capability::Attractions].status,
            HealthStatus::Healthy
        );
    }

    #[tokio::test]
    async fn test_http_with_missing_key_is_misconfigured() {
        let mut weather = definition(Capability::Weather, ProviderKind::Http);
        weather.base_url = Some("https://weather.example.com".to_string());
        weather.api_key_env = Some("WEATHER_API_KEY".to_string());

        let adapter = ProviderFactory::create_with_env(&weather, |_| None);
        let err = adapter.probe().await.unwrap_err();
        assert!(err.to_string().contains("WEATHER_API_KEY"));
    }

    #[test]
    fn test_http_with_key_builds_http_adapter() {
        let mut weather = definition(Capability::Weather, ProviderKind::Http);
        weather.base_url = Some("https://weather.example.com".to_string());
        weather.api_key_env = Some("WEATHER_API_KEY".to_string());

        let adapter = ProviderFactory::create_with_env(&weather, |key| {
            (key == "WEATHER_API_KEY").then(|| "secret".to_string())
        });
        assert_eq!(adapter.name(), "weather-provider");
        assert_eq!(adapter.capability(), Capability::Weather);
    }
}
