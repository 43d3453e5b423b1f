//! Facade over the travel-data adapters.
//!
//! The `ApiServiceManager` is responsible for:
//! - Holding exactly one adapter per capability
//! - Validating queries before they reach an adapter
//! - Wrapping every outcome in a [`ProviderResult`] envelope
//! - Probing all adapters concurrently for the health check

use crate::providers::base::{validate_query, ProviderAdapter, ProviderError};
use crate::providers::mock::MockProvider;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tp_protocol::travel_models::{
    Accommodation, AccommodationQuery, Attraction, AttractionQuery, Capability, Flight,
    FlightQuery, HealthReport, HealthStatus, Place, PlaceQuery, ProviderData, ProviderHealth,
    ProviderQuery, ProviderResult, WeatherQuery, WeatherReport,
};

/// Routes typed queries to the adapter registered for their capability.
///
/// Built once through [`ApiServiceManagerBuilder`] and shared by `Arc` with
/// every planning run.
pub struct ApiServiceManager {
    adapters: HashMap<Capability, Arc<dyn ProviderAdapter>>,
}

impl std::fmt::Debug for ApiServiceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut adapters: Vec<_> = self
            .adapters
            .iter()
            .map(|(capability, adapter)| (*capability, adapter.name().to_string()))
            .collect();
        adapters.sort();
        f.debug_struct("ApiServiceManager")
            .field("adapters", &adapters)
            .finish()
    }
}

#[derive(Default)]
pub struct ApiServiceManagerBuilder {
    adapters: HashMap<Capability, Arc<dyn ProviderAdapter>>,
}

impl ApiServiceManagerBuilder {
    /// Register an adapter under its own capability.
    ///
    /// A later registration for the same capability replaces the earlier one.
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.capability(), adapter);
        self
    }

    pub fn build(self) -> ApiServiceManager {
        ApiServiceManager {
            adapters: self.adapters,
        }
    }
}

impl ApiServiceManager {
    pub fn builder() -> ApiServiceManagerBuilder {
        ApiServiceManagerBuilder::default()
    }

    /// A manager with a healthy mock adapter for every capability.
    pub fn mock() -> Self {
        Capability::ALL
            .into_iter()
            .fold(Self::builder(), |builder, capability| {
                builder.with_adapter(Arc::new(MockProvider::success(capability)))
            })
            .build()
    }

    /// Get the adapter serving a capability.
    pub fn adapter(&self, capability: Capability) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&capability).cloned()
    }

    /// Check if an adapter is registered for the capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.adapters.contains_key(&capability)
    }

    /// List the registered capabilities in stable order.
    pub fn capabilities(&self) -> Vec<Capability> {
        let mut capabilities: Vec<_> = self.adapters.keys().copied().collect();
        capabilities.sort();
        capabilities
    }

    pub async fn search_attractions(
        &self,
        query: AttractionQuery,
    ) -> ProviderResult<Vec<Attraction>> {
        self.dispatch(ProviderQuery::Attractions(query), |data| match data {
            ProviderData::Attractions(items) => Ok(items),
            other => Err(other.capability()),
        })
        .await
    }

    pub async fn search_places(&self, query: PlaceQuery) -> ProviderResult<Vec<Place>> {
        self.dispatch(ProviderQuery::Places(query), |data| match data {
            ProviderData::Places(items) => Ok(items),
            other => Err(other.capability()),
        })
        .await
    }

    pub async fn search_flights(&self, query: FlightQuery) -> ProviderResult<Vec<Flight>> {
        self.dispatch(ProviderQuery::Flights(query), |data| match data {
            ProviderData::Flights(items) => Ok(items),
            other => Err(other.capability()),
        })
        .await
    }

    pub async fn search_accommodations(
        &self,
        query: AccommodationQuery,
    ) -> ProviderResult<Vec<Accommodation>> {
        self.dispatch(ProviderQuery::Accommodations(query), |data| match data {
            ProviderData::Accommodations(items) => Ok(items),
            other => Err(other.capability()),
        })
        .await
    }

    /// Current weather at a location. `data` is `None` on failure.
    pub async fn get_current_weather(
        &self,
        query: WeatherQuery,
    ) -> ProviderResult<Option<WeatherReport>> {
        self.dispatch(ProviderQuery::Weather(query), |data| match data {
            ProviderData::Weather(report) => Ok(Some(report)),
            other => Err(other.capability()),
        })
        .await
    }

    /// Validate, route and unwrap one query.
    ///
    /// Every failure is folded into the envelope; nothing escapes as `Err`.
    async fn dispatch<T, F>(&self, query: ProviderQuery, extract: F) -> ProviderResult<T>
    where
        T: Default,
        F: FnOnce(ProviderData) -> Result<T, Capability>,
    {
        let capability = query.capability();
        match self.fetch(&query).await.and_then(|data| {
            extract(data).map_err(|actual| ProviderError::UnexpectedPayload {
                adapter: self
                    .adapters
                    .get(&capability)
                    .map(|a| a.name().to_string())
                    .unwrap_or_default(),
                expected: capability,
                actual,
            })
        }) {
            Ok(data) => ProviderResult::ok(data),
            Err(err) => {
                tracing::warn!(%capability, error = %err, "provider call failed");
                ProviderResult::err(err.to_string())
            }
        }
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<ProviderData, ProviderError> {
        let capability = query.capability();
        validate_query(query)?;
        let adapter = self
            .adapters
            .get(&capability)
            .ok_or(ProviderError::NotRegistered(capability))?;

        tracing::debug!(%capability, adapter = adapter.name(), "dispatching provider query");
        adapter.fetch(query).await
    }

    /// Probe every registered adapter concurrently.
    ///
    /// A failing probe marks its own entry unhealthy and never aborts the
    /// others. The overall status is healthy only when every probe passed.
    pub async fn health_check(&self) -> HealthReport {
        let mut probes = JoinSet::new();
        for (capability, adapter) in &self.adapters {
            let capability = *capability;
            let adapter = Arc::clone(adapter);
            probes.spawn(async move {
                let started = Instant::now();
                let outcome = adapter.probe().await;
                let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                let health = match outcome {
                    Ok(()) => ProviderHealth {
                        adapter: adapter.name().to_string(),
                        status: HealthStatus::Healthy,
                        error: None,
                        latency_ms,
                    },
                    Err(err) => ProviderHealth {
                        adapter: adapter.name().to_string(),
                        status: HealthStatus::Unhealthy,
                        error: Some(err.to_string()),
                        latency_ms,
                    },
                };
                (capability, health)
            });
        }

        let mut providers = BTreeMap::new();
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((capability, health)) => {
                    if health.status == HealthStatus::Unhealthy {
                        tracing::warn!(
                            %capability,
                            adapter = %health.adapter,
                            error = health.error.as_deref().unwrap_or_default(),
                            "provider probe failed"
                        );
                    }
                    providers.insert(capability, health);
                }
                Err(err) => tracing::error!(error = %err, "provider probe task aborted"),
            }
        }

        // A probe task that panicked still gets an entry.
        for (capability, adapter) in &self.adapters {
            providers.entry(*capability).or_insert_with(|| ProviderHealth {
                adapter: adapter.name().to_string(),
                status: HealthStatus::Unhealthy,
                error: Some("probe aborted".to_string()),
                latency_ms: 0,
            });
        }

        let status = if providers
            .values()
            .all(|health| health.status == HealthStatus::Healthy)
        {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        HealthReport {
            status,
            providers,
            timestamp: Utc::now(),
        }
    }
}
