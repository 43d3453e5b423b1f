//! Live HTTP provider.
//!
//! Issues `GET {base_url}/{capability}` with the query fields as URL
//! parameters and decodes the JSON answer into domain records. The body may
//! be either the `{ data, success, error? }` envelope or the bare payload.

use crate::providers::base::{ProviderAdapter, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tp_protocol::travel_models::{Capability, ProviderData, ProviderQuery, ProviderResult};

#[derive(Debug, Clone)]
pub struct HttpProvider {
    name: String,
    capability: Capability,
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

/// Accepted response shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope(ProviderResult<T>),
    Bare(T),
}

impl HttpProvider {
    /// Create a new HTTP provider.
    ///
    /// # Arguments
    ///
    /// * `name` - Adapter name reported by the health check
    /// * `capability` - The capability served by the remote API
    /// * `base_url` - API root; a trailing slash is ignored
    /// * `api_key` - Optional bearer token
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Transport` if the HTTP client cannot be built.
    pub fn new(
        name: impl Into<String>,
        capability: Capability,
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            capability,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.client.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: body.trim().chars().take(200).collect(),
            });
        }
        Ok(body)
    }
}

fn query_params(query: &ProviderQuery) -> Vec<(&'static str, String)> {
    match query {
        ProviderQuery::Attractions(q) => vec![
            ("location", q.location.clone()),
            ("limit", q.limit.to_string()),
        ],
        ProviderQuery::Places(q) => vec![
            ("query", q.query.clone()),
            ("location", q.location.clone()),
            ("limit", q.limit.to_string()),
        ],
        ProviderQuery::Flights(q) => {
            let mut params = vec![
                ("origin", q.origin.clone()),
                ("destination", q.destination.clone()),
                ("departureDate", q.departure_date.to_string()),
                ("adults", q.adults.to_string()),
                ("children", q.children.to_string()),
            ];
            if let Some(return_date) = q.return_date {
                params.push(("returnDate", return_date.to_string()));
            }
            params
        }
        ProviderQuery::Accommodations(q) => vec![
            ("location", q.location.clone()),
            ("checkIn", q.check_in.to_string()),
            ("checkOut", q.check_out.to_string()),
            ("adults", q.adults.to_string()),
            ("children", q.children.to_string()),
        ],
        ProviderQuery::Weather(q) => vec![("location", q.location.clone())],
    }
}

fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    match serde_json::from_str::<Payload<T>>(body) {
        Ok(Payload::Envelope(envelope)) => envelope.into_result().map_err(ProviderError::Failed),
        Ok(Payload::Bare(data)) => Ok(data),
        Err(e) => Err(ProviderError::Decode(e.to_string())),
    }
}

fn decode(capability: Capability, body: &str) -> Result<ProviderData, ProviderError> {
    match capability {
        Capability::Attractions => decode_payload(body).map(ProviderData::Attractions),
        Capability::Places => decode_payload(body).map(ProviderData::Places),
        Capability::Flights => decode_payload(body).map(ProviderData::Flights),
        Capability::Accommodations => decode_payload(body).map(ProviderData::Accommodations),
        Capability::Weather => decode_payload(body).map(ProviderData::Weather),
    }
}

#[async_trait]
impl ProviderAdapter for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        self.get("health", &[]).await.map(|_| ())
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<ProviderData, ProviderError> {
        if query.capability() != self.capability {
            return Err(ProviderError::InvalidQuery(format!(
                "adapter '{}' serves {} queries, got {}",
                self.name,
                self.capability,
                query.capability()
            )));
        }

        let body = self
            .get(self.capability.as_str(), &query_params(query))
            .await?;
        tracing::debug!(adapter = %self.name, bytes = body.len(), "provider response received");
        decode(self.capability, &body)
    }
}
