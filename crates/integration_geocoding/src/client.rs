//! Nominatim geocoding client
//!
//! Converts free-form address strings to geographic coordinates and back
//! using the [Nominatim](https://nominatim.openstreetmap.org) API.
//!
//! Requests are paced according to the Nominatim usage policy
//! (default: at most one request per 1.1 seconds). Results are not cached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::NominatimConfig;
use crate::error::NominatimError;
use crate::models::{GeoPlace, RawReverseResult, RawSearchResult};

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve a free-form address to the single best match
    async fn geocode(&self, address: &str) -> Result<GeoPlace, NominatimError>;

    /// Search for up to `limit` places matching a (partial) address, in provider order
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<GeoPlace>, NominatimError>;

    /// Convert coordinates to a human-readable address
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, NominatimError>;

    /// Check if the provider is reachable
    async fn is_healthy(&self) -> bool;
}

/// Nominatim-based geocoding client with request pacing
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, NominatimError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| NominatimError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            last_request: Mutex::new(None),
        })
    }

    /// Wait until the configured minimum spacing since the last request has passed
    async fn pace(&self) {
        if !self.config.pacing_enabled() {
            return;
        }

        let interval = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed);
                debug!(?wait, "Pacing geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Query parameters shared by every endpoint
    fn common_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", "jsonv2".to_string()),
            ("accept-language", self.config.accept_language.clone()),
        ]
    }

    /// Issue a paced GET request and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, NominatimError> {
        self.pace().await;

        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NominatimError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(NominatimError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| NominatimError::ParseError(e.to_string()))
    }

    /// Run a `/search` query and return the raw entries
    async fn search_raw(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<RawSearchResult>, NominatimError> {
        let mut params = self.common_params();
        params.push(("q", query.to_string()));
        params.push(("limit", limit.to_string()));

        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        self.get_json("search", &params).await
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeoPlace, NominatimError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(NominatimError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }

        debug!(%address, "Geocoding address");

        let result = self
            .search_raw(address, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| NominatimError::AddressNotFound(address.to_string()))?;

        let place = result.into_place(address)?;
        debug!(%address, lat = place.latitude, lon = place.longitude, "Geocoded address");
        Ok(place)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<GeoPlace>, NominatimError> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let raw = self.search_raw(query, limit).await?;

        let places: Vec<GeoPlace> = raw
            .into_iter()
            .filter_map(|entry| match entry.into_place(query) {
                Ok(place) => Some(place),
                Err(e) => {
                    debug!(error = %e, "Skipping unparsable search result");
                    None
                },
            })
            .take(usize::from(limit))
            .collect();

        debug!(%query, count = places.len(), "Address search completed");
        Ok(places)
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, NominatimError> {
        let mut params = self.common_params();
        params.push(("lat", latitude.to_string()));
        params.push(("lon", longitude.to_string()));

        debug!(%latitude, %longitude, "Reverse geocoding");

        let result: RawReverseResult = self.get_json("reverse", &params).await?;

        if let Some(error) = result.error {
            debug!(%error, "Reverse geocoding returned no address");
        }

        result
            .display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| NominatimError::AddressNotFound(format!("{latitude},{longitude}")))
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/status", self.config.base_url.trim_end_matches('/'));
        self.client
            .get(&url)
            .query(&[("format", "json")])
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = NominatimGeocodingClient::new(&NominatimConfig::for_testing());
        assert!(client.is_ok());
    }

    #[test]
    fn test_common_params() {
        let config = NominatimConfig {
            accept_language: "or,en".to_string(),
            ..NominatimConfig::for_testing()
        };
        let client = NominatimGeocodingClient::new(&config).unwrap();
        let params = client.common_params();
        assert!(params.contains(&("format", "jsonv2".to_string())));
        assert!(params.contains(&("accept-language", "or,en".to_string())));
    }

    #[tokio::test]
    async fn test_geocode_empty_address() {
        let client = NominatimGeocodingClient::new(&NominatimConfig::for_testing()).unwrap();
        let result = client.geocode("   ").await;
        assert!(matches!(result, Err(NominatimError::AddressNotFound(_))));
    }

    #[tokio::test]
    async fn test_search_empty_query_makes_no_request() {
        let config = NominatimConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..NominatimConfig::for_testing()
        };
        let client = NominatimGeocodingClient::new(&config).unwrap();
        assert!(client.search("", 5).await.unwrap().is_empty());
        assert!(client.search("Janpath", 0).await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_spaces_requests() {
        let config = NominatimConfig {
            min_request_interval_ms: 1000,
            ..NominatimConfig::for_testing()
        };
        let client = NominatimGeocodingClient::new(&config).unwrap();

        let start = Instant::now();
        client.pace().await;
        client.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
