//! Marketplace REST client
//!
//! HTTP client for the listing endpoints of the marketplace backend.

use std::time::Duration;

use async_trait::async_trait;
use domain::{Event, Truck};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{ListResponse, RawEvent, RawTruck};

/// Marketplace client errors
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// Connection to the backend failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The backend answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the backend response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Request timeout
    #[error("Request timed out")]
    Timeout,
}

/// Marketplace backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Base URL of the REST API (default: <http://localhost:5000/api>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl MarketplaceConfig {
    /// Create a configuration pointing at a test server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 2,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("marketplace.base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("marketplace.timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Marketplace client trait for fetching listings
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    /// List all trucks that have a known position
    async fn list_trucks(&self) -> Result<Vec<Truck>, MarketplaceError>;

    /// List all events that have a known position
    async fn list_events(&self) -> Result<Vec<Event>, MarketplaceError>;

    /// Check if the backend is reachable
    async fn is_healthy(&self) -> bool;
}

/// HTTP implementation of the marketplace client
#[derive(Debug)]
pub struct HttpMarketplaceClient {
    client: Client,
    config: MarketplaceConfig,
}

impl HttpMarketplaceClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: MarketplaceConfig) -> Result<Self, MarketplaceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MarketplaceError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Vec<T>, MarketplaceError> {
        let url = self.url(endpoint);
        debug!(%url, "Fetching marketplace listing");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketplaceError::Timeout
            } else {
                MarketplaceError::ConnectionFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(MarketplaceError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MarketplaceError::ParseError(e.to_string()))?;

        let list: ListResponse<T> =
            serde_json::from_str(&body).map_err(|e| MarketplaceError::ParseError(e.to_string()))?;

        Ok(list.into_items())
    }
}

#[async_trait]
impl MarketplaceClient for HttpMarketplaceClient {
    #[instrument(skip(self))]
    async fn list_trucks(&self) -> Result<Vec<Truck>, MarketplaceError> {
        let raw: Vec<RawTruck> = self.fetch_list("trucks").await?;
        let total = raw.len();

        let trucks: Vec<Truck> = raw.into_iter().filter_map(RawTruck::into_truck).collect();
        if trucks.len() < total {
            warn!(
                skipped = total - trucks.len(),
                "Skipped trucks without a valid location"
            );
        }

        debug!(count = trucks.len(), "Trucks loaded");
        Ok(trucks)
    }

    #[instrument(skip(self))]
    async fn list_events(&self) -> Result<Vec<Event>, MarketplaceError> {
        let raw: Vec<RawEvent> = self.fetch_list("events").await?;
        let total = raw.len();

        let events: Vec<Event> = raw.into_iter().filter_map(RawEvent::into_event).collect();
        if events.len() < total {
            warn!(
                skipped = total - events.len(),
                "Skipped events without a valid location"
            );
        }

        debug!(count = events.len(), "Events loaded");
        Ok(events)
    }

    async fn is_healthy(&self) -> bool {
        self.client
            .get(self.url("trucks"))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarketplaceConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = MarketplaceConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = HttpMarketplaceClient::new(MarketplaceConfig {
            base_url: "http://backend/api/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.url("trucks"), "http://backend/api/trucks");
    }
}
