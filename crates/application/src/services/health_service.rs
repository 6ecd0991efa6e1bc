//! Readiness checks for the external services
//!
//! Probes the geocoding provider and the marketplace backend, each bounded by
//! a timeout, and reports per-service status.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::ports::{CatalogPort, GeocodingPort};

/// Default timeout for a single probe in seconds
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Status of one external service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Whether the service answered successfully
    pub healthy: bool,
    /// Probe round-trip in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated readiness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// True if every service is healthy
    pub healthy: bool,
    /// Status per service name
    pub services: BTreeMap<String, ServiceHealth>,
    /// When the probes ran
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    fn new(services: BTreeMap<String, ServiceHealth>) -> Self {
        Self {
            healthy: services.values().all(|s| s.healthy),
            services,
            checked_at: chrono::Utc::now(),
        }
    }
}

/// Probes the geocoding provider and the marketplace backend
pub struct HealthService {
    geocoder: Arc<dyn GeocodingPort>,
    catalog: Arc<dyn CatalogPort>,
    probe_timeout: Duration,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("probe_timeout", &self.probe_timeout)
            .finish_non_exhaustive()
    }
}

impl HealthService {
    /// Create a health service with the default probe timeout
    #[must_use]
    pub fn new(geocoder: Arc<dyn GeocodingPort>, catalog: Arc<dyn CatalogPort>) -> Self {
        Self {
            geocoder,
            catalog,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }

    /// Override the per-probe timeout
    #[must_use]
    pub const fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// Probe every service
    #[instrument(skip(self))]
    pub async fn check_all(&self) -> HealthReport {
        let (geocoding, marketplace) = tokio::join!(
            self.probe("geocoding", self.geocoder.is_available()),
            self.probe("marketplace", self.catalog.is_available()),
        );

        let mut services = BTreeMap::new();
        services.insert("geocoding".to_string(), geocoding);
        services.insert("marketplace".to_string(), marketplace);
        HealthReport::new(services)
    }

    async fn probe(&self, name: &str, check: impl Future<Output = bool>) -> ServiceHealth {
        let start = Instant::now();
        let Ok(available) = timeout(self.probe_timeout, check).await else {
            warn!(service = name, "Health probe timed out");
            return ServiceHealth {
                healthy: false,
                response_time_ms: None,
                error: Some("Health check timed out".to_string()),
            };
        };

        let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        if available {
            debug!(service = name, response_time_ms, "Service healthy");
        } else {
            warn!(service = name, response_time_ms, "Service unavailable");
        }

        ServiceHealth {
            healthy: available,
            response_time_ms: Some(response_time_ms),
            error: (!available).then(|| format!("{name} unavailable")),
        }
    }
}
