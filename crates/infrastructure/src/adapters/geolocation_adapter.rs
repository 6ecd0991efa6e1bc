//! Geolocation adapters - Implement GeolocationPort
//!
//! A server process has no GPS receiver, so the position comes from one of:
//! - a fixed, configured position (kiosks, tests)
//! - an IP-based lookup against an ip-api compatible service
//! - nothing at all, in which case every request answers `Unsupported`
//!
//! [`CachedGeolocation`] wraps any source and honors `max_cache_age_ms`.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::GeolocationPort;
use async_trait::async_trait;
use domain::{Coordinates, GeolocationError, GeolocationOptions, GeolocationOutcome};
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::{GeolocationConfig, GeolocationMode};

/// Build the position source selected in the configuration
///
/// # Errors
///
/// Returns an error if the configuration is inconsistent or the HTTP client
/// cannot be created.
pub fn build_geolocation(
    config: &GeolocationConfig,
) -> Result<Arc<dyn GeolocationPort>, ApplicationError> {
    let source: Arc<dyn GeolocationPort> = match config.mode {
        GeolocationMode::None => Arc::new(FixedGeolocationAdapter::unsupported()),
        GeolocationMode::Fixed => {
            let fixed = config.fixed.as_ref().ok_or_else(|| {
                ApplicationError::Configuration("geolocation.fixed is not set".to_string())
            })?;
            let position = fixed.coordinates().map_err(ApplicationError::Configuration)?;
            Arc::new(FixedGeolocationAdapter::new(position))
        },
        GeolocationMode::Ip => Arc::new(CachedGeolocation::new(IpGeolocationAdapter::new(
            &config.ip_lookup_url,
        )?)),
    };

    debug!(source = source.source_name(), "Geolocation source configured");
    Ok(source)
}

/// Position source answering with a configured position
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocationAdapter {
    position: Option<Coordinates>,
}

impl FixedGeolocationAdapter {
    /// Always answer with `position`
    #[must_use]
    pub const fn new(position: Coordinates) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// A source that does not exist
    #[must_use]
    pub const fn unsupported() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl GeolocationPort for FixedGeolocationAdapter {
    async fn current_position(&self, _options: &GeolocationOptions) -> GeolocationOutcome {
        self.position.ok_or(GeolocationError::Unsupported)
    }

    fn source_name(&self) -> &'static str {
        if self.position.is_some() {
            "fixed"
        } else {
            "none"
        }
    }
}

/// Response of an ip-api compatible `/json` endpoint
#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Position source based on the public IP address of the host
#[derive(Debug)]
pub struct IpGeolocationAdapter {
    client: Client,
    base_url: String,
}

impl IpGeolocationAdapter {
    /// Create an adapter for the given lookup service
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(base_url: &str) -> Result<Self, ApplicationError> {
        let client = Client::builder().build().map_err(|e| {
            ApplicationError::Configuration(format!("Failed to create IP lookup client: {e}"))
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn lookup(&self) -> GeolocationOutcome {
        let url = format!("{}/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeolocationError::Timeout
                } else {
                    warn!(error = %e, "IP lookup request failed");
                    GeolocationError::PositionUnavailable
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GeolocationError::PermissionDenied);
        }
        if !status.is_success() {
            warn!(%status, "IP lookup returned an error status");
            return Err(GeolocationError::PositionUnavailable);
        }

        let body: IpLookupResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "IP lookup returned an unreadable body");
            GeolocationError::PositionUnavailable
        })?;

        if body.status != "success" {
            warn!(message = ?body.message, "IP lookup could not locate this host");
            return Err(GeolocationError::PositionUnavailable);
        }

        let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
            return Err(GeolocationError::PositionUnavailable);
        };
        Coordinates::new(lat, lon).map_err(|_| GeolocationError::PositionUnavailable)
    }
}

#[async_trait]
impl GeolocationPort for IpGeolocationAdapter {
    #[instrument(skip(self))]
    async fn current_position(&self, options: &GeolocationOptions) -> GeolocationOutcome {
        if options.high_accuracy {
            debug!("High accuracy requested, IP lookup is city-level at best");
        }

        let position = tokio::time::timeout(options.timeout(), self.lookup())
            .await
            .map_err(|_| GeolocationError::Timeout)??;

        debug!(%position, "Position from IP lookup");
        Ok(position)
    }

    fn source_name(&self) -> &'static str {
        "ip"
    }
}

/// Decorator reusing a recent fix for up to `max_cache_age_ms`
#[derive(Debug)]
pub struct CachedGeolocation<P> {
    inner: P,
    last_fix: Mutex<Option<(Instant, Coordinates)>>,
}

impl<P: GeolocationPort> CachedGeolocation<P> {
    /// Wrap a position source
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            last_fix: Mutex::new(None),
        }
    }

    fn cached(&self, options: &GeolocationOptions) -> Option<Coordinates> {
        if options.max_cache_age_ms == 0 {
            return None;
        }
        let last_fix = *self.last_fix.lock();
        last_fix
            .filter(|(at, _)| at.elapsed() <= options.max_cache_age())
            .map(|(_, position)| position)
    }
}

#[async_trait]
impl<P: GeolocationPort> GeolocationPort for CachedGeolocation<P> {
    async fn current_position(&self, options: &GeolocationOptions) -> GeolocationOutcome {
        if let Some(position) = self.cached(options) {
            debug!(%position, "Using cached position");
            return Ok(position);
        }

        let position = self.inner.current_position(options).await?;
        *self.last_fix.lock() = Some((Instant::now(), position));
        Ok(position)
    }

    fn source_name(&self) -> &'static str {
        self.inner.source_name()
    }
}
