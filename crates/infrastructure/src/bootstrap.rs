//! Service wiring shared by the server and the CLI

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{CatalogPort, GeocodingPort};
use application::{HealthService, LocationService};
use tracing::info;

use crate::adapters::{GeocodingAdapter, MarketplaceCatalogAdapter, build_geolocation};
use crate::config::AppConfig;

/// The application services built from one configuration
#[derive(Debug)]
pub struct Services {
    pub location: LocationService,
    pub health: HealthService,
}

/// Build the adapters and services described by `config`
///
/// # Errors
///
/// Returns a configuration error if an HTTP client cannot be created or the
/// position source is inconsistent.
pub fn build_services(config: &AppConfig) -> Result<Services, ApplicationError> {
    let geocoder: Arc<dyn GeocodingPort> = Arc::new(
        GeocodingAdapter::new(&config.geocoding)?
            .with_min_query_chars(config.suggestions.min_query_chars),
    );
    let geolocation = build_geolocation(&config.geolocation)?;
    let catalog: Arc<dyn CatalogPort> =
        Arc::new(MarketplaceCatalogAdapter::new(config.marketplace.clone())?);

    let location = LocationService::new(Arc::clone(&geocoder), geolocation, Arc::clone(&catalog))
        .with_suggestion_config(config.suggestions.clone())
        .with_geolocation_options(config.geolocation.options)
        .with_default_radius_km(config.proximity.default_radius_km);
    let health = HealthService::new(geocoder, catalog);

    info!(
        geocoding = %config.geocoding.base_url,
        marketplace = %config.marketplace.base_url,
        geolocation = %config.geolocation.mode,
        "Services initialized"
    );
    Ok(Services { location, health })
}
