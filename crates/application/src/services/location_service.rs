//! Location service
//!
//! The consumer-facing entry point: resolving typed addresses, turning the
//! device position into an address, opening suggestion sessions and ranking
//! marketplace listings by distance.

use std::sync::Arc;

use chrono::Utc;
use domain::proximity::filter_and_sort;
use domain::{
    Coordinates, Event, GeocodingError, GeolocationError, GeolocationOptions, GeolocationOutcome,
    Located, ResolvedLocation, TruckWithDistance, WithDistance,
};
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{CatalogPort, GeocodingPort, GeolocationPort};
use crate::services::suggestion_session::{SuggestionConfig, SuggestionSession};

/// Default search radius in kilometers
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Location resolution and proximity search
pub struct LocationService {
    geocoder: Arc<dyn GeocodingPort>,
    geolocation: Arc<dyn GeolocationPort>,
    catalog: Arc<dyn CatalogPort>,
    suggestion_config: SuggestionConfig,
    geolocation_options: GeolocationOptions,
    default_radius_km: f64,
}

impl std::fmt::Debug for LocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService")
            .field("geolocation", &self.geolocation.source_name())
            .field("suggestion_config", &self.suggestion_config)
            .field("geolocation_options", &self.geolocation_options)
            .field("default_radius_km", &self.default_radius_km)
            .finish_non_exhaustive()
    }
}

impl LocationService {
    /// Create a service with default tuning
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn GeocodingPort>,
        geolocation: Arc<dyn GeolocationPort>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        Self {
            geocoder,
            geolocation,
            catalog,
            suggestion_config: SuggestionConfig::default(),
            geolocation_options: GeolocationOptions::default(),
            default_radius_km: DEFAULT_RADIUS_KM,
        }
    }

    /// Set the configuration used for new suggestion sessions
    #[must_use]
    pub fn with_suggestion_config(mut self, config: SuggestionConfig) -> Self {
        self.suggestion_config = config;
        self
    }

    /// Set the options used for position requests
    #[must_use]
    pub const fn with_geolocation_options(mut self, options: GeolocationOptions) -> Self {
        self.geolocation_options = options;
        self
    }

    /// Set the radius used when a caller does not pass one
    #[must_use]
    pub const fn with_default_radius_km(mut self, radius_km: f64) -> Self {
        self.default_radius_km = radius_km;
        self
    }

    /// Radius used when a caller does not pass one
    pub const fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    /// Resolve a typed address to coordinates
    #[instrument(skip(self))]
    pub async fn resolve_address(&self, text: &str) -> Result<ResolvedLocation, GeocodingError> {
        self.geocoder.forward_geocode(text).await
    }

    /// Address for a position, or the formatted coordinates if none is known
    #[instrument(skip(self))]
    pub async fn reverse(&self, coordinates: Coordinates) -> String {
        self.geocoder.reverse_geocode(coordinates).await
    }

    /// Open a new suggestion session for one search box
    pub fn suggestion_session(&self) -> SuggestionSession {
        SuggestionSession::new(Arc::clone(&self.geocoder), self.suggestion_config.clone())
    }

    /// Name of the configured position source
    pub fn position_source(&self) -> &'static str {
        self.geolocation.source_name()
    }

    /// Raw device position
    pub async fn current_position(&self) -> GeolocationOutcome {
        self.geolocation
            .current_position(&self.geolocation_options)
            .await
    }

    /// Device position together with its address
    ///
    /// Only geolocation failures surface; an unknown address falls back to
    /// the formatted coordinates.
    #[instrument(skip(self))]
    pub async fn use_current_location(&self) -> Result<ResolvedLocation, GeolocationError> {
        let coordinates = self.current_position().await.inspect_err(|e| {
            warn!(error = %e, source = self.geolocation.source_name(), "No device position");
        })?;

        let address = self.geocoder.reverse_geocode(coordinates).await;
        debug!(%address, "Current location resolved");
        Ok(ResolvedLocation::new(address, coordinates))
    }

    /// Items within `radius_km` of `reference`, nearest first
    pub fn nearby<T: Located + Clone>(
        &self,
        items: &[T],
        reference: Coordinates,
        radius_km: f64,
    ) -> Vec<WithDistance<T>> {
        filter_and_sort(items, reference, radius_km)
    }

    /// Validate a caller-supplied radius, falling back to the default
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative or non-finite values.
    pub fn radius_or_default(&self, radius_km: Option<f64>) -> Result<f64, ApplicationError> {
        match radius_km {
            None => Ok(self.default_radius_km),
            Some(r) if r.is_finite() && r >= 0.0 => Ok(r),
            Some(r) => Err(ApplicationError::validation(format!(
                "radius_km must be a non-negative number, got {r}"
            ))),
        }
    }

    /// Marketplace trucks near a position
    #[instrument(skip(self))]
    pub async fn nearby_trucks(
        &self,
        reference: Coordinates,
        radius_km: Option<f64>,
    ) -> Result<Vec<TruckWithDistance>, ApplicationError> {
        let radius_km = self.radius_or_default(radius_km)?;
        let trucks = self.catalog.list_trucks().await?;
        let nearby = self.nearby(&trucks, reference, radius_km);
        debug!(total = trucks.len(), nearby = nearby.len(), radius_km, "Trucks filtered");
        Ok(nearby)
    }

    /// Upcoming or running marketplace events near a position
    #[instrument(skip(self))]
    pub async fn nearby_events(
        &self,
        reference: Coordinates,
        radius_km: Option<f64>,
    ) -> Result<Vec<WithDistance<Event>>, ApplicationError> {
        let radius_km = self.radius_or_default(radius_km)?;
        let now = Utc::now();
        let events: Vec<Event> = self
            .catalog
            .list_events()
            .await?
            .into_iter()
            .filter(|event| !event.is_over(now))
            .collect();
        let nearby = self.nearby(&events, reference, radius_km);
        debug!(total = events.len(), nearby = nearby.len(), radius_km, "Events filtered");
        Ok(nearby)
    }

    /// Resolve an address, then list the trucks around it
    #[instrument(skip(self))]
    pub async fn trucks_near_address(
        &self,
        text: &str,
        radius_km: Option<f64>,
    ) -> Result<(ResolvedLocation, Vec<TruckWithDistance>), ApplicationError> {
        let radius_km = self.radius_or_default(radius_km)?;
        let location = self.resolve_address(text).await?;
        let trucks = self
            .nearby_trucks(location.coordinates, Some(radius_km))
            .await?;
        Ok((location, trucks))
    }
}

#[cfg(test)]
mod tests {
    use domain::Truck;
    use mockall::predicate::eq;

    use super::*;
    use crate::ports::{MockCatalogPort, MockGeocodingPort, MockGeolocationPort};

    fn janpath() -> Coordinates {
        Coordinates::new(20.2961, 85.8245).unwrap()
    }

    fn patia() -> Coordinates {
        Coordinates::new(20.3538, 85.8169).unwrap()
    }

    fn service(
        geocoder: MockGeocodingPort,
        geolocation: MockGeolocationPort,
        catalog: MockCatalogPort,
    ) -> LocationService {
        LocationService::new(Arc::new(geocoder), Arc::new(geolocation), Arc::new(catalog))
    }

    fn named_geolocation() -> MockGeolocationPort {
        let mut geolocation = MockGeolocationPort::new();
        geolocation.expect_source_name().return_const("mock");
        geolocation
    }

    #[tokio::test]
    async fn resolve_address_delegates() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_forward_geocode()
            .with(eq("Janpath"))
            .times(1)
            .returning(|_| Ok(ResolvedLocation::new("Janpath, Bhubaneswar", janpath())));

        let service = service(geocoder, named_geolocation(), MockCatalogPort::new());
        let resolved = service.resolve_address("Janpath").await.unwrap();
        assert_eq!(resolved.coordinates, janpath());
    }

    #[tokio::test]
    async fn resolve_address_keeps_error_kind() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_forward_geocode()
            .returning(|_| Err(GeocodingError::RateLimited { retry_after_secs: None }));

        let service = service(geocoder, named_geolocation(), MockCatalogPort::new());
        assert_eq!(
            service.resolve_address("Janpath").await,
            Err(GeocodingError::RateLimited { retry_after_secs: None })
        );
    }

    #[tokio::test]
    async fn use_current_location_reverse_geocodes() {
        let mut geolocation = named_geolocation();
        geolocation
            .expect_current_position()
            .returning(|_| Ok(janpath()));
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_reverse_geocode()
            .with(eq(janpath()))
            .returning(|_| "Janpath, Bhubaneswar".to_string());

        let service = service(geocoder, geolocation, MockCatalogPort::new());
        let location = service.use_current_location().await.unwrap();
        assert_eq!(location.address, "Janpath, Bhubaneswar");
        assert_eq!(location.coordinates, janpath());
    }

    #[tokio::test]
    async fn use_current_location_surfaces_geolocation_error() {
        let mut geolocation = named_geolocation();
        geolocation
            .expect_current_position()
            .returning(|_| Err(GeolocationError::PermissionDenied));
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_reverse_geocode().never();

        let service = service(geocoder, geolocation, MockCatalogPort::new());
        assert_eq!(
            service.use_current_location().await,
            Err(GeolocationError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn use_current_location_passes_configured_options() {
        let options = GeolocationOptions {
            high_accuracy: false,
            timeout_ms: 1_000,
            max_cache_age_ms: 0,
        };
        let mut geolocation = named_geolocation();
        geolocation
            .expect_current_position()
            .withf(move |o| *o == options)
            .returning(|_| Err(GeolocationError::Timeout));

        let service = service(MockGeocodingPort::new(), geolocation, MockCatalogPort::new())
            .with_geolocation_options(options);
        assert_eq!(
            service.use_current_location().await,
            Err(GeolocationError::Timeout)
        );
    }

    #[tokio::test]
    async fn nearby_trucks_filters_and_sorts() {
        let mut catalog = MockCatalogPort::new();
        catalog.expect_list_trucks().returning(|| {
            Ok(vec![
                Truck::new("far", "Far Away", Coordinates::berlin()),
                Truck::new("patia", "Patia Rolls", patia()),
                Truck::new("here", "Janpath Dosa", janpath()),
            ])
        });

        let service = service(MockGeocodingPort::new(), named_geolocation(), catalog);
        let trucks = service.nearby_trucks(janpath(), None).await.unwrap();

        let ids: Vec<&str> = trucks.iter().map(|t| t.item.id.as_str()).collect();
        assert_eq!(ids, vec!["here", "patia"]);
        assert!(trucks[0].distance_km < trucks[1].distance_km);
    }

    #[tokio::test]
    async fn nearby_trucks_rejects_negative_radius() {
        let mut catalog = MockCatalogPort::new();
        catalog.expect_list_trucks().never();

        let service = service(MockGeocodingPort::new(), named_geolocation(), catalog);
        let err = service.nearby_trucks(janpath(), Some(-1.0)).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn nearby_trucks_catalog_failure() {
        let mut catalog = MockCatalogPort::new();
        catalog
            .expect_list_trucks()
            .returning(|| Err(ApplicationError::ExternalService("HTTP 503".to_string())));

        let service = service(MockGeocodingPort::new(), named_geolocation(), catalog);
        let err = service.nearby_trucks(janpath(), Some(5.0)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[tokio::test]
    async fn nearby_events_uses_default_radius() {
        let mut catalog = MockCatalogPort::new();
        catalog.expect_list_events().returning(|| {
            Ok(vec![
                Event::new("e1", "Night Market", patia()),
                Event::new("e2", "Berlin Street Food", Coordinates::berlin()),
            ])
        });

        let service = service(MockGeocodingPort::new(), named_geolocation(), catalog)
            .with_default_radius_km(5.0);
        let events = service.nearby_events(janpath(), None).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn nearby_events_skips_finished_events() {
        let mut catalog = MockCatalogPort::new();
        catalog.expect_list_events().returning(|| {
            let mut finished = Event::new("old", "Last Year's Fair", patia());
            finished.ends_at = Some(Utc::now() - chrono::Duration::days(30));
            Ok(vec![finished, Event::new("new", "Night Market", patia())])
        });

        let service = service(MockGeocodingPort::new(), named_geolocation(), catalog);
        let events = service.nearby_events(janpath(), Some(10.0)).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].item.id, "new");
    }

    #[tokio::test]
    async fn trucks_near_address_resolves_first() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_forward_geocode()
            .returning(|_| Ok(ResolvedLocation::new("Patia, Bhubaneswar", patia())));
        let mut catalog = MockCatalogPort::new();
        catalog
            .expect_list_trucks()
            .returning(|| Ok(vec![Truck::new("patia", "Patia Rolls", patia())]));

        let service = service(geocoder, named_geolocation(), catalog);
        let (location, trucks) = service.trucks_near_address("Patia", Some(1.0)).await.unwrap();
        assert_eq!(location.address, "Patia, Bhubaneswar");
        assert_eq!(trucks.len(), 1);
        assert!(trucks[0].distance_km.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn trucks_near_unknown_address() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_forward_geocode()
            .returning(|a| Err(GeocodingError::AddressNotFound(a.to_string())));
        let mut catalog = MockCatalogPort::new();
        catalog.expect_list_trucks().never();

        let service = service(geocoder, named_geolocation(), catalog);
        let err = service.trucks_near_address("Atlantis", None).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Geocoding(GeocodingError::AddressNotFound(_))
        ));
    }

    #[test]
    fn radius_or_default() {
        let service = service(
            MockGeocodingPort::new(),
            named_geolocation(),
            MockCatalogPort::new(),
        );
        assert!((service.radius_or_default(None).unwrap() - DEFAULT_RADIUS_KM).abs() < f64::EPSILON);
        assert!((service.radius_or_default(Some(0.0)).unwrap()).abs() < f64::EPSILON);
        assert!(service.radius_or_default(Some(f64::NAN)).is_err());
        assert!(service.radius_or_default(Some(f64::INFINITY)).is_err());
    }
}
