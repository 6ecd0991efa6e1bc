//! Application state shared across handlers

use std::sync::Arc;

use application::{HealthService, LocationService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Location resolution and proximity search
    pub location_service: Arc<LocationService>,
    /// Readiness probes for the external services
    pub health_service: Arc<HealthService>,
}

impl AppState {
    /// Bundle the services
    #[must_use]
    pub fn new(location_service: LocationService, health_service: HealthService) -> Self {
        Self {
            location_service: Arc::new(location_service),
            health_service: Arc::new(health_service),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("location_service", &self.location_service)
            .finish_non_exhaustive()
    }
}
