//! Application services - Use case implementations

mod health_service;
mod location_service;
mod suggestion_session;

pub use health_service::{HealthReport, HealthService, ServiceHealth};
pub use location_service::{DEFAULT_RADIUS_KM, LocationService};
pub use suggestion_session::{
    SessionPhase, SuggestionConfig, SuggestionSession, SuggestionSnapshot,
};
