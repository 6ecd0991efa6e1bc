//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the Nominatim and marketplace
//! clients and the configured position source. Also owns configuration
//! loading and logging setup.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::{Services, build_services};
pub use config::{
    AppConfig, FixedPositionConfig, GeolocationConfig, GeolocationMode, ProximityConfig,
    ServerConfig,
};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
