//! Geolocation port
//!
//! Interface to whatever can tell the current device position.

use async_trait::async_trait;
use domain::{GeolocationOptions, GeolocationOutcome};
#[cfg(test)]
use mockall::automock;

/// Port for obtaining the current position
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeolocationPort: Send + Sync {
    /// Request the current position
    ///
    /// Resolves to coordinates or exactly one of the four geolocation
    /// failure reasons. Sources that do not exist on this platform answer
    /// `Unsupported` immediately.
    async fn current_position(&self, options: &GeolocationOptions) -> GeolocationOutcome;

    /// Short name of the position source, for logs and health output
    fn source_name(&self) -> &'static str;
}
