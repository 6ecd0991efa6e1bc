//! Catalog port
//!
//! Read access to the marketplace listings searched by proximity.

use async_trait::async_trait;
use domain::{Event, Truck};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for reading located marketplace listings
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// All trucks with a known position
    async fn list_trucks(&self) -> Result<Vec<Truck>, ApplicationError>;

    /// All events with a known position
    async fn list_events(&self) -> Result<Vec<Event>, ApplicationError>;

    /// Check if the marketplace backend is reachable
    async fn is_available(&self) -> bool;
}
