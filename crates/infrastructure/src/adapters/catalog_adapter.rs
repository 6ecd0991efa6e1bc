//! Catalog adapter - Implements CatalogPort using integration_marketplace

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::CatalogPort;
use async_trait::async_trait;
use domain::{Event, Truck};
use integration_marketplace::{
    HttpMarketplaceClient, MarketplaceClient, MarketplaceConfig, MarketplaceError,
};
use tracing::instrument;

/// Adapter for the marketplace REST backend
pub struct MarketplaceCatalogAdapter {
    client: Arc<dyn MarketplaceClient>,
}

impl std::fmt::Debug for MarketplaceCatalogAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceCatalogAdapter")
            .field("client", &"dyn MarketplaceClient")
            .finish()
    }
}

impl MarketplaceCatalogAdapter {
    /// Create an adapter backed by the HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: MarketplaceConfig) -> Result<Self, ApplicationError> {
        let client = HttpMarketplaceClient::new(config).map_err(|e| {
            ApplicationError::Configuration(format!("Failed to create marketplace client: {e}"))
        })?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter around an existing client
    #[must_use]
    pub fn with_client(client: Arc<dyn MarketplaceClient>) -> Self {
        Self { client }
    }

    fn map_error(context: &str, error: &MarketplaceError) -> ApplicationError {
        ApplicationError::ExternalService(format!("{context}: {error}"))
    }
}

#[async_trait]
impl CatalogPort for MarketplaceCatalogAdapter {
    #[instrument(skip(self))]
    async fn list_trucks(&self) -> Result<Vec<Truck>, ApplicationError> {
        self.client
            .list_trucks()
            .await
            .map_err(|e| Self::map_error("Failed to list trucks", &e))
    }

    #[instrument(skip(self))]
    async fn list_events(&self) -> Result<Vec<Event>, ApplicationError> {
        self.client
            .list_events()
            .await
            .map_err(|e| Self::map_error("Failed to list events", &e))
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use domain::Coordinates;
    use mockall::mock;

    use super::*;

    mock! {
        pub Marketplace {}

        #[async_trait::async_trait]
        impl MarketplaceClient for Marketplace {
            async fn list_trucks(&self) -> Result<Vec<Truck>, MarketplaceError>;
            async fn list_events(&self) -> Result<Vec<Event>, MarketplaceError>;
            async fn is_healthy(&self) -> bool;
        }
    }

    #[tokio::test]
    async fn list_trucks_passes_through() {
        let mut client = MockMarketplace::new();
        client
            .expect_list_trucks()
            .returning(|| Ok(vec![Truck::new("t1", "Dosa Express", Coordinates::bhubaneswar())]));

        let adapter = MarketplaceCatalogAdapter::with_client(Arc::new(client));
        let trucks = adapter.list_trucks().await.unwrap();
        assert_eq!(trucks.len(), 1);
        assert_eq!(trucks[0].name, "Dosa Express");
    }

    #[tokio::test]
    async fn errors_become_external_service() {
        let mut client = MockMarketplace::new();
        client
            .expect_list_events()
            .returning(|| Err(MarketplaceError::Timeout));

        let adapter = MarketplaceCatalogAdapter::with_client(Arc::new(client));
        let err = adapter.list_events().await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(ref msg) if msg.contains("timed out")));
    }

    #[test]
    fn debug_output() {
        let adapter = MarketplaceCatalogAdapter::with_client(Arc::new(MockMarketplace::new()));
        assert!(format!("{adapter:?}").contains("MarketplaceCatalogAdapter"));
    }
}
