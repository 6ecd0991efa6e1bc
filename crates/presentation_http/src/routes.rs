//! Route definitions

use axum::{Router, routing::get};

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Location API (v1)
        .route("/v1/location/resolve", get(handlers::location::resolve))
        .route("/v1/location/reverse", get(handlers::location::reverse))
        .route("/v1/location/current", get(handlers::location::current))
        .route(
            "/v1/location/suggestions",
            get(handlers::suggestions::suggestions),
        )
        // Proximity search (v1)
        .route("/v1/trucks/nearby", get(handlers::nearby::trucks))
        .route("/v1/events/nearby", get(handlers::nearby::events))
        .layer(RequestIdLayer::new())
        .with_state(state)
}
