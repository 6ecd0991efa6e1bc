//! Health check handlers

use std::collections::BTreeMap;

use application::ServiceHealth;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub services: BTreeMap<String, ServiceHealth>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Readiness check - are the geocoding provider and marketplace reachable?
#[instrument(skip(state))]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let report = state.health_service.check_all().await;

    let status_code = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready: report.healthy,
            services: report.services,
            checked_at: report.checked_at,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_reports_version() {
        let Json(resp) = health_check().await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn readiness_response_serialization() {
        let mut services = BTreeMap::new();
        services.insert(
            "geocoding".to_string(),
            ServiceHealth {
                healthy: false,
                response_time_ms: None,
                error: Some("timed out".to_string()),
            },
        );
        let resp = ReadinessResponse {
            ready: false,
            services,
            checked_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ready"], false);
        assert_eq!(json["services"]["geocoding"]["error"], "timed out");
        assert!(json["services"]["geocoding"].get("response_time_ms").is_none());
    }
}
