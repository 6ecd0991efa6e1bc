//! Location resolution handlers

use axum::{
    Json,
    extract::{Query, State},
};
use domain::{Coordinates, ResolvedLocation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Query for forward geocoding
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Free-form address text
    pub address: String,
}

/// Query carrying a position
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PositionQuery {
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionQuery {
    /// Validate into coordinates
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for out-of-range values.
    pub fn coordinates(self) -> Result<Coordinates, ApiError> {
        Coordinates::new(self.latitude, self.longitude)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Response for the current-location endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentLocationResponse {
    #[serde(flatten)]
    pub location: ResolvedLocation,
    /// Which position source answered
    pub source: String,
}

/// `GET /v1/location/resolve?address=`
#[instrument(skip(state))]
pub async fn resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    if query.address.trim().is_empty() {
        return Err(ApiError::BadRequest("address must not be empty".to_string()));
    }
    let location = state.location_service.resolve_address(&query.address).await?;
    Ok(Json(location))
}

/// `GET /v1/location/reverse?latitude=&longitude=`
///
/// Never fails for valid coordinates: provider failures fall back to the
/// formatted coordinates.
#[instrument(skip(state))]
pub async fn reverse(
    State(state): State<AppState>,
    Query(query): Query<PositionQuery>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    let coordinates = query.coordinates()?;
    let address = state.location_service.reverse(coordinates).await;
    Ok(Json(ResolvedLocation::new(address, coordinates)))
}

/// `GET /v1/location/current`
#[instrument(skip(state))]
pub async fn current(
    State(state): State<AppState>,
) -> Result<Json<CurrentLocationResponse>, ApiError> {
    let location = state.location_service.use_current_location().await?;
    let source = state.location_service.position_source().to_string();
    debug!(%source, address = %location.address, "Current location served");
    Ok(Json(CurrentLocationResponse { location, source }))
}
