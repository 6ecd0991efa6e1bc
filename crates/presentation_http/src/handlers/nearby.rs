//! Nearby listing handlers
//!
//! Both endpoints accept either a position (`latitude` + `longitude`) or an
//! `address` that is geocoded first, plus an optional `radius_km`.

use axum::{
    Json,
    extract::{Query, State},
};
use domain::{Coordinates, Event, Truck, WithDistance};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Query for nearby listings
#[derive(Debug, Default, Deserialize)]
pub struct NearbyQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub radius_km: Option<f64>,
}

/// Nearby listings, nearest first
#[derive(Debug, Serialize)]
pub struct NearbyResponse<T> {
    /// Point the distances are measured from
    pub reference: Coordinates,
    /// Resolved address when the query was address-based
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Radius that was applied
    pub radius_km: f64,
    pub count: usize,
    pub results: Vec<WithDistance<T>>,
}

impl<T> NearbyResponse<T> {
    fn new(reference: Reference, radius_km: f64, results: Vec<WithDistance<T>>) -> Self {
        Self {
            reference: reference.coordinates,
            address: reference.address,
            radius_km,
            count: results.len(),
            results,
        }
    }
}

struct Reference {
    coordinates: Coordinates,
    address: Option<String>,
}

/// Turn the query into a reference point
async fn reference_point(state: &AppState, query: &NearbyQuery) -> Result<Reference, ApiError> {
    match (query.latitude, query.longitude, query.address.as_deref()) {
        (Some(latitude), Some(longitude), _) => {
            let coordinates = Coordinates::new(latitude, longitude)
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            Ok(Reference {
                coordinates,
                address: None,
            })
        },
        (None, None, Some(address)) if !address.trim().is_empty() => {
            let location = state.location_service.resolve_address(address).await?;
            debug!(resolved = %location.address, "Reference address resolved");
            Ok(Reference {
                coordinates: location.coordinates,
                address: Some(location.address),
            })
        },
        _ => Err(ApiError::BadRequest(
            "either latitude and longitude or address is required".to_string(),
        )),
    }
}

/// `GET /v1/trucks/nearby`
#[instrument(skip(state))]
pub async fn trucks(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbyResponse<Truck>>, ApiError> {
    let radius_km = state.location_service.radius_or_default(query.radius_km)?;
    let reference = reference_point(&state, &query).await?;
    let results = state
        .location_service
        .nearby_trucks(reference.coordinates, Some(radius_km))
        .await?;
    Ok(Json(NearbyResponse::new(reference, radius_km, results)))
}

/// `GET /v1/events/nearby`
#[instrument(skip(state))]
pub async fn events(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbyResponse<Event>>, ApiError> {
    let radius_km = state.location_service.radius_or_default(query.radius_km)?;
    let reference = reference_point(&state, &query).await?;
    let results = state
        .location_service
        .nearby_events(reference.coordinates, Some(radius_km))
        .await?;
    Ok(Json(NearbyResponse::new(reference, radius_km, results)))
}
