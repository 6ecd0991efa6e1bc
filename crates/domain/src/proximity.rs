//! Proximity engine
//!
//! Pure distance computation and radius filtering. No I/O, no state.

use serde::{Serialize, Serializer};

use crate::value_objects::Coordinates;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Anything with a position that can be searched by distance
pub trait Located {
    /// Position of the item
    fn coordinates(&self) -> Coordinates;
}

impl Located for Coordinates {
    fn coordinates(&self) -> Coordinates {
        *self
    }
}

/// An item annotated with its distance from a reference point
///
/// Derived per query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithDistance<T> {
    /// The annotated item
    #[serde(flatten)]
    pub item: T,
    /// Great-circle distance in kilometers (full precision; serialized rounded)
    #[serde(serialize_with = "serialize_rounded_km")]
    pub distance_km: f64,
    /// Whether the item lies within the queried radius
    pub within_radius: bool,
}

impl<T> WithDistance<T> {
    /// Distance rounded to two decimals for display
    #[must_use]
    pub fn display_distance_km(&self) -> f64 {
        round_km(self.distance_km)
    }
}

/// A truck annotated with its distance from a reference point
pub type TruckWithDistance = WithDistance<crate::Truck>;

/// Great-circle distance between two points in kilometers
///
/// Uses the haversine formula. Full precision is kept so that sorting is not
/// affected by display rounding.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
        (delta_lon / 2.0).sin().powi(2),
        (delta_lat / 2.0).sin().powi(2),
    );
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round a distance to two decimal places
#[must_use]
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

fn serialize_rounded_km<S: Serializer>(distance: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_km(*distance))
}

/// Annotate every item with its distance and radius membership, in input order
#[must_use]
pub fn annotate<T: Located + Clone>(
    items: &[T],
    reference: Coordinates,
    radius_km: f64,
) -> Vec<WithDistance<T>> {
    let radius_km = effective_radius(radius_km);
    items
        .iter()
        .map(|item| {
            let distance = distance_km(reference, item.coordinates());
            WithDistance {
                item: item.clone(),
                distance_km: distance,
                within_radius: distance <= radius_km,
            }
        })
        .collect()
}

/// Keep items within `radius_km` of `reference`, nearest first
///
/// Equal distances keep their input order. A negative or NaN radius is
/// treated as zero, so an item located exactly at the reference point is
/// always returned.
#[must_use]
pub fn filter_and_sort<T: Located + Clone>(
    items: &[T],
    reference: Coordinates,
    radius_km: f64,
) -> Vec<WithDistance<T>> {
    let mut nearby: Vec<WithDistance<T>> = annotate(items, reference, radius_km)
        .into_iter()
        .filter(|entry| entry.within_radius)
        .collect();
    // sort_by is stable
    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}

fn effective_radius(radius_km: f64) -> f64 {
    // f64::max returns the non-NaN operand
    radius_km.max(0.0)
}
