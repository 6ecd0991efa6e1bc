//! Raw marketplace API records and their conversion to domain listings

use chrono::{DateTime, Utc};
use domain::{Coordinates, Event, Truck};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A list endpoint may answer with a bare array or a `{ "data": [...] }` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Bare(Vec<T>),
    Envelope { data: Vec<T> },
}

impl<T: DeserializeOwned> ListResponse<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Envelope { data: items } => items,
        }
    }
}

/// GeoJSON point
#[derive(Debug, Deserialize)]
pub(crate) struct RawGeoPoint {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl RawGeoPoint {
    fn to_coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_geojson_position(&self.coordinates).ok()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTruck {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub cuisine: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub location: Option<RawGeoPoint>,
}

impl RawTruck {
    /// Convert to a domain truck, or `None` if the record has no valid position
    pub(crate) fn into_truck(self) -> Option<Truck> {
        let coordinates = self.location.as_ref()?.to_coordinates()?;
        Some(Truck {
            id: self.id,
            name: self.name,
            cuisine: self.cuisine,
            description: self.description,
            address: self.address,
            coordinates,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEvent {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(alias = "startDate")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(alias = "endDate")]
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<RawGeoPoint>,
}

impl RawEvent {
    /// Convert to a domain event, or `None` if the record has no valid position
    pub(crate) fn into_event(self) -> Option<Event> {
        let coordinates = self.location.as_ref()?.to_coordinates()?;
        Some(Event {
            id: self.id,
            title: self.title,
            description: self.description,
            address: self.address,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            coordinates,
        })
    }
}
