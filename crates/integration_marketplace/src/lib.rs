//! Marketplace backend integration for TruckScout
//!
//! Reads truck and event listings from the marketplace REST API. Records
//! carry their position as a GeoJSON point (`location.coordinates` is
//! `[longitude, latitude]`); records without a usable position are skipped.

mod client;
mod models;

pub use client::{HttpMarketplaceClient, MarketplaceClient, MarketplaceConfig, MarketplaceError};
