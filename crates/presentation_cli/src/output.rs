//! Plain-text rendering of command results

use std::fmt::Write as _;

use application::{HealthReport, SuggestionSnapshot};
use domain::{Event, ResolvedLocation, Truck, WithDistance};

/// One resolved location on a single line
pub fn location(location: &ResolvedLocation) -> String {
    format!("{} ({})", location.address, location.coordinates)
}

/// Numbered suggestion list, 1-based to match the `:N` selection syntax
pub fn suggestions(snapshot: &SuggestionSnapshot) -> String {
    if snapshot.candidates.is_empty() {
        return "  (no suggestions)".to_string();
    }

    let mut out = String::new();
    for (i, candidate) in snapshot.candidates.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, candidate.address);
    }
    out.trim_end().to_string()
}

/// Label for a truck row
pub fn truck_label(truck: &Truck) -> String {
    match &truck.cuisine {
        Some(cuisine) => format!("{} [{cuisine}]", truck.name),
        None => truck.name.clone(),
    }
}

/// Label for an event row
pub fn event_label(event: &Event) -> String {
    match event.starts_at {
        Some(start) => format!("{} ({})", event.title, start.format("%Y-%m-%d %H:%M")),
        None => event.title.clone(),
    }
}

/// Distance-ordered listing
pub fn nearby<T>(results: &[WithDistance<T>], radius_km: f64, label: impl Fn(&T) -> String) -> String {
    if results.is_empty() {
        return format!("Nothing within {radius_km} km");
    }

    let mut out = format!("{} within {radius_km} km:\n", results.len());
    for entry in results {
        let _ = writeln!(
            out,
            "  {:>7.2} km  {}",
            entry.display_distance_km(),
            label(&entry.item)
        );
    }
    out.trim_end().to_string()
}

/// Readiness per service
pub fn health(report: &HealthReport) -> String {
    let mut out = String::new();
    for (name, status) in &report.services {
        let state = if status.healthy { "ok" } else { "unavailable" };
        let _ = write!(out, "  {name:<12} {state}");
        if let Some(ms) = status.response_time_ms {
            let _ = write!(out, " ({ms} ms)");
        }
        if let Some(error) = &status.error {
            let _ = write!(out, " - {error}");
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}
