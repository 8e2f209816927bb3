//! Proximity filter for the map screen.
//!
//! Great-circle distance, radius filtering, the slider quantization and the
//! zoom lookup. `build_map_view` composes them into what the map renderer
//! draws.

pub mod types;

pub use types::{MapView, Marker};

use std::collections::BTreeSet;

use crate::error::GeoError;
use crate::models::{GeoPoint, Item, ItemId};

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Slider bounds and the radius the map opens with
pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Vertices of the search circle overlay
pub const CIRCLE_POINTS: usize = 64;

/// Upper bound (inclusive) of each radius band and its zoom level
const ZOOM_TABLE: [(f64, f64); 13] = [
    (1.0, 15.5),
    (2.0, 14.6),
    (3.0, 14.0),
    (4.0, 13.6),
    (5.0, 13.3),
    (10.0, 12.3),
    (15.0, 11.7),
    (20.0, 11.3),
    (25.0, 11.0),
    (30.0, 10.7),
    (35.0, 10.4),
    (40.0, 10.2),
    (45.0, 10.0),
];
const FALLBACK_ZOOM: f64 = 9.7;

/// Haversine distance in kilometers between two coordinates given in degrees.
///
/// Fails if any component is non-finite or out of range.
pub fn great_circle_distance_km(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> Result<f64, GeoError> {
    let a = GeoPoint::new(lat1, lon1)?;
    let b = GeoPoint::new(lat2, lon2)?;
    Ok(distance_km(&a, &b))
}

/// Haversine distance between two validated points
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push h a hair outside [0, 1] near antipodes
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Ids of the items whose location lies within `radius_km` of `center`.
///
/// Items without a location are never nearby. A radius that is zero,
/// negative or NaN yields an empty set.
pub fn filter_within_radius(center: &GeoPoint, items: &[Item], radius_km: f64) -> BTreeSet<ItemId> {
    if radius_km.is_nan() || radius_km <= 0.0 {
        return BTreeSet::new();
    }
    items
        .iter()
        .filter(|item| {
            item.location
                .map(|location| distance_km(center, &location) <= radius_km)
                .unwrap_or(false)
        })
        .map(|item| item.id.clone())
        .collect()
}

/// Map zoom for a search radius. Larger radius, lower zoom.
pub fn zoom_level_for_radius(radius_km: f64) -> f64 {
    ZOOM_TABLE
        .iter()
        .find(|(upper, _)| radius_km <= *upper)
        .map(|(_, zoom)| *zoom)
        .unwrap_or(FALLBACK_ZOOM)
}

/// Quantizes a raw slider value: whole kilometers up to 5, then steps of 5.
///
/// `7.0` snaps down to `5.0` while `4.6` snaps up to `5.0`; the jump in step
/// size at 5 is intentional.
pub fn snap_radius(raw: f64) -> f64 {
    if raw <= 5.0 {
        round_half_up(raw)
    } else {
        5.0 + round_half_up((raw - 5.0) / 5.0) * 5.0
    }
}

/// Rounds halves towards positive infinity; NaN rounds to zero.
fn round_half_up(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        (value + 0.5).floor()
    }
}

/// Closed polygon approximating a circle of `radius_km` around `center`.
///
/// Returned as raw `(latitude, longitude)` pairs since vertices near the
/// poles or the antimeridian may leave the valid coordinate range.
pub fn search_circle(center: &GeoPoint, radius_km: f64, points: usize) -> Vec<(f64, f64)> {
    if points == 0 {
        return Vec::new();
    }
    let radius_m = radius_km * 1000.0;
    let lat_delta = radius_m / 111_320.0;
    let lon_delta = radius_m / (40_008_000.0 / 360.0);
    let lat_scale = center.latitude().to_radians().cos();
    let step = 360.0 / points as f64;

    (0..points)
        .map(|i| {
            let angle = (i as f64 * step).to_radians();
            (
                center.latitude() + lat_delta * angle.cos(),
                center.longitude() + lon_delta * angle.sin() / lat_scale,
            )
        })
        .collect()
}

/// Everything the map renderer needs for one frame: snapped radius, zoom,
/// nearby markers and the search circle.
pub fn build_map_view(center: GeoPoint, items: &[Item], raw_radius: f64) -> MapView {
    let radius_km = snap_radius(raw_radius);
    let nearby = filter_within_radius(&center, items, radius_km);

    let markers = items
        .iter()
        .filter(|item| nearby.contains(&item.id))
        .filter_map(|item| {
            item.location.map(|location| Marker {
                item_id: item.id.clone(),
                title: item.title.clone(),
                description: item.description.clone(),
                location,
                distance_km: distance_km(&center, &location),
            })
        })
        .collect();

    MapView {
        center,
        radius_km,
        zoom: zoom_level_for_radius(radius_km),
        markers,
        overlay: search_circle(&center, radius_km, CIRCLE_POINTS),
    }
}
