use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, ItemId};

/// A nearby item pinned on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub item_id: ItemId,
    pub title: String,
    pub description: String,
    pub location: GeoPoint,
    /// Distance from the map center
    pub distance_km: f64,
}

/// Input for the external map renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: GeoPoint,
    /// Snapped search radius
    pub radius_km: f64,
    pub zoom: f64,
    pub markers: Vec<Marker>,
    /// Search circle as `(latitude, longitude)` vertices
    pub overlay: Vec<(f64, f64)>,
}
