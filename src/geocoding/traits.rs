use async_trait::async_trait;

use crate::error::GeocodeError;
use crate::models::GeoPoint;

/// Resolves a free-text address to a coordinate.
/// Implemented by HTTP clients for hosted geocoding services.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service knows no such place
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError>;

    /// Get the name of the geocoding service
    fn service_name(&self) -> &'static str;
}
