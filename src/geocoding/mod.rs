pub mod nominatim;
pub mod traits;
pub mod types;

pub use nominatim::NominatimGeocoder;
pub use traits::Geocoder;

use tracing::info;

use crate::error::GeocodeError;
use crate::models::User;

/// Geocodes `address` and stores it as the user's home location.
///
/// Returns `false` and leaves the profile untouched when the address is
/// unknown.
pub async fn update_profile_location(
    geocoder: &dyn Geocoder,
    user: &mut User,
    address: &str,
) -> Result<bool, GeocodeError> {
    match geocoder.geocode(address).await? {
        Some(point) => {
            info!("Updated location of {} via {}", user.uid, geocoder.service_name());
            user.location_label = Some(address.trim().to_string());
            user.location = Some(point);
            Ok(true)
        }
        None => Ok(false),
    }
}
