use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::GeocodeError;
use crate::geocoding::traits::Geocoder;
use crate::geocoding::types::NominatimPlace;
use crate::models::GeoPoint;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("leasy/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Geocoder backed by the OpenStreetMap Nominatim search API
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Create a geocoder against the public Nominatim instance
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_settings(DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    /// Create a geocoder against a custom instance (self-hosted, or a mock in tests)
    pub fn with_settings(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        // Nominatim's usage policy rejects requests without a user agent
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn parse_place(place: &NominatimPlace) -> Result<GeoPoint, GeocodeError> {
        let lat = place
            .lat
            .trim()
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude {:?}", place.lat)))?;
        let lon = place
            .lon
            .trim()
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude {:?}", place.lon)))?;
        Ok(GeoPoint::new(lat, lon)?)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/search", self.base_url);
        debug!("Geocoding {:?} via {}", address, url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("addressdetails", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Nominatim returned status: {}", response.status());
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        let Some(first) = places.first() else {
            info!("No coordinates found for {:?}", address);
            return Ok(None);
        };

        let point = Self::parse_place(first)?;
        debug!(
            "Resolved {:?} to ({}, {}) {}",
            address,
            point.latitude(),
            point.longitude(),
            first.display_name.as_deref().unwrap_or("")
        );
        Ok(Some(point))
    }

    fn service_name(&self) -> &'static str {
        "Nominatim"
    }
}
