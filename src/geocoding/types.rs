use serde::Deserialize;

/// One hit of a Nominatim `/search` response.
///
/// Nominatim encodes coordinates as JSON strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
