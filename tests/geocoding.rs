use leasy::error::GeocodeError;
use leasy::geocoding::{update_profile_location, Geocoder, NominatimGeocoder};
use leasy::models::{User, UserId};
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn geocoder(server: &MockServer) -> NominatimGeocoder {
    NominatimGeocoder::with_settings(server.uri(), "leasy-tests", Duration::from_secs(5)).unwrap()
}

const ANTWERP_RESPONSE: &str = r#"[
  {
    "place_id": 123,
    "lat": "51.2211097",
    "lon": "4.3997081",
    "display_name": "Antwerpen, Vlaanderen, België",
    "address": { "city": "Antwerpen", "country": "België" }
  },
  {
    "place_id": 456,
    "lat": "40.0",
    "lon": "-80.0",
    "display_name": "Antwerp, Ohio"
  }
]"#;

// ============================================================================
// Nominatim Tests
// ============================================================================

#[tokio::test]
async fn test_geocode_takes_first_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Antwerpen"))
        .and(query_param("format", "json"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", "leasy-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ANTWERP_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let point = geocoder(&server).geocode("Antwerpen").await.unwrap().unwrap();
    assert_eq!(point.latitude(), 51.2211097);
    assert_eq!(point.longitude(), 4.3997081);
}

#[tokio::test]
async fn test_geocode_unknown_place_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let result = geocoder(&server).geocode("Nowhere at all").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_geocode_blank_address_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ANTWERP_RESPONSE))
        .expect(0)
        .mount(&server)
        .await;

    assert!(geocoder(&server).geocode("   ").await.unwrap().is_none());
}

#[tokio::test]
async fn test_geocode_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = geocoder(&server).geocode("Antwerpen").await;
    assert!(matches!(result, Err(GeocodeError::Status(503))));
}

#[tokio::test]
async fn test_geocode_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let result = geocoder(&server).geocode("Antwerpen").await;
    assert!(matches!(result, Err(GeocodeError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_geocode_out_of_range_coordinate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"lat": "95.0", "lon": "4.4"}]"#),
        )
        .mount(&server)
        .await;

    let result = geocoder(&server).geocode("Antwerpen").await;
    assert!(matches!(result, Err(GeocodeError::Geo(_))));
}

// ============================================================================
// Profile location
// ============================================================================

#[tokio::test]
async fn test_update_profile_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Antwerpen"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ANTWERP_RESPONSE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let geocoder = geocoder(&server);
    let mut user = User::new(UserId::new("u1"), "jan@example.com", "jan");

    assert!(update_profile_location(&geocoder, &mut user, " Antwerpen ").await.unwrap());
    assert_eq!(user.location_label.as_deref(), Some("Antwerpen"));
    let home = user.location.unwrap();
    assert_eq!(home.latitude(), 51.2211097);

    assert!(!update_profile_location(&geocoder, &mut user, "Atlantis").await.unwrap());
    assert_eq!(user.location_label.as_deref(), Some("Antwerpen"));
}
