//! Error types for every layer of Leasy.
//!
//! The booking and proximity core only ever returns `BookingError` and
//! `GeoError`. Everything else belongs to the adapters around it.

use thiserror::Error;

use crate::models::ItemId;

/// Validation failures raised by the booking engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingError {
    #[error("start date must be before end date")]
    InvalidRange,

    #[error("dates in the past cannot be booked")]
    PastDate,

    #[error("item is already rented")]
    AlreadyBooked,

    #[error("you cannot rent your own item")]
    SelfBooking,

    #[error("item is not rented")]
    NotBooked,

    #[error("only the owner or the current renter can do this")]
    NotAuthorized,
}

/// Malformed geographic input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Item model validation failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation error: {0}")]
pub struct ValidationError(pub String);

/// Failures of an `ItemStore` backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("item {0} already exists")]
    Duplicate(ItemId),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store snapshot is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failures of the reverse/forward geocoding endpoint.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding service returned status {0}")]
    Status(u16),

    #[error("geocoding response is malformed: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// Errors surfaced by `RentalService` to the initiating user action.
#[derive(Error, Debug)]
pub enum RentalError {
    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A specialized Result type for the rental service.
pub type Result<T> = std::result::Result<T, RentalError>;
