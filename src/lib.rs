//! Leasy: peer-to-peer item rental.
//!
//! The booking engine and proximity filter are pure; the store, geocoder and
//! rental service are the adapters around them.

pub mod booking;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod proximity;
pub mod rental;
pub mod store;

pub use error::{BookingError, GeoError, RentalError};
pub use models::{GeoPoint, Item, ItemId, ItemType, User, UserId};
