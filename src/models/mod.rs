use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{GeoError, ValidationError};

/// Opaque, never-reused identifier of a listed item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for a new listing
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a registered user (owner or renter)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category tag of a listing. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    Household,
    GardenTool,
    PowerTool,
    Electronics,
    Recreational,
    Automotive,
    OfficeSupply,
    PartySupply,
    #[default]
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 9] = [
        ItemType::Household,
        ItemType::GardenTool,
        ItemType::PowerTool,
        ItemType::Electronics,
        ItemType::Recreational,
        ItemType::Automotive,
        ItemType::OfficeSupply,
        ItemType::PartySupply,
        ItemType::Other,
    ];

    /// Label shown to users in the listing screens
    pub fn label(self) -> &'static str {
        match self {
            ItemType::Household => "Huishoudelijk Artikel",
            ItemType::GardenTool => "Tuin- en Gazonartikelen",
            ItemType::PowerTool => "Gereedschap en Uitrusting",
            ItemType::Electronics => "Elektronica",
            ItemType::Recreational => "Recreatief Artikel",
            ItemType::Automotive => "Automotive Artikel",
            ItemType::OfficeSupply => "Kantoorbenodigdheden",
            ItemType::PartySupply => "Feestartikelen",
            ItemType::Other => "Overig",
        }
    }

    /// Stable tag used in stored data
    pub fn tag(self) -> &'static str {
        match self {
            ItemType::Household => "household",
            ItemType::GardenTool => "garden-tool",
            ItemType::PowerTool => "power-tool",
            ItemType::Electronics => "electronics",
            ItemType::Recreational => "recreational",
            ItemType::Automotive => "automotive",
            ItemType::OfficeSupply => "office-supply",
            ItemType::PartySupply => "party-supply",
            ItemType::Other => "other",
        }
    }

    /// Unknown labels fall back to `Other`
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == label)
            .unwrap_or(ItemType::Other)
    }
}

impl FromStr for ItemType {
    type Err = ValidationError;

    /// Accepts the kebab-case tag (`power-tool`) or the display label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == s || t.label() == s)
            .ok_or_else(|| ValidationError(format!("unknown item type {s:?}")))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint", into = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeoError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoPoint> for RawGeoPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

impl GeoPoint {
    /// Fails unless both components are finite and in range
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(GeoError::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// The current booking held on an item.
///
/// Renter and both dates live together so an item can never carry a start
/// date without an end date or a window without a renter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRental {
    pub renter: UserId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ActiveRental {
    pub fn window(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// Half-open calendar range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whole days between start and end; negative when reversed
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// A rentable object listed by its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    price: f64,
    owner: UserId,
    pub photo: Option<String>,
    pub location: Option<GeoPoint>,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    #[serde(default)]
    rental: Option<ActiveRental>,
}

/// Stored form of `Item`, checked before it becomes one
#[derive(Deserialize)]
struct RawItem {
    id: ItemId,
    title: String,
    description: String,
    price: f64,
    owner: UserId,
    photo: Option<String>,
    location: Option<GeoPoint>,
    #[serde(rename = "type", default)]
    item_type: ItemType,
    #[serde(default)]
    rental: Option<ActiveRental>,
}

impl TryFrom<RawItem> for Item {
    type Error = ValidationError;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        let mut item = Item::new(
            raw.id,
            raw.owner,
            raw.title,
            raw.description,
            raw.price,
            raw.item_type,
        )?;
        item.photo = raw.photo;
        item.location = raw.location;
        item.rental = raw.rental;
        Ok(item)
    }
}

impl Item {
    /// Creates an unbooked listing
    pub fn new(
        id: ItemId,
        owner: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        item_type: ItemType,
    ) -> Result<Self, ValidationError> {
        if !price.is_finite() || price < 0.0 {
            return Err(ValidationError(format!(
                "price must be a non-negative amount, got {price}"
            )));
        }
        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            price,
            owner,
            photo: None,
            location: None,
            item_type,
            rental: None,
        })
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Rental cost per day
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn rental(&self) -> Option<&ActiveRental> {
        self.rental.as_ref()
    }

    pub fn renter(&self) -> Option<&UserId> {
        self.rental.as_ref().map(|r| &r.renter)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.rental.as_ref().map(|r| r.start)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.rental.as_ref().map(|r| r.end)
    }

    pub fn is_available(&self) -> bool {
        self.rental.is_none()
    }

    pub(crate) fn set_rental(&mut self, rental: Option<ActiveRental>) {
        self.rental = rental;
    }
}

/// Profile of a registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uid: UserId,
    pub email: String,
    pub username: String,
    pub profile_image_url: Option<String>,
    /// Free-text address as typed by the user
    pub location_label: Option<String>,
    /// Home coordinate resolved from `location_label`
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(uid: UserId, email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            uid,
            email: email.into(),
            username: username.into(),
            profile_image_url: None,
            location_label: None,
            location: None,
            created_at: Utc::now(),
        }
    }
}
