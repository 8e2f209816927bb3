//! Rental service.
//!
//! Applies booking-engine decisions to an `ItemStore`. Every state change goes
//! through `conditional_update` so that two clients racing for the same item
//! cannot both win.

pub mod types;

pub use types::{ItemActions, NewListing};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::booking::{self, BookingOutcome, Clock};
use crate::error::{BookingError, Result, RentalError, ValidationError};
use crate::models::{GeoPoint, Item, ItemId, UserId};
use crate::proximity::{self, MapView};
use crate::store::{ItemQuery, ItemStore, UpdateResult};

pub struct RentalService<S, C> {
    store: S,
    clock: C,
}

impl<S: ItemStore, C: Clock> RentalService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Lists a new item for `owner`
    pub async fn create_listing(&self, owner: &UserId, listing: NewListing) -> Result<Item> {
        let title = listing.title.trim();
        if title.is_empty() {
            return Err(ValidationError("title must not be empty".into()).into());
        }
        let price = parse_price(&listing.price)?;

        let mut item = Item::new(
            ItemId::generate(),
            owner.clone(),
            title,
            listing.description.trim(),
            price,
            listing.item_type,
        )?;
        if let Some(location) = listing.location {
            item = item.with_location(location);
        }
        if let Some(photo) = listing.photo.filter(|p| !p.trim().is_empty()) {
            item = item.with_photo(photo);
        }

        self.store.insert(item.clone()).await?;
        info!("Listed {} ({}) for {}", item.id, item.title, owner);
        Ok(item)
    }

    pub async fn item(&self, id: &ItemId) -> Result<Item> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RentalError::NotFound(id.clone()))
    }

    /// Reserves `[start, end)` on an item for `requester`
    pub async fn book(
        &self,
        id: &ItemId,
        start: NaiveDate,
        end: NaiveDate,
        requester: &UserId,
    ) -> Result<BookingOutcome> {
        let item = self.item(id).await?;
        let outcome = booking::evaluate_booking(&item, start, end, requester, self.today())
            .map_err(|e| {
                debug!("Booking of {} by {} rejected: {}", id, requester, e);
                e
            })?;

        match self.store.conditional_update(id, None, &outcome.transition).await? {
            UpdateResult::Applied(_) => {
                info!(
                    "Booked {} for {} from {} to {} ({} days, {:.2})",
                    id, requester, start, end, outcome.days, outcome.total_price
                );
                Ok(outcome)
            }
            UpdateResult::Conflict => {
                warn!("Booking of {} by {} lost a race", id, requester);
                Err(BookingError::AlreadyBooked.into())
            }
            UpdateResult::NotFound => Err(RentalError::NotFound(id.clone())),
        }
    }

    /// Ends the current rental; allowed for the renter and the owner
    pub async fn cancel(&self, id: &ItemId, requester: &UserId) -> Result<()> {
        let item = self.item(id).await?;
        let transition = booking::evaluate_cancellation(&item, requester)?;

        match self
            .store
            .conditional_update(id, item.renter(), &transition)
            .await?
        {
            UpdateResult::Applied(_) => {
                info!("Rental of {} cleared by {}", id, requester);
                Ok(())
            }
            // someone else cleared or rebooked it in between
            UpdateResult::Conflict => Err(BookingError::NotBooked.into()),
            UpdateResult::NotFound => Err(RentalError::NotFound(id.clone())),
        }
    }

    /// Removes a listing. Only the owner may do this, and only while unbooked.
    pub async fn delete(&self, id: &ItemId, requester: &UserId) -> Result<()> {
        let item = self.item(id).await?;
        if item.owner() != requester {
            return Err(BookingError::NotAuthorized.into());
        }
        if !item.is_available() {
            return Err(BookingError::AlreadyBooked.into());
        }
        if !self.store.delete(id).await? {
            return Err(RentalError::NotFound(id.clone()));
        }
        info!("Deleted listing {}", id);
        Ok(())
    }

    pub async fn listings(&self, query: &ItemQuery) -> Result<Vec<Item>> {
        Ok(self.store.query(query).await?)
    }

    /// Map view around `center` for a raw slider value
    pub async fn nearby(&self, center: GeoPoint, raw_radius: f64) -> Result<MapView> {
        // the slider only produces values inside its range
        let raw_radius = raw_radius.clamp(proximity::MIN_RADIUS_KM, proximity::MAX_RADIUS_KM);
        let items = self.store.query(&ItemQuery::default()).await?;
        let view = proximity::build_map_view(center, &items, raw_radius);
        debug!(
            "{} of {} items within {} km",
            view.markers.len(),
            items.len(),
            view.radius_km
        );
        Ok(view)
    }

    /// Which buttons the detail screen shows to `viewer`
    pub async fn actions(&self, id: &ItemId, viewer: &UserId) -> Result<ItemActions> {
        Ok(ItemActions::for_viewer(&self.item(id).await?, viewer))
    }

    /// Days a date picker may offer for this item
    pub async fn is_date_selectable(&self, id: &ItemId, date: NaiveDate) -> Result<bool> {
        let item = self.item(id).await?;
        let disabled = booking::disabled_ranges(&item);
        Ok(booking::is_date_selectable(date, &disabled, self.today()))
    }
}

/// Parses the price field of the listing form
fn parse_price(raw: &str) -> std::result::Result<f64, ValidationError> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ValidationError(format!("invalid price {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12.5").unwrap(), 12.5);
        assert_eq!(parse_price(" 7,25 ").unwrap(), 7.25);
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert!(parse_price("").is_err());
        assert!(parse_price("-3").is_err());
        assert!(parse_price("ten").is_err());
        assert!(parse_price("inf").is_err());
    }
}
