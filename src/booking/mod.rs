//! Booking engine.
//!
//! Pure decision functions over a snapshot of an item. Nothing here touches
//! storage or logs; callers apply the returned `Transition` themselves and
//! must do so with a conditional write (see `ItemStore::conditional_update`).
//!
//! Each item holds a single booking slot: while it is rented no other range
//! can be reserved, even one that would not overlap.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::models::{ActiveRental, DateRange, Item, UserId};

/// State change to persist on an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Set renter, start and end date
    Book(ActiveRental),
    /// Null renter, start and end date
    Clear,
}

/// Result of a successful booking evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub days: i64,
    pub total_price: f64,
    pub transition: Transition,
}

/// Decides whether `requester` may rent `item` for `[start, end)`.
///
/// Checks run in this order: already booked, self booking, range, past date.
pub fn evaluate_booking(
    item: &Item,
    start: NaiveDate,
    end: NaiveDate,
    requester: &UserId,
    today: NaiveDate,
) -> Result<BookingOutcome, BookingError> {
    if !item.is_available() {
        return Err(BookingError::AlreadyBooked);
    }
    if requester == item.owner() {
        return Err(BookingError::SelfBooking);
    }
    if start >= end {
        return Err(BookingError::InvalidRange);
    }
    if start < today || end < today {
        return Err(BookingError::PastDate);
    }

    let days = DateRange::new(start, end).days();
    Ok(BookingOutcome {
        days,
        total_price: days as f64 * item.price(),
        transition: Transition::Book(ActiveRental {
            renter: requester.clone(),
            start,
            end,
        }),
    })
}

/// Decides whether `requester` may end the current rental on `item`.
pub fn evaluate_cancellation(item: &Item, requester: &UserId) -> Result<Transition, BookingError> {
    let rental = item.rental().ok_or(BookingError::NotBooked)?;
    if &rental.renter != requester && item.owner() != requester {
        return Err(BookingError::NotAuthorized);
    }
    Ok(Transition::Clear)
}

/// Price preview for a selected range, before any availability checks.
///
/// Reversed or empty ranges cost nothing.
pub fn quote(price_per_day: f64, start: NaiveDate, end: NaiveDate) -> f64 {
    let days = DateRange::new(start, end).days().max(0);
    days as f64 * price_per_day
}

/// Ranges a date picker must disable for this item
pub fn disabled_ranges(item: &Item) -> Vec<DateRange> {
    item.rental().map(ActiveRental::window).into_iter().collect()
}

/// Whether a calendar day may be picked: not before today and outside every
/// committed range.
pub fn is_date_selectable(candidate: NaiveDate, disabled: &[DateRange], today: NaiveDate) -> bool {
    candidate >= today && !disabled.iter().any(|range| range.contains(candidate))
}

impl Item {
    /// Applies a transition produced by the engine
    pub fn apply(&mut self, transition: &Transition) {
        match transition {
            Transition::Book(rental) => self.set_rental(Some(rental.clone())),
            Transition::Clear => self.set_rental(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemId, ItemType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn owner() -> UserId {
        UserId::new("owner")
    }

    fn renter() -> UserId {
        UserId::new("renter")
    }

    fn item(price: f64) -> Item {
        Item::new(
            ItemId::new("ladder"),
            owner(),
            "Ladder",
            "Aluminium, 3m",
            price,
            ItemType::Household,
        )
        .unwrap()
    }

    fn booked_item() -> Item {
        let mut item = item(10.0);
        item.apply(&Transition::Book(ActiveRental {
            renter: renter(),
            start: date(2024, 6, 1),
            end: date(2024, 6, 4),
        }));
        item
    }

    #[test]
    fn test_three_day_booking_costs_thirty() {
        let today = date(2024, 5, 20);
        let (start, end) = (date(2024, 6, 1), date(2024, 6, 4));
        let outcome = evaluate_booking(&item(10.0), start, end, &renter(), today).unwrap();

        assert_eq!(outcome.days, 3);
        assert_eq!(outcome.total_price, 30.0);
        assert_eq!(
            outcome.transition,
            Transition::Book(ActiveRental {
                renter: renter(),
                start: date(2024, 6, 1),
                end: date(2024, 6, 4),
            })
        );
    }

    #[test]
    fn test_total_price_is_days_times_price() {
        let today = date(2024, 1, 1);
        for (len, price) in [(1, 4.5), (7, 12.0), (30, 0.0), (365, 2.25)] {
            let start = date(2024, 2, 1);
            let end = start + chrono::Days::new(len);
            let outcome = evaluate_booking(&item(price), start, end, &renter(), today).unwrap();
            assert_eq!(outcome.days, len as i64);
            assert_eq!(outcome.total_price, len as f64 * price);
        }
    }

    #[test]
    fn test_booking_starting_today_is_allowed() {
        let today = date(2024, 6, 1);
        let outcome = evaluate_booking(&item(5.0), today, date(2024, 6, 2), &renter(), today);
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_invalid_range() {
        let today = date(2024, 1, 1);
        let (first, fifth) = (date(2024, 6, 1), date(2024, 6, 5));

        let same = evaluate_booking(&item(5.0), first, first, &renter(), today);
        assert_eq!(same, Err(BookingError::InvalidRange));

        let reversed = evaluate_booking(&item(5.0), fifth, first, &renter(), today);
        assert_eq!(reversed, Err(BookingError::InvalidRange));
    }

    #[test]
    fn test_past_date() {
        let today = date(2024, 6, 10);
        let (start, end) = (date(2024, 6, 9), date(2024, 6, 12));
        let result = evaluate_booking(&item(5.0), start, end, &renter(), today);
        assert_eq!(result, Err(BookingError::PastDate));
    }

    #[test]
    fn test_self_booking_wins_over_bad_dates() {
        // in the past and reversed
        let today = date(2024, 6, 10);
        let (start, end) = (date(2024, 6, 9), date(2024, 6, 1));
        let result = evaluate_booking(&item(5.0), start, end, &owner(), today);
        assert_eq!(result, Err(BookingError::SelfBooking));
    }

    #[test]
    fn test_already_booked_for_any_requester() {
        let today = date(2024, 1, 1);
        let item = booked_item();
        for who in [owner(), renter(), UserId::new("stranger")] {
            let result = evaluate_booking(&item, date(2024, 7, 1), date(2024, 7, 2), &who, today);
            assert_eq!(result, Err(BookingError::AlreadyBooked));
        }
    }

    #[test]
    fn test_cancellation_rules() {
        assert_eq!(
            evaluate_cancellation(&item(1.0), &renter()),
            Err(BookingError::NotBooked)
        );

        let item = booked_item();
        assert_eq!(evaluate_cancellation(&item, &renter()), Ok(Transition::Clear));
        assert_eq!(evaluate_cancellation(&item, &owner()), Ok(Transition::Clear));
        assert_eq!(
            evaluate_cancellation(&item, &UserId::new("stranger")),
            Err(BookingError::NotAuthorized)
        );
    }

    #[test]
    fn test_apply_clear_resets_rental() {
        let mut item = booked_item();
        assert!(!item.is_available());
        item.apply(&Transition::Clear);
        assert!(item.is_available());
        assert_eq!(item.start_date(), None);
        assert_eq!(item.end_date(), None);
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote(10.0, date(2024, 6, 1), date(2024, 6, 4)), 30.0);
        assert_eq!(quote(10.0, date(2024, 6, 4), date(2024, 6, 1)), 0.0);
    }

    #[test]
    fn test_date_selectable() {
        let today = date(2024, 6, 1);
        let disabled = disabled_ranges(&booked_item());
        assert_eq!(disabled.len(), 1);

        assert!(!is_date_selectable(date(2024, 5, 31), &[], today));
        assert!(!is_date_selectable(date(2024, 6, 1), &disabled, today));
        assert!(!is_date_selectable(date(2024, 6, 3), &disabled, today));
        assert!(is_date_selectable(date(2024, 6, 4), &disabled, today));
        assert!(is_date_selectable(date(2024, 6, 20), &disabled, today));
    }

    #[test]
    fn test_date_selectable_with_several_ranges() {
        let today = date(2024, 1, 1);
        let disabled = [
            DateRange::new(date(2024, 3, 1), date(2024, 3, 5)),
            DateRange::new(date(2024, 4, 10), date(2024, 4, 11)),
        ];
        assert!(!is_date_selectable(date(2024, 3, 2), &disabled, today));
        assert!(!is_date_selectable(date(2024, 4, 10), &disabled, today));
        assert!(is_date_selectable(date(2024, 4, 11), &disabled, today));
        assert!(is_date_selectable(date(2024, 3, 20), &disabled, today));
    }

    #[test]
    fn test_unbooked_item_has_no_disabled_ranges() {
        assert!(disabled_ranges(&item(3.0)).is_empty());
    }
}
