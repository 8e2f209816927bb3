use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, Item, ItemType, UserId};

/// Raw input of the "add item" form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    /// Price per day as typed; accepts `,` or `.` as decimal separator
    pub price: String,
    pub photo: Option<String>,
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub item_type: ItemType,
}

/// Actions a viewer may take on an item's detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemActions {
    pub can_rent: bool,
    pub can_delete: bool,
    pub can_cancel: bool,
}

impl ItemActions {
    pub fn for_viewer(item: &Item, viewer: &UserId) -> Self {
        let is_owner = item.owner() == viewer;
        let is_renter = item.renter() == Some(viewer);
        Self {
            can_rent: item.is_available() && !is_owner,
            can_delete: item.is_available() && is_owner,
            can_cancel: !item.is_available() && (is_owner || is_renter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Transition;
    use crate::models::{ActiveRental, ItemId};
    use chrono::NaiveDate;

    #[test]
    fn test_actions_follow_ownership_and_rental_state() {
        let owner = UserId::new("owner");
        let renter = UserId::new("renter");
        let stranger = UserId::new("stranger");
        let mut item = Item::new(
            ItemId::new("bbq"),
            owner.clone(),
            "Barbecue",
            "",
            20.0,
            ItemType::PartySupply,
        )
        .unwrap();

        assert_eq!(
            ItemActions::for_viewer(&item, &owner),
            ItemActions {
                can_rent: false,
                can_delete: true,
                can_cancel: false,
            }
        );
        assert_eq!(
            ItemActions::for_viewer(&item, &stranger),
            ItemActions {
                can_rent: true,
                can_delete: false,
                can_cancel: false,
            }
        );

        item.apply(&Transition::Book(ActiveRental {
            renter: renter.clone(),
            start: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 7, 8).unwrap(),
        }));

        assert_eq!(
            ItemActions::for_viewer(&item, &owner),
            ItemActions {
                can_rent: false,
                can_delete: false,
                can_cancel: true,
            }
        );
        assert_eq!(
            ItemActions::for_viewer(&item, &renter),
            ItemActions {
                can_rent: false,
                can_delete: false,
                can_cancel: true,
            }
        );
        assert_eq!(ItemActions::for_viewer(&item, &stranger), ItemActions::default());
    }
}
