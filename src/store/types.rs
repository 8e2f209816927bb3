use serde::{Deserialize, Serialize};

use crate::models::{Item, ItemType, UserId};

/// Filters for listing items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemQuery {
    /// Only items listed by this user
    pub owner: Option<UserId>,
    pub item_type: Option<ItemType>,
    /// Maximum price per day
    pub max_price: Option<f64>,
    /// Case-insensitive match on title or description
    pub text: Option<String>,
    /// Skip items that are currently rented
    #[serde(default)]
    pub available_only: bool,
}

impl ItemQuery {
    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(owner) = &self.owner {
            if item.owner() != owner {
                return false;
            }
        }
        if let Some(item_type) = self.item_type {
            if item.item_type != item_type {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if item.price() > max_price {
                return false;
            }
        }
        if self.available_only && !item.is_available() {
            return false;
        }
        match &self.text {
            Some(text) if !text.trim().is_empty() => {
                let needle = text.trim().to_lowercase();
                item.title.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Outcome of a conditional write
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateResult {
    /// Written; carries the item as stored
    Applied(Item),
    /// The stored renter no longer matched the expectation
    Conflict,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemId;

    fn item(title: &str, owner: &str, price: f64, item_type: ItemType) -> Item {
        Item::new(
            ItemId::new(title),
            UserId::new(owner),
            title,
            "Works fine, pick up only",
            price,
            item_type,
        )
        .unwrap()
    }

    #[test]
    fn test_default_query_matches_everything() {
        let query = ItemQuery::default();
        assert!(query.matches(&item("Tent", "a", 15.0, ItemType::Recreational)));
    }

    #[test]
    fn test_query_filters() {
        let tent = item("Tent", "a", 15.0, ItemType::Recreational);
        let drill = item("Drill", "b", 8.0, ItemType::PowerTool);

        assert!(ItemQuery::owned_by(UserId::new("a")).matches(&tent));
        assert!(!ItemQuery::owned_by(UserId::new("a")).matches(&drill));

        let cheap = ItemQuery {
            max_price: Some(10.0),
            ..ItemQuery::default()
        };
        assert!(!cheap.matches(&tent));
        assert!(cheap.matches(&drill));

        let tools = ItemQuery {
            item_type: Some(ItemType::PowerTool),
            ..ItemQuery::default()
        };
        assert!(tools.matches(&drill));
        assert!(!tools.matches(&tent));

        let search = ItemQuery {
            text: Some("  PICK UP ".into()),
            ..ItemQuery::default()
        };
        assert!(search.matches(&tent));
        let miss = ItemQuery {
            text: Some("kayak".into()),
            ..ItemQuery::default()
        };
        assert!(!miss.matches(&tent));
    }
}
