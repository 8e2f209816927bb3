use async_trait::async_trait;
use std::sync::Arc;

use crate::booking::Transition;
use crate::error::StoreError;
use crate::models::{Item, ItemId, UserId};
use crate::store::types::{ItemQuery, UpdateResult};

/// Persistence contract for listed items.
/// Any backend (in-memory, document store, SQL) plugs in behind this.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    /// Adds a new listing; fails if the id is taken
    async fn insert(&self, item: Item) -> Result<(), StoreError>;

    /// Applies `transition` only if the stored renter still equals
    /// `expected_renter`. This is the compare-and-set that keeps an item from
    /// being booked twice.
    async fn conditional_update(
        &self,
        id: &ItemId,
        expected_renter: Option<&UserId>,
        transition: &Transition,
    ) -> Result<UpdateResult, StoreError>;

    /// Returns whether an item was removed
    async fn delete(&self, id: &ItemId) -> Result<bool, StoreError>;

    async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, StoreError>;
}

#[async_trait]
impl<T: ItemStore + ?Sized> ItemStore for Arc<T> {
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        (**self).get(id).await
    }

    async fn insert(&self, item: Item) -> Result<(), StoreError> {
        (**self).insert(item).await
    }

    async fn conditional_update(
        &self,
        id: &ItemId,
        expected_renter: Option<&UserId>,
        transition: &Transition,
    ) -> Result<UpdateResult, StoreError> {
        (**self).conditional_update(id, expected_renter, transition).await
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }

    async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, StoreError> {
        (**self).query(query).await
    }
}
