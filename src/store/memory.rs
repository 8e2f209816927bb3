use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::booking::Transition;
use crate::error::StoreError;
use crate::models::{Item, ItemId, UserId};
use crate::store::traits::ItemStore;
use crate::store::types::{ItemQuery, UpdateResult};

/// Item store held in memory, with JSON snapshots on disk
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later duplicates replace earlier ones
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }

    /// Loads a snapshot written by `save_json`. A missing file gives an
    /// empty store.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            info!("No data file at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let json = tokio::fs::read_to_string(path).await?;
        let items: Vec<Item> = serde_json::from_str(&json)?;
        info!("Loaded {} items from {}", items.len(), path.display());
        Ok(Self::from_items(items))
    }

    /// Writes every item as a pretty JSON array, sorted by id
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let mut items: Vec<Item> = self.items.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&items)?;
        tokio::fs::write(path, json).await?;
        info!("💾 Saved {} items to {}", items.len(), path.display());
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn insert(&self, item: Item) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(StoreError::Duplicate(item.id));
        }
        debug!("Inserting item {}", item.id);
        items.insert(item.id.clone(), item);
        Ok(())
    }

    async fn conditional_update(
        &self,
        id: &ItemId,
        expected_renter: Option<&UserId>,
        transition: &Transition,
    ) -> Result<UpdateResult, StoreError> {
        // check and write under one lock so two bookings cannot interleave
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(id) else {
            return Ok(UpdateResult::NotFound);
        };
        if item.renter() != expected_renter {
            debug!("Conditional update on {} lost: renter changed", id);
            return Ok(UpdateResult::Conflict);
        }
        item.apply(transition);
        Ok(UpdateResult::Applied(item.clone()))
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, StoreError> {
        Ok(self.items.write().await.remove(id).is_some())
    }

    async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, StoreError> {
        let mut found: Vec<Item> = self
            .items
            .read()
            .await
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}
