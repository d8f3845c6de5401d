use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::error::{Result, StoreError};
use crate::item::{Item, Number, TodoChanges};

/// In-memory storage backend.
///
/// Items are kept ordered by id and lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: Arc<RwLock<BTreeMap<String, Item>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `items`. Items without an `id` are skipped.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items = items
            .into_iter()
            .filter_map(|item| item.id().map(str::to_string).map(|id| (id, item)))
            .collect();

        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn get_items(&self) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        tracing::debug!(count = items.len(), "listing todo items");
        Ok(items.values().cloned().collect())
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        let removed = self.items.write().await.remove(id);
        tracing::info!(id, existed = removed.is_some(), "deleted todo item");
        Ok(())
    }

    async fn put_item(&self, item: Item) -> Result<()> {
        let id = item
            .id()
            .ok_or_else(|| StoreError::InvalidData("item has no string id".to_string()))?
            .to_string();

        tracing::info!(id = %id, "stored todo item");
        self.items.write().await.insert(id, item);
        Ok(())
    }

    async fn update_item(
        &self,
        id: &str,
        changes: &TodoChanges,
        updated_at: Number,
    ) -> Result<Item> {
        let mut items = self.items.write().await;
        let item = items.get_mut(id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;

        item.apply(changes, updated_at);
        tracing::info!(id, "updated todo item");
        Ok(item.clone())
    }
}
