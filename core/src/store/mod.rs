//! Data access for todo items.
//!
//! Handlers only see the [`TodoStore`] trait. Two backends implement it:
//!
//! - [`DynamoDbStore`]: the production table, keyed by the string attribute `id`
//! - [`InMemoryStore`]: a process-local map for tests and the dev server

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::item::{Item, Number, TodoChanges};

mod dynamodb;
mod memory;

pub use dynamodb::DynamoDbStore;
pub use memory::InMemoryStore;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Returns every stored item.
    async fn get_items(&self) -> Result<Vec<Item>>;

    /// Deletes the item with `id`. Deleting an id that does not exist succeeds.
    async fn delete_item(&self, id: &str) -> Result<()>;

    /// Stores `item`, replacing any item with the same id.
    async fn put_item(&self, item: Item) -> Result<()>;

    /// Applies `changes` to an existing item and returns it as stored.
    ///
    /// Fails with [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// if there is no item with `id`.
    async fn update_item(&self, id: &str, changes: &TodoChanges, updated_at: Number)
        -> Result<Item>;
}

/// Builds the backend selected by `config`.
pub async fn open(config: &Config) -> Result<Arc<dyn TodoStore>> {
    match &config.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory todo store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::DynamoDb {
            table_name,
            endpoint_url,
        } => {
            tracing::info!(table = %table_name, endpoint = ?endpoint_url, "using DynamoDB todo store");
            let store = DynamoDbStore::connect(table_name, endpoint_url.as_deref()).await;
            Ok(Arc::new(store))
        }
    }
}
