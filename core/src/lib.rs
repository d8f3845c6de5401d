//! Shared core of the todo API: item model, storage, handlers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod item;
pub mod store;

#[cfg(feature = "lambda")]
pub mod lambda;

pub use config::Config;
pub use error::{HandlerError, StoreError};
pub use handlers::ApiResponse;
pub use item::Item;
pub use store::TodoStore;
