//! Book persistence.
//!
//! `BookStore` is the only surface the rest of the service sees. Two adapters
//! implement it: [`InMemoryBookStore`] and the libsql-backed
//! [`crate::db::Database`]. Which one runs is decided by the `store.backend`
//! config key at startup.

mod memory;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Backend, Store as StoreConfig};
use crate::db::Database;
use crate::error::StoreError;
use crate::model::Book;

pub use memory::InMemoryBookStore;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, in no particular order.
    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StoreError>;

    /// Inserts when `book.id` is `None` and returns the book with its new id.
    /// Otherwise replaces title and author of the row with that id, inserting
    /// it if missing.
    async fn save(&self, book: Book) -> Result<Book, StoreError>;

    /// Deleting an id that does not exist is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;
}

pub async fn open(cfg: &StoreConfig, data_dir: &Path) -> Result<Arc<dyn BookStore>> {
    match cfg.backend {
        Backend::Memory => {
            tracing::info!("[store] using in-memory book store");
            Ok(Arc::new(InMemoryBookStore::new()))
        }
        Backend::Libsql => {
            let db = Database::new(cfg, data_dir).await?;
            Ok(Arc::new(db))
        }
    }
}
