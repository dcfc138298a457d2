use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::error::StoreError;
use crate::model::Book;

#[derive(Debug, Default)]
struct Inner {
    books: BTreeMap<i64, Book>,
    last_id: i64,
}

/// Map-backed store. Ids are handed out above the largest id ever seen, so
/// an explicit save with a high id pushes the counter forward.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    inner: RwLock<Inner>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.books.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.books.get(&id).cloned())
    }

    async fn save(&self, book: Book) -> Result<Book, StoreError> {
        let mut inner = self.inner.write().await;
        let id = match book.id {
            Some(id) => {
                inner.last_id = inner.last_id.max(id);
                id
            }
            None => {
                inner.last_id += 1;
                inner.last_id
            }
        };

        let stored = book.with_id(id);
        inner.books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.books.remove(&id);
        Ok(())
    }
}
