use std::sync::Arc;

use crate::error::StoreError;
use crate::model::Book;
use crate::store::BookStore;

/// Keeps handlers off the storage adapter. Every call goes straight through.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn get_all_books(&self) -> Result<Vec<Book>, StoreError> {
        self.store.find_all().await
    }

    pub async fn get_book_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        self.store.find_by_id(id).await
    }

    pub async fn save_or_update_book(&self, book: Book) -> Result<Book, StoreError> {
        self.store.save(book).await
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete_by_id(id).await
    }
}
