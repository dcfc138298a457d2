use crate::config::Store as StoreConfig;
use crate::error::StoreError;
use crate::model::Book;
use crate::store::BookStore;
use anyhow::Result;
use async_trait::async_trait;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;
use std::time::Duration;

const IN_MEMORY: &str = ":memory:";

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

const MIGRATIONS: &[(&str, &str)] = &[("001_books.sql", include_str!("migrations/001_books.sql"))];

pub struct Database {
    db: LibsqlDatabase,
    conn: Connection,
    replica: bool,
}

impl Database {
    pub async fn sync(&self) -> Result<()> {
        if self.replica {
            self.db
                .sync()
                .await
                .map_err(|e| anyhow::anyhow!("sync failed: {}", e))?;
        }
        Ok(())
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    /// Opens the database named by `cfg` under `data_dir`. With a remote url
    /// and token configured the local file becomes an embedded replica that
    /// syncs every `sync_interval_seconds`.
    pub async fn new(cfg: &StoreConfig, data_dir: &Path) -> Result<Self> {
        if cfg.get_db() == IN_MEMORY {
            return Self::open_in_memory().await;
        }

        let path = data_dir.join(cfg.get_db());

        let (db, replica) = match cfg.remote() {
            Some((url, token)) => {
                tracing::info!(path = ?path, "[db] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.sync_interval_seconds);
                let db = Builder::new_synced_database(&path, url.to_owned(), token.to_owned())
                    .sync_interval(sync_interval)
                    .build()
                    .await?;
                (db, true)
            }
            None => {
                tracing::info!(path = ?path, "[db] running in local database mode");
                (Builder::new_local(&path).build().await?, false)
            }
        };

        let database = Self::setup(db, replica).await?;
        database.sync().await?;
        Ok(database)
    }

    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(IN_MEMORY).build().await?;
        Self::setup(db, false).await
    }

    async fn setup(db: LibsqlDatabase, replica: bool) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS.iter().chain(MIGRATIONS) {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database { db, conn, replica })
    }

    fn row_to_book(row: &libsql::Row) -> Result<Book, StoreError> {
        Ok(Book {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            author: row.get(2)?,
        })
    }
}

#[async_trait]
impl BookStore for Database {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let query = "SELECT id, title, author FROM books ORDER BY id";

        let mut rows = self.conn.query(query, ()).await?;
        let mut books = Vec::new();

        while let Some(row) = rows.next().await? {
            books.push(Self::row_to_book(&row)?);
        }

        Ok(books)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let query = "SELECT id, title, author FROM books WHERE id = ?";

        let mut rows = self.conn.query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_book(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn save(&self, book: Book) -> Result<Book, StoreError> {
        let mut rows = match book.id {
            None => {
                let query = r#"
                    INSERT INTO books (title, author)
                    VALUES (?, ?)
                    RETURNING id, title, author
                "#;
                self.conn
                    .query(query, libsql::params![book.title, book.author])
                    .await?
            }
            Some(id) => {
                let query = r#"
                    INSERT INTO books (id, title, author)
                    VALUES (?, ?, ?)
                    ON CONFLICT(id) DO UPDATE SET title = excluded.title, author = excluded.author
                    RETURNING id, title, author
                "#;
                self.conn
                    .query(query, libsql::params![id, book.title, book.author])
                    .await?
            }
        };

        match rows.next().await? {
            Some(row) => Self::row_to_book(&row),
            None => Err(StoreError::MissingRow("books")),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM books WHERE id = ?", libsql::params![id])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_find() {
        let db = Database::open_in_memory().await.unwrap();
        let saved = db.save(Book::new("test", "Ramesh")).await.unwrap();

        assert_eq!(saved, Book::new("test", "Ramesh").with_id(1));
        assert_eq!(db.find_by_id(1).await.unwrap(), Some(saved));
        assert!(db.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let db = Database::open_in_memory().await.unwrap();
        let saved = db.save(Book::new("Ramesh", "Fadatare")).await.unwrap();
        let id = saved.id.unwrap();

        let updated = db.save(Book::new("Ram", "Jadhav").with_id(id)).await.unwrap();

        assert_eq!(updated, Book::new("Ram", "Jadhav").with_id(id));
        assert_eq!(db.find_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_autoincrement_after_explicit_id() {
        let db = Database::open_in_memory().await.unwrap();
        db.save(Book::new("a", "b").with_id(10)).await.unwrap();
        let next = db.save(Book::new("c", "d")).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        let saved = db.save(Book::new("Tony", "Stark")).await.unwrap();
        let id = saved.id.unwrap();

        db.delete_by_id(id).await.unwrap();
        db.delete_by_id(id).await.unwrap();
        db.delete_by_id(12345).await.unwrap();
        assert!(db.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_migrations_run_once() {
        let db = Database::open_in_memory().await.unwrap();
        for (filename, sql) in SYSTEM_MIGRATIONS.iter().chain(MIGRATIONS) {
            Database::run_migration(&db.conn, filename, sql).await.unwrap();
        }

        let mut rows = db.conn.query("SELECT COUNT(*) FROM _migrations", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        let count: i64 = row.get(0).unwrap();
        assert_eq!(count, 2);
    }
}
