//! Mian Bakery Record Store.
//!
//! One embedded SQLite database holds an object store per entity. Each store is
//! a table of `(id, record)` rows where `record` is the whole entity as JSON;
//! writes always replace the full record.
//!
//! # Stores
//!
//! - `products` - the catalog, keyed by product ID
//! - `orders` - every order ever placed, keyed by order number
//! - `messages` - the shared chat collection, keyed by message ID
//! - `settings` - shop settings and the customer profile, keyed by name
//!
//! # Write ordering
//!
//! All writes go through one async mutex, so writes are applied in the order
//! they were issued. [`RecordStore::update`] holds the mutex across its read
//! and write so read-modify-write edits never interleave.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod messages;
pub mod orders;
pub mod products;
pub mod schema;
pub mod settings;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::Mutex;
use tracing::instrument;

use mian_bakery_core::{ChatMessage, Order, Product};

pub use error::StorageError;
pub use messages::MessageRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use settings::SettingsRepository;

/// The object stores of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectStore {
    Products,
    Orders,
    Messages,
    Settings,
}

impl ObjectStore {
    /// Every store, in the order they were introduced.
    pub const ALL: [Self; 4] = [Self::Products, Self::Orders, Self::Messages, Self::Settings];

    /// Table backing this store.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Messages => "messages",
            Self::Settings => "settings",
        }
    }
}

/// An entity persisted as a whole record in one object store.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// The store holding records of this type.
    const STORE: ObjectStore;

    /// Primary key.
    fn key(&self) -> &str;
}

impl Record for Product {
    const STORE: ObjectStore = ObjectStore::Products;

    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Order {
    const STORE: ObjectStore = ObjectStore::Orders;

    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for ChatMessage {
    const STORE: ObjectStore = ObjectStore::Messages;

    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// Handle to the embedded database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RecordStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    /// Open (or create) the database at `url` and bring its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the database cannot be opened or
    /// migrated.
    #[instrument(skip_all)]
    pub async fn open(url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Open a private in-memory database, for tests and previews.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the database cannot be created.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        // every connection to :memory: is a separate database, so keep exactly one
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        schema::ensure_schema(&pool).await?;
        Ok(Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Every record in `R`'s store, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails and
    /// `StorageError::DataCorruption` if a record does not decode.
    pub async fn get_all<R: Record>(&self) -> Result<Vec<R>, StorageError> {
        let sql = format!("SELECT id, record FROM {} ORDER BY rowid", R::STORE.table());
        let rows: Vec<(String, String)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(|(id, json)| decode::<R>(id, json)).collect()
    }

    /// The record with `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails and
    /// `StorageError::DataCorruption` if the record does not decode.
    pub async fn get<R: Record>(&self, key: &str) -> Result<Option<R>, StorageError> {
        get_in::<R>(&self.pool, key).await
    }

    /// Number of records in `R`'s store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn count<R: Record>(&self) -> Result<i64, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::STORE.table());
        Ok(sqlx::query_scalar(&sql).fetch_one(&self.pool).await?)
    }

    /// Insert or replace `record`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the record cannot be encoded
    /// and `StorageError::Database` if the write fails.
    pub async fn put<R: Record>(&self, record: &R) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        put_in(&self.pool, R::STORE, record.key(), &serde_json::to_string(record)?).await
    }

    /// Insert `record`, failing if its key is taken.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a record with the same key exists.
    pub async fn insert<R: Record>(&self, record: &R) -> Result<(), StorageError> {
        let json = serde_json::to_string(record)?;
        let sql = format!("INSERT INTO {} (id, record) VALUES (?1, ?2)", R::STORE.table());

        let _guard = self.write_lock.lock().await;
        sqlx::query(&sql)
            .bind(record.key())
            .bind(json)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::from_insert(e, record.key()))?;
        Ok(())
    }

    /// Delete the record with `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the write fails.
    pub async fn delete<R: Record>(&self, key: &str) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::STORE.table());

        let _guard = self.write_lock.lock().await;
        sqlx::query(&sql).bind(key).execute(&self.pool).await?;
        Ok(())
    }

    /// Read the record with `key`, apply `change`, and write it back, all
    /// under the write lock.
    ///
    /// Nothing is written if `change` fails.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if there is no such record, or the
    /// error returned by `change`.
    pub async fn update<R, F, E>(&self, key: &str, change: F) -> Result<R, E>
    where
        R: Record,
        F: FnOnce(&mut R) -> Result<(), E> + Send,
        E: From<StorageError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut record = get_in::<R>(&self.pool, key)
            .await?
            .ok_or(StorageError::NotFound)?;
        change(&mut record)?;
        let json = serde_json::to_string(&record).map_err(StorageError::from)?;
        put_in(&self.pool, R::STORE, key, &json).await?;
        Ok(record)
    }

    /// Write every record in `records`, holding the write lock for the whole
    /// batch. Each record is still its own statement.
    ///
    /// # Errors
    ///
    /// Returns the first write failure; earlier records stay written.
    pub async fn put_each<R: Record>(&self, records: &[R]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        for record in records {
            put_in(&self.pool, R::STORE, record.key(), &serde_json::to_string(record)?).await?;
        }
        Ok(())
    }

    /// Acquire the write lock for a multi-step operation built from the
    /// `*_locked` helpers of the repositories.
    pub(crate) async fn lock_writes(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Put a raw JSON value into `store` under the write lock.
    pub(crate) async fn put_json(
        &self,
        store: ObjectStore,
        key: &str,
        json: &str,
    ) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        put_in(&self.pool, store, key, json).await
    }

    /// Put a raw JSON value; the caller must hold the write lock.
    pub(crate) async fn put_json_locked(
        &self,
        store: ObjectStore,
        key: &str,
        json: &str,
    ) -> Result<(), StorageError> {
        put_in(&self.pool, store, key, json).await
    }

    /// Read a raw JSON value from `store`.
    pub(crate) async fn get_json(
        &self,
        store: ObjectStore,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        let sql = format!("SELECT record FROM {} WHERE id = ?1", store.table());
        Ok(sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?)
    }
}

async fn get_in<R: Record>(pool: &SqlitePool, key: &str) -> Result<Option<R>, StorageError> {
    let sql = format!("SELECT record FROM {} WHERE id = ?1", R::STORE.table());
    let json: Option<String> = sqlx::query_scalar(&sql)
        .bind(key)
        .fetch_optional(pool)
        .await?;
    json.map(|json| decode::<R>(key, &json)).transpose()
}

async fn put_in(
    pool: &SqlitePool,
    store: ObjectStore,
    key: &str,
    json: &str,
) -> Result<(), StorageError> {
    let sql = format!(
        "INSERT INTO {} (id, record) VALUES (?1, ?2) \
         ON CONFLICT(id) DO UPDATE SET record = excluded.record",
        store.table()
    );
    sqlx::query(&sql).bind(key).bind(json).execute(pool).await?;
    Ok(())
}

fn decode<R: DeserializeOwned>(key: &str, json: &str) -> Result<R, StorageError> {
    serde_json::from_str(json)
        .map_err(|e| StorageError::DataCorruption(format!("record {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use mian_bakery_core::{MessageId, Phone, ProductId, SenderId, default_catalog};

    use super::*;

    async fn store() -> RecordStore {
        RecordStore::open_in_memory().await.expect("open store")
    }

    #[tokio::test]
    async fn test_put_then_get_all_round_trips() {
        let store = store().await;
        let catalog = default_catalog();
        for product in &catalog {
            store.put(product).await.expect("put");
        }

        let loaded: Vec<Product> = store.get_all().await.expect("get_all");
        assert_eq!(loaded, catalog);
    }

    #[tokio::test]
    async fn test_chat_messages_round_trip() {
        let store = store().await;
        let phone = Phone::parse("0901234567").expect("phone");
        let now = chrono::Utc::now();
        let saved = vec![
            ChatMessage::from_admin(&phone, "Bếp Mian", "Bánh xong rồi chị ơi", &now)
                .expect("admin message"),
            ChatMessage::from_customer(&phone, "Lan", "Dạ em cảm ơn", &now)
                .expect("customer message"),
            ChatMessage {
                id: MessageId::generate(),
                sender_id: SenderId::Admin,
                sender_name: "Bếp Mian".to_string(),
                text: "0901234567->Chào chị".to_string(),
                conversation_id: None,
                time: "08:00".to_string(),
                timestamp: 1,
                is_read: true,
            },
        ];
        assert!(saved[0].conversation_id.is_some());
        for message in &saved {
            store.put(message).await.expect("put");
        }

        let loaded: Vec<ChatMessage> = store.get_all().await.expect("get_all");
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_put_overwrites_whole_record() {
        let store = store().await;
        let mut product = default_catalog().remove(0);
        store.put(&product).await.expect("put");

        product.name = "Bánh Mì Bơ Tỏi".to_string();
        product.is_best_seller = false;
        store.put(&product).await.expect("put");

        let loaded: Vec<Product> = store.get_all().await.expect("get_all");
        assert_eq!(loaded, vec![product]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store().await;
        let product = default_catalog().remove(0);
        store.put(&product).await.expect("put");

        store.delete::<Product>("1").await.expect("delete");
        store.delete::<Product>("1").await.expect("delete again");
        store.delete::<Product>("never-existed").await.expect("delete missing");
        assert_eq!(store.count::<Product>().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_insert_detects_conflict() {
        let store = store().await;
        let product = default_catalog().remove(0);
        store.insert(&product).await.expect("first insert");

        let err = store.insert(&product).await.expect_err("duplicate");
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = store().await;
        let result = store
            .update::<Product, _, StorageError>("nope", |_| Ok(()))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let store = store().await;
        let product = default_catalog().remove(0);
        store.put(&product).await.expect("put");

        let result = store
            .update::<Product, _, StorageError>("1", |p| {
                p.name = "changed".to_string();
                Err(StorageError::NotFound)
            })
            .await;
        assert!(result.is_err());

        let loaded: Option<Product> = store.get("1").await.expect("get");
        assert_eq!(loaded.map(|p| p.name), Some(product.name));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_reported() {
        let store = store().await;
        sqlx::query("INSERT INTO products (id, record) VALUES ('bad', '{not json')")
            .execute(store.pool())
            .await
            .expect("raw insert");

        let err = store.get_all::<Product>().await.expect_err("corrupt");
        assert!(matches!(err, StorageError::DataCorruption(_)));
        assert!(store.get::<Product>(ProductId::new("bad").as_str()).await.is_err());
    }
}
