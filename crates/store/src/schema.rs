//! Additive schema migration.
//!
//! The schema version is kept in `PRAGMA user_version`. Older databases may
//! lack stores added later (`messages` arrived after `products` and `orders`);
//! [`ensure_schema`] creates whatever is missing and never alters or drops an
//! existing store.

use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::{ObjectStore, StorageError};

/// Schema version written after a successful migration.
pub const SCHEMA_VERSION: i64 = 3;

/// Create every missing object store. Safe to run on every open.
///
/// # Errors
///
/// Returns `StorageError::Database` if the schema cannot be read or changed.
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;

    for store in ObjectStore::ALL {
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        )
        .bind(store.table())
        .fetch_one(&mut *tx)
        .await?;

        if exists == 0 {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} \
                 (id TEXT PRIMARY KEY NOT NULL, record TEXT NOT NULL)",
                store.table()
            );
            sqlx::query(&ddl).execute(&mut *tx).await?;
            info!(store = store.table(), "created object store");
        }
    }

    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(&mut *tx)
        .await?;
    if version < SCHEMA_VERSION {
        // PRAGMA does not take bound parameters
        sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
            .execute(&mut *tx)
            .await?;
        info!(from = version, to = SCHEMA_VERSION, "schema upgraded");
    } else {
        debug!(version, "schema up to date");
    }

    tx.commit().await?;
    Ok(())
}

/// Current `user_version` of the database.
///
/// # Errors
///
/// Returns `StorageError::Database` if the pragma cannot be read.
pub async fn schema_version(pool: &SqlitePool) -> Result<i64, StorageError> {
    Ok(sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?)
}
