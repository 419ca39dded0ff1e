//! Record store errors.

use mian_bakery_core::ValidationError;
use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record could not be encoded for writing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored record could not be decoded.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested record was not found.
    #[error("not found")]
    NotFound,

    /// A record with the same key already exists.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An update was rejected before anything was written.
    #[error(transparent)]
    Rejected(#[from] ValidationError),
}

impl StorageError {
    /// Map a unique-key violation to [`StorageError::Conflict`].
    pub(crate) fn from_insert(err: sqlx::Error, key: &str) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(format!("duplicate key {key}"))
            }
            other => Self::Database(other),
        }
    }
}
