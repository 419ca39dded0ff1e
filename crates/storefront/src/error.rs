//! Unified error handling for customer operations.
//!
//! Every service returns `Result<T, StorefrontError>`. [`StorefrontError::user_message`]
//! gives the text to show the customer without leaking storage details.

use thiserror::Error;

use mian_bakery_core::ValidationError;
use mian_bakery_store::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The record store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input was rejected before anything was saved.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The customer has not set up a profile yet.
    #[error("no customer profile")]
    NoProfile,
}

impl StorefrontError {
    /// Message to show the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                "Không thể lưu dữ liệu, vui lòng thử lại.".to_string()
            }
            Self::Validation(err) => err.to_string(),
            Self::NotFound(what) => format!("Không tìm thấy {what}."),
            Self::NoProfile => "Vui lòng cập nhật hồ sơ trước khi đặt bánh.".to_string(),
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
