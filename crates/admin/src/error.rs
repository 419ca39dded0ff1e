//! Unified error handling for admin operations.

use thiserror::Error;

use mian_bakery_core::ValidationError;
use mian_bakery_store::StorageError;

/// Application-level error type for the admin role.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The record store failed.
    #[error("Storage error: {0}")]
    Storage(StorageError),

    /// Input was rejected before anything was saved.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Wrong admin password.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A prompt payload failed to serialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

impl From<StorageError> for AdminError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Rejected(validation) => Self::Validation(validation),
            other => Self::Storage(other),
        }
    }
}

impl AdminError {
    /// Message to show the shop owner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                "Không thể lưu dữ liệu, vui lòng thử lại.".to_string()
            }
            Self::Render(err) => {
                tracing::error!(error = %err, "template error");
                "Không thể tạo báo cáo.".to_string()
            }
            Self::Serialization(err) => {
                tracing::error!(error = %err, "serialization error");
                "Không thể xử lý dữ liệu.".to_string()
            }
            Self::Validation(err) => err.to_string(),
            Self::NotFound(what) => format!("Không tìm thấy {what}."),
            Self::Unauthorized(_) => "Mật khẩu không đúng.".to_string(),
        }
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_becomes_validation() {
        let err = AdminError::from(StorageError::Rejected(ValidationError::NegativeAmount(
            "shipping fee",
        )));
        assert!(matches!(
            err,
            AdminError::Validation(ValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_storage_details_hidden() {
        let err = AdminError::from(StorageError::DataCorruption("orders #DH1: eof".to_string()));
        assert!(!err.user_message().contains("eof"));
    }
}
