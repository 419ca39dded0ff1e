//! Validation errors shared by both roles.

use thiserror::Error;

use crate::types::{PhoneError, ProductId};

/// User input that violates a precondition.
///
/// Every variant is detected before anything is persisted, and the message is
/// meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line points at a product that is no longer in the catalog.
    #[error("product {0} is no longer available")]
    UnknownProduct(ProductId),

    /// An order line has a zero quantity.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// A price or fee is negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// A review rating is outside 1-5.
    #[error("rating must be between 1 and 5 (got {0})")]
    InvalidRating(u8),

    /// A phone number failed to parse.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// The email address has no `@`.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The supplied current password does not match.
    #[error("current password is incorrect")]
    WrongPassword,

    /// The new password is too short.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length.
        min: usize,
    },

    /// A report month outside 1-12.
    #[error("month must be between 1 and 12 (got {0})")]
    InvalidMonth(u32),

    /// The confirmation does not match the new password.
    #[error("password confirmation does not match")]
    PasswordMismatch,
}

/// Return `value` trimmed, or [`ValidationError::MissingField`] if it is blank.
///
/// # Errors
///
/// Returns `MissingField(field)` when `value` is empty after trimming.
pub fn require(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
