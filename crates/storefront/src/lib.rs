//! Mian Bakery Storefront library.
//!
//! Services for the customer role. Each service borrows the shared
//! [`RecordStore`](mian_bakery_store::RecordStore) and works on a
//! [`CustomerSession`] holding the profile and the cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod state;

pub use error::{Result, StorefrontError};
pub use session::CustomerSession;
