//! Business logic services for the customer role.
//!
//! # Services
//!
//! - `catalog` - Product listing (batched products first), reviews, batch progress
//! - `checkout` - Turning the cart into a persisted order
//! - `orders` - "My orders" tracking
//! - `chat` - The customer's thread with the shop
//! - `greeting` - AI greeting shown when the chat opens
//! - `profile` - Saving the customer profile

pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod greeting;
pub mod orders;
pub mod profile;

pub use catalog::CatalogService;
pub use chat::ChatService;
pub use checkout::CheckoutService;
pub use greeting::GreetingService;
pub use orders::OrderTrackingService;
pub use profile::ProfileService;
