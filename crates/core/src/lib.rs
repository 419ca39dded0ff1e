//! Mian Bakery Core - entity model and pure state reducers.
//!
//! This crate is shared by both roles of the app:
//! - `storefront` - customers browse, order, track and chat
//! - `admin` - the shop manages products, orders, reports and outreach
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no database
//! access, no HTTP clients. Persistence lives in `mian-bakery-store`; the
//! text-generation client lives in the admin crate behind [`ai::TextGenerator`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, phone numbers and statuses
//! - [`models`] - Products, orders, chat messages, profile and shop settings
//! - [`cart`] - The customer's cart reducer
//! - [`chat`] - Thread grouping and read/unread accounting
//! - [`report`] - Batch progress, revenue, growth and rankings
//! - [`handoff`] - `tel:`/`sms:` links
//! - [`ai`] - Text-generation contract with fallbacks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod cart;
pub mod chat;
pub mod error;
pub mod handoff;
pub mod models;
pub mod report;
pub mod types;

pub use error::ValidationError;
pub use models::*;
pub use types::*;
