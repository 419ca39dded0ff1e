//! Mian Bakery Admin library.
//!
//! Services for the shop owner: products and the batch list, the order
//! queue, reports, the inbox and AI-assisted outreach.
//!
//! AI features go through [`claude::Assistant`], which reaches the Claude
//! Messages API when `CLAUDE_API_KEY` is set. Every AI call has a fixed
//! fallback, so the admin works the same without a key.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod claude;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod telemetry;

pub use error::{AdminError, Result};
