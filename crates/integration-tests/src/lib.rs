//! Shared fixtures for the Mian Bakery integration tests.
//!
//! Each test gets its own [`RecordStore`]: in memory for behaviour tests, on
//! a temporary file when the database has to be closed and reopened.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use mian_bakery_core::ai::{CompletionRequest, TextGenerator};
use mian_bakery_core::{Order, OrderItem, Phone, Price, UserProfile};
use mian_bakery_store::{ProductRepository, RecordStore, StorageError};
use mian_bakery_storefront::CustomerSession;

/// Lan's phone number.
pub const LAN_PHONE: &str = "0901234567";

/// Minh's phone number.
pub const MINH_PHONE: &str = "0912345678";

/// Open an in-memory store with the default catalog.
///
/// # Errors
///
/// Returns `StorageError` if the store cannot be created or seeded.
pub async fn seeded_store() -> Result<RecordStore, StorageError> {
    let store = RecordStore::open_in_memory().await?;
    ProductRepository::new(&store).seed_if_empty().await?;
    Ok(store)
}

/// A session for a customer with a fixed delivery address.
///
/// # Panics
///
/// Panics if `name` or `phone` is invalid.
#[must_use]
pub fn customer(name: &str, phone: &str) -> CustomerSession {
    let mut profile = UserProfile::new(name, phone).expect("valid profile");
    profile.fixed_address = "25 Nguyễn Huệ, Quận 1".to_string();
    CustomerSession::new(Some(profile))
}

/// Noon on the given day.
///
/// # Panics
///
/// Panics on an invalid date.
#[must_use]
pub fn noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

/// An order of one product line, placed at `when`.
///
/// # Panics
///
/// Panics if the order does not validate.
#[must_use]
pub fn order_at(
    customer_name: &str,
    phone: Option<&str>,
    line: (&str, i64, u32),
    when: NaiveDateTime,
) -> Order {
    let (product_name, unit_price, quantity) = line;
    let mut builder = Order::builder(customer_name)
        .item(OrderItem {
            product_name: product_name.to_string(),
            product_image: String::new(),
            price: Price::new(unit_price),
            quantity,
        })
        .address("Quận 1")
        .placed_at(when);
    if let Some(phone) = phone {
        builder = builder.customer_phone(Phone::parse(phone).expect("valid phone"));
    }
    builder.build().expect("valid order")
}

/// Error returned by [`FakeGenerator`] when it runs out of responses.
#[derive(Debug, Error)]
#[error("fake generator failure")]
pub struct FakeGeneratorError;

/// Stand-in for the hosted text generator.
///
/// Responses are returned in order; `None` entries and an exhausted script
/// fail the call. Every request is recorded.
#[derive(Debug, Default)]
pub struct FakeGenerator {
    responses: Mutex<VecDeque<Option<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeGenerator {
    /// A generator that answers with `responses`, in order.
    #[must_use]
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| r.map(Into::into)).collect()),
            requests: Mutex::default(),
        }
    }

    /// A generator whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self::default()
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl TextGenerator for FakeGenerator {
    type Error = FakeGeneratorError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
            .flatten();
        next.ok_or(FakeGeneratorError)
    }
}
