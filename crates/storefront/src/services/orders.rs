//! "My orders" tracking.

use mian_bakery_core::{Order, OrderId};
use mian_bakery_store::{OrderRepository, RecordStore};

use crate::error::{Result, StorefrontError};
use crate::session::CustomerSession;

/// Order tracking for the session's customer.
pub struct OrderTrackingService<'a> {
    store: &'a RecordStore,
}

impl<'a> OrderTrackingService<'a> {
    /// Create a new order tracking service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Orders placed with the profile's phone, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoProfile` without a profile.
    pub async fn my_orders(&self, session: &CustomerSession) -> Result<Vec<Order>> {
        let profile = session.require_profile()?;
        Ok(OrderRepository::new(self.store)
            .list_for_phone(&profile.phone)
            .await?)
    }

    /// One of the customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` if the order does not exist or
    /// belongs to someone else.
    pub async fn order(&self, session: &CustomerSession, id: &OrderId) -> Result<Order> {
        let profile = session.require_profile()?;
        OrderRepository::new(self.store)
            .get(id)
            .await?
            .filter(|o| o.belongs_to(&profile.phone))
            .ok_or_else(|| StorefrontError::NotFound(format!("order {id}")))
    }
}
