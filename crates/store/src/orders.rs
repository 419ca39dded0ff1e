//! Order persistence.
//!
//! New orders are inserted, never upserted, so an order number collision
//! surfaces as [`StorageError::Conflict`] instead of replacing an order.

use std::cmp::Reverse;

use tracing::{info, instrument, warn};

use mian_bakery_core::{Order, OrderId, OrderStatus, Phone, Price};

use crate::{RecordStore, StorageError};

/// Repository for the `orders` store.
pub struct OrderRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Persist a newly built order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the order number is already taken.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn insert_new(&self, order: &Order) -> Result<(), StorageError> {
        self.store.insert(order).await?;
        info!(total = %order.total_price(), "order created");
        Ok(())
    }

    /// Every order, newest first.
    ///
    /// A stored total that disagrees with its items and shipping fee is
    /// recomputed and logged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, StorageError> {
        let mut orders: Vec<Order> = self.store.get_all().await?;
        for order in &mut orders {
            let stored = order.total_price();
            if order.repair_total() {
                warn!(
                    order_id = %order.id,
                    %stored,
                    repaired = %order.total_price(),
                    "order total was inconsistent"
                );
            }
        }
        orders.sort_by_key(|o| Reverse((o.date, o.time.clone())));
        Ok(orders)
    }

    /// Orders placed by the customer with `phone`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn list_for_phone(&self, phone: &Phone) -> Result<Vec<Order>, StorageError> {
        let mut orders = self.list().await?;
        orders.retain(|o| o.belongs_to(phone));
        Ok(orders)
    }

    /// Get an order by number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, StorageError> {
        let order: Option<Order> = self.store.get(id.as_str()).await?;
        Ok(order.map(|mut o| {
            o.repair_total();
            o
        }))
    }

    /// Set the status. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if there is no such order.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, StorageError> {
        let order = self
            .store
            .update(id.as_str(), |order: &mut Order| {
                order.status = status;
                Ok::<_, StorageError>(())
            })
            .await?;
        info!(%status, "order status changed");
        Ok(order)
    }

    /// Set the shipping fee; the total is re-derived from the items.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if there is no such order and
    /// `StorageError::Rejected` for a negative fee.
    #[instrument(skip(self))]
    pub async fn update_shipping_fee(
        &self,
        id: &OrderId,
        fee: Price,
    ) -> Result<Order, StorageError> {
        let order = self
            .store
            .update(id.as_str(), |order: &mut Order| {
                order.set_shipping_fee(fee).map_err(StorageError::from)
            })
            .await?;
        info!(total = %order.total_price(), "shipping fee updated");
        Ok(order)
    }
}
