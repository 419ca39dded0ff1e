//! Checkout: cart snapshot to persisted order.
//!
//! Either the order is stored and the cart is emptied, or nothing changes:
//! every validation runs before the insert, and the cart is cleared only after
//! the insert succeeds.

use tracing::{info, instrument};

use mian_bakery_core::{Order, ShippingInfo};
use mian_bakery_store::{OrderRepository, ProductRepository, RecordStore};

use crate::error::Result;
use crate::session::CustomerSession;

/// Checkout service.
pub struct CheckoutService<'a> {
    store: &'a RecordStore,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Place an order for everything in the session's cart.
    ///
    /// A blank `shipping.address` falls back to the profile's selected
    /// address. The order starts `PENDING` with no shipping fee; the shop sets
    /// the fee later.
    ///
    /// # Errors
    ///
    /// - `StorefrontError::NoProfile` without a profile
    /// - `StorefrontError::Validation` for an empty cart, a product no longer
    ///   in the catalog, or a missing address
    /// - `StorefrontError::Storage` if the order cannot be saved
    ///
    /// On any error the cart is left as it was.
    #[instrument(skip_all, fields(lines = session.cart().lines().len()))]
    pub async fn checkout(
        &self,
        session: &mut CustomerSession,
        shipping: ShippingInfo,
    ) -> Result<Order> {
        let profile = session.require_profile()?;
        let catalog = ProductRepository::new(self.store).list().await?;
        let items = session.cart().snapshot(&catalog)?;

        let address = if shipping.address.trim().is_empty() {
            profile.delivery_address().to_string()
        } else {
            shipping.address
        };

        let order = Order::builder(profile.name.clone())
            .customer_phone(profile.phone.clone())
            .items(items)
            .address(address)
            .notes(shipping.notes)
            .build()?;

        OrderRepository::new(self.store).insert_new(&order).await?;
        session.cart_mut().clear();

        info!(order_id = %order.id, total = %order.total_price(), "checkout complete");
        Ok(order)
    }
}
