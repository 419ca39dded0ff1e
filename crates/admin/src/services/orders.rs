//! Order management: the kitchen queue, shipping fees and manual orders.

use tracing::{info, instrument};

use mian_bakery_core::{
    Order, OrderId, OrderItem, OrderStatus, Phone, Price, ProductId, ValidationError,
};
use mian_bakery_store::{OrderRepository, ProductRepository, RecordStore, StorageError};

use crate::error::{AdminError, Result};

/// Address used for manual orders when none is given.
pub const PICKUP_ADDRESS: &str = "Giao tại quầy";

/// An order the shop owner types in by hand (phone or walk-in).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualOrder {
    pub customer_name: String,
    /// Optional; blank means no phone.
    pub customer_phone: String,
    pub lines: Vec<(ProductId, u32)>,
    /// Blank means pickup at the counter.
    pub address: String,
    pub notes: String,
    pub shipping_fee: Option<Price>,
}

/// Order management service.
pub struct OrderAdminService<'a> {
    store: &'a RecordStore,
}

impl<'a> OrderAdminService<'a> {
    /// Create a new order management service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<Order>> {
        Ok(OrderRepository::new(self.store).list().await?)
    }

    /// Orders with `status`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    pub async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let mut orders = self.list().await?;
        orders.retain(|o| o.status == status);
        Ok(orders)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` if the order does not exist.
    pub async fn get(&self, id: &OrderId) -> Result<Order> {
        OrderRepository::new(self.store)
            .get(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("order {id}")))
    }

    /// Move an order to any status. Transitions are not restricted.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` if the order does not exist.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        OrderRepository::new(self.store)
            .update_status(id, status)
            .await
            .map_err(|e| not_found_as(e, id))
    }

    /// Set the shipping fee and re-derive the total.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a negative fee and
    /// `AdminError::NotFound` if the order does not exist.
    #[instrument(skip(self))]
    pub async fn set_shipping_fee(&self, id: &OrderId, fee: Price) -> Result<Order> {
        OrderRepository::new(self.store)
            .update_shipping_fee(id, fee)
            .await
            .map_err(|e| not_found_as(e, id))
    }

    /// Create an order on a customer's behalf. It starts as `PENDING`.
    ///
    /// # Errors
    ///
    /// - `AdminError::Validation` for a blank name, an invalid phone, no lines,
    ///   a zero quantity or a product that is not in the catalog
    /// - `AdminError::Storage` if the store fails
    #[instrument(skip(self, manual), fields(customer = %manual.customer_name))]
    pub async fn create_manual(&self, manual: ManualOrder) -> Result<Order> {
        let products = ProductRepository::new(self.store).list().await?;
        let items = manual
            .lines
            .iter()
            .map(|(id, quantity)| {
                products
                    .iter()
                    .find(|p| &p.id == id)
                    .map(|p| OrderItem::from_product(p, *quantity))
                    .ok_or_else(|| ValidationError::UnknownProduct(id.clone()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let address = if manual.address.trim().is_empty() {
            PICKUP_ADDRESS
        } else {
            manual.address.as_str()
        };

        let mut builder = Order::builder(manual.customer_name.as_str())
            .items(items)
            .status(OrderStatus::Pending)
            .address(address)
            .notes(manual.notes.trim());
        if !manual.customer_phone.trim().is_empty() {
            let phone = Phone::parse(&manual.customer_phone).map_err(ValidationError::from)?;
            builder = builder.customer_phone(phone);
        }
        if let Some(fee) = manual.shipping_fee {
            builder = builder.shipping_fee(fee);
        }
        let order = builder.build()?;

        OrderRepository::new(self.store).insert_new(&order).await?;
        info!(order_id = %order.id, total = %order.total_price(), "manual order created");
        Ok(order)
    }
}

fn not_found_as(err: StorageError, id: &OrderId) -> AdminError {
    match err {
        StorageError::NotFound => AdminError::NotFound(format!("order {id}")),
        other => other.into(),
    }
}
