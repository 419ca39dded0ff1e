//! Orders and their denormalized line items.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, require};
use crate::models::product::Product;
use crate::types::{OrderId, OrderStatus, Phone, Price};

/// A line on an order.
///
/// This is a snapshot of the product at the time of ordering, not a reference:
/// later catalog edits do not change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_name: String,
    pub product_image: String,
    /// Unit price when ordered.
    pub price: Price,
    pub quantity: u32,
}

impl OrderItem {
    /// Snapshot `product` at `quantity` units.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_name: product.name.clone(),
            product_image: product.image.clone(),
            price: product.price,
            quantity,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Where and how the customer wants the order delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub address: String,
    pub notes: String,
}

/// A customer order.
///
/// `items`, `shipping_fee` and `total_price` are private: the total is always
/// `subtotal(items) + shipping_fee`, and the only way to change the fee is
/// [`Order::set_shipping_fee`], which re-derives the total from the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order number, `#DH…`.
    pub id: OrderId,
    pub customer_name: String,
    /// Identity key for "my orders" and chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<Phone>,
    items: Vec<OrderItem>,
    /// Admin-settable at any time.
    pub status: OrderStatus,
    /// Display time of day (`HH:MM`).
    pub time: String,
    total_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shipping_fee: Option<Price>,
    #[serde(default)]
    pub notes: String,
    pub address: String,
    /// Calendar day the order was placed, used for period filtering.
    pub date: NaiveDate,
}

impl Order {
    /// Start building an order for `customer_name`.
    #[must_use]
    pub fn builder(customer_name: impl Into<String>) -> OrderBuilder {
        OrderBuilder::new(customer_name)
    }

    /// The ordered lines.
    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Sum of line totals, without shipping.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Shipping fee, zero when none has been set.
    #[must_use]
    pub fn shipping_fee(&self) -> Price {
        self.shipping_fee.unwrap_or(Price::ZERO)
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        self.total_price
    }

    /// Set the shipping fee and re-derive the total from the items.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` if `fee` is below zero; the order is unchanged.
    pub fn set_shipping_fee(&mut self, fee: Price) -> Result<(), ValidationError> {
        if fee.as_i64() < 0 {
            return Err(ValidationError::NegativeAmount("shipping fee"));
        }
        self.shipping_fee = Some(fee);
        self.total_price = self.subtotal() + fee;
        Ok(())
    }

    /// Whether the stored total matches `subtotal + shipping_fee`.
    #[must_use]
    pub fn has_consistent_total(&self) -> bool {
        self.total_price == self.subtotal() + self.shipping_fee()
    }

    /// Recompute the total if it drifted. Returns `true` if it changed.
    pub fn repair_total(&mut self) -> bool {
        if self.has_consistent_total() {
            return false;
        }
        self.total_price = self.subtotal() + self.shipping_fee();
        true
    }

    /// Total units of `product_name` on this order.
    #[must_use]
    pub fn quantity_of(&self, product_name: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.product_name == product_name)
            .map(|item| item.quantity)
            .sum()
    }

    /// Whether this order was placed by the customer with `phone`.
    #[must_use]
    pub fn belongs_to(&self, phone: &Phone) -> bool {
        self.customer_phone.as_ref() == Some(phone)
    }
}

/// Builder for [`Order`] with named, validated fields.
///
/// Used both for customer checkout and for orders the admin types in by hand.
#[derive(Debug, Clone)]
#[must_use]
pub struct OrderBuilder {
    id: Option<OrderId>,
    customer_name: String,
    customer_phone: Option<Phone>,
    items: Vec<OrderItem>,
    status: OrderStatus,
    shipping_fee: Option<Price>,
    address: String,
    notes: String,
    placed_at: Option<NaiveDateTime>,
}

impl OrderBuilder {
    fn new(customer_name: impl Into<String>) -> Self {
        Self {
            id: None,
            customer_name: customer_name.into(),
            customer_phone: None,
            items: Vec::new(),
            status: OrderStatus::Pending,
            shipping_fee: None,
            address: String::new(),
            notes: String::new(),
            placed_at: None,
        }
    }

    /// Use a specific order number instead of generating one.
    pub fn id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn customer_phone(mut self, phone: Phone) -> Self {
        self.customer_phone = Some(phone);
        self
    }

    pub fn item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = OrderItem>) -> Self {
        self.items.extend(items);
        self
    }

    /// Initial status; defaults to `PENDING`.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn shipping_fee(mut self, fee: Price) -> Self {
        self.shipping_fee = Some(fee);
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// When the order was placed; defaults to now in local time.
    pub fn placed_at(mut self, at: NaiveDateTime) -> Self {
        self.placed_at = Some(at);
        self
    }

    /// Validate the fields and produce the order.
    ///
    /// # Errors
    ///
    /// - `MissingField` for a blank customer name or address
    /// - `EmptyCart` when there are no items
    /// - `ZeroQuantity` for a line with quantity 0
    /// - `NegativeAmount` for a negative unit price or shipping fee
    pub fn build(self) -> Result<Order, ValidationError> {
        let customer_name = require(&self.customer_name, "customer name")?;
        let address = require(&self.address, "address")?;

        if self.items.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        for item in &self.items {
            if item.quantity == 0 {
                return Err(ValidationError::ZeroQuantity);
            }
            if item.price.as_i64() < 0 {
                return Err(ValidationError::NegativeAmount("price"));
            }
        }
        if self.shipping_fee.is_some_and(|fee| fee.as_i64() < 0) {
            return Err(ValidationError::NegativeAmount("shipping fee"));
        }

        let placed_at = self
            .placed_at
            .unwrap_or_else(|| Local::now().naive_local());
        let subtotal: Price = self.items.iter().map(OrderItem::line_total).sum();
        let total_price = subtotal + self.shipping_fee.unwrap_or(Price::ZERO);

        Ok(Order {
            id: self.id.unwrap_or_else(OrderId::generate),
            customer_name,
            customer_phone: self.customer_phone,
            items: self.items,
            status: self.status,
            time: placed_at.format("%H:%M").to_string(),
            total_price,
            shipping_fee: self.shipping_fee,
            notes: self.notes.trim().to_string(),
            address,
            date: placed_at.date(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            product_name: name.to_string(),
            product_image: String::new(),
            price: Price::new(price),
            quantity,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid datetime")
    }

    #[test]
    fn test_total_is_subtotal_without_fee() {
        let order = Order::builder("Minh Anh")
            .item(item("Bánh Mì Phô Mai Chảy", 45_000, 2))
            .address("123 Lê Lợi")
            .build()
            .expect("valid order");

        assert_eq!(order.total_price(), Price::new(90_000));
        assert_eq!(order.shipping_fee(), Price::ZERO);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.id.as_str().starts_with("#DH"));
    }

    #[test]
    fn test_set_shipping_fee_rederives_total() {
        let mut order = Order::builder("Minh Anh")
            .item(item("Bánh Mì Phô Mai Chảy", 45_000, 2))
            .address("123 Lê Lợi")
            .build()
            .expect("valid order");

        order.set_shipping_fee(Price::new(15_000)).expect("fee");
        assert_eq!(order.total_price(), Price::new(105_000));

        order.set_shipping_fee(Price::new(10_000)).expect("fee");
        assert_eq!(order.total_price(), Price::new(100_000));
        assert!(order.has_consistent_total());
    }

    #[test]
    fn test_negative_fee_rejected_and_order_unchanged() {
        let mut order = Order::builder("Minh Anh")
            .item(item("Bánh", 10_000, 1))
            .address("Giao tại quầy")
            .build()
            .expect("valid order");
        let before = order.clone();

        assert_eq!(
            order.set_shipping_fee(Price::new(-1)),
            Err(ValidationError::NegativeAmount("shipping fee"))
        );
        assert_eq!(order, before);
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(
            Order::builder(" ").item(item("Bánh", 1, 1)).address("x").build(),
            Err(ValidationError::MissingField("customer name"))
        );
        assert_eq!(
            Order::builder("Lan").address("x").build(),
            Err(ValidationError::EmptyCart)
        );
        assert_eq!(
            Order::builder("Lan").item(item("Bánh", 1, 0)).address("x").build(),
            Err(ValidationError::ZeroQuantity)
        );
        assert_eq!(
            Order::builder("Lan").item(item("Bánh", 1, 1)).build(),
            Err(ValidationError::MissingField("address"))
        );
    }

    #[test]
    fn test_placed_at_sets_date_and_time() {
        let order = Order::builder("Lan")
            .item(item("Bánh", 1, 1))
            .address("x")
            .placed_at(at(2025, 3, 14))
            .build()
            .expect("valid order");

        assert_eq!(order.date.to_string(), "2025-03-14");
        assert_eq!(order.time, "09:30");
    }

    #[test]
    fn test_repair_total_fixes_drift() {
        let order = Order::builder("Lan")
            .item(item("Bánh", 20_000, 3))
            .shipping_fee(Price::new(5_000))
            .address("x")
            .build()
            .expect("valid order");

        let mut json = serde_json::to_value(&order).expect("serialize");
        json["totalPrice"] = serde_json::json!(1);
        let mut stale: Order = serde_json::from_value(json).expect("deserialize");

        assert!(!stale.has_consistent_total());
        assert!(stale.repair_total());
        assert_eq!(stale.total_price(), Price::new(65_000));
        assert!(!stale.repair_total());
    }

    #[test]
    fn test_quantity_of_sums_matching_lines() {
        let order = Order::builder("Lan")
            .item(item("Bánh Mì", 1, 2))
            .item(item("Bánh Kem", 1, 1))
            .item(item("Bánh Mì", 1, 3))
            .address("x")
            .build()
            .expect("valid order");

        assert_eq!(order.quantity_of("Bánh Mì"), 5);
        assert_eq!(order.quantity_of("Bánh Bao"), 0);
    }
}
