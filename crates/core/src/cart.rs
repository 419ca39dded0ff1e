//! The customer's in-progress cart.
//!
//! The cart is transient: it lives in the customer session and is never
//! persisted. Every line has a unique product ID and a quantity of at least 1.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{OrderItem, Product};
use crate::types::{Price, ProductId};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Cart contents, in the order products were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity of `product_id` in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| &line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Add `quantity` units of `product_id`.
    ///
    /// Increments the existing line, or appends a new one. Adding 0 is a no-op.
    pub fn add(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                product_id: product_id.clone(),
                quantity,
            });
        }
    }

    /// Change the quantity of `product_id` by `delta`, clamping at 0.
    ///
    /// A line that reaches 0 is removed; this is the only way lines leave the
    /// cart besides [`Cart::clear`]. Unknown product IDs are ignored.
    pub fn update_qty(&mut self, product_id: &ProductId, delta: i32) {
        let Some(pos) = self.lines.iter().position(|l| &l.product_id == product_id) else {
            return;
        };
        let line = &mut self.lines[pos];
        line.quantity = line.quantity.saturating_add_signed(delta);
        if line.quantity == 0 {
            self.lines.remove(pos);
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Snapshot each line against `catalog` as order items.
    ///
    /// # Errors
    ///
    /// - `EmptyCart` if there is nothing to snapshot
    /// - `UnknownProduct` for the first line whose product is no longer in
    ///   the catalog; no partial list is returned
    pub fn snapshot(&self, catalog: &[Product]) -> Result<Vec<OrderItem>, ValidationError> {
        if self.lines.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        self.lines
            .iter()
            .map(|line| {
                catalog
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map(|product| OrderItem::from_product(product, line.quantity))
                    .ok_or_else(|| ValidationError::UnknownProduct(line.product_id.clone()))
            })
            .collect()
    }

    /// Sum of current catalog prices for resolvable lines.
    #[must_use]
    pub fn subtotal(&self, catalog: &[Product]) -> Price {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map(|p| p.price.times(line.quantity))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_catalog;

    fn p(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_then_decrement_to_removal() {
        let mut cart = Cart::new();
        cart.add(&p("p1"), 2);
        assert_eq!(
            cart.lines(),
            &[CartLine {
                product_id: p("p1"),
                quantity: 2
            }]
        );

        cart.update_qty(&p("p1"), -1);
        assert_eq!(cart.quantity_of(&p("p1")), 1);

        cart.update_qty(&p("p1"), -1);
        assert!(cart.is_empty());

        // already removed: nothing to do
        cart.update_qty(&p("p1"), -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = Cart::new();
        cart.add(&p("p1"), 1);
        cart.add(&p("p2"), 3);
        cart.add(&p("p1"), 2);

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.quantity_of(&p("p1")), 3);
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_update_clamps_at_zero() {
        let mut cart = Cart::new();
        cart.add(&p("p1"), 2);
        cart.update_qty(&p("p1"), -10);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_zero_add_is_noop() {
        let mut cart = Cart::new();
        cart.add(&p("p1"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_stay_positive_and_unique() {
        let ops: [(&str, i32); 10] = [
            ("a", 2),
            ("b", 1),
            ("a", -1),
            ("c", 4),
            ("b", -1),
            ("a", 3),
            ("c", -5),
            ("b", 2),
            ("a", -4),
            ("d", 1),
        ];
        let mut cart = Cart::new();
        for (id, delta) in ops {
            if delta > 0 {
                cart.add(&p(id), delta.unsigned_abs());
            } else {
                cart.update_qty(&p(id), delta);
            }
            let mut ids: Vec<_> = cart.lines().iter().map(|l| l.product_id.clone()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), cart.lines().len());
            assert!(cart.lines().iter().all(|l| l.quantity > 0));
        }
        assert_eq!(cart.quantity_of(&p("b")), 2);
        assert_eq!(cart.quantity_of(&p("a")), 0);
    }

    #[test]
    fn test_snapshot_resolves_catalog() {
        let catalog = default_catalog();
        let mut cart = Cart::new();
        cart.add(&p("1"), 2);

        let items = cart.snapshot(&catalog).expect("snapshot");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "Bánh Mì Phô Mai Chảy");
        assert_eq!(items[0].line_total(), Price::new(90_000));
        assert_eq!(cart.subtotal(&catalog), Price::new(90_000));
    }

    #[test]
    fn test_snapshot_fails_fast_on_unknown_product() {
        let catalog = default_catalog();
        let mut cart = Cart::new();
        cart.add(&p("1"), 1);
        cart.add(&p("gone"), 1);

        assert_eq!(
            cart.snapshot(&catalog),
            Err(ValidationError::UnknownProduct(p("gone")))
        );
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_snapshot_empty_cart() {
        assert_eq!(Cart::new().snapshot(&[]), Err(ValidationError::EmptyCart));
    }
}
