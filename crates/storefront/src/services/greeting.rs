//! AI greeting shown when a customer opens the chat.
//!
//! The greeting is composed from what the shop knows about the customer: an
//! order in progress, the last completed order, their latest review, and
//! whether they have been away long enough to be offered a batched product.
//! Generation failures fall back to a fixed greeting.

use askama::Template;
use chrono::{Local, NaiveDate};
use tracing::instrument;

use mian_bakery_core::ai::{CompletionRequest, TextGenerator, complete_or_fallback};
use mian_bakery_core::{Order, OrderStatus, Product, ProductReview, ShopSettings};
use mian_bakery_store::{OrderRepository, ProductRepository, RecordStore, SettingsRepository};

use crate::error::Result;
use crate::session::CustomerSession;

/// An order the kitchen is working on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveOrder {
    pub products: String,
    pub status: &'static str,
}

/// What the greeting prompt knows about the customer.
#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "prompts/greeting.txt")]
pub struct GreetingContext {
    pub customer_name: String,
    pub active_order: Option<ActiveOrder>,
    /// Products of the last completed order, when nothing is in progress.
    pub last_order: Option<String>,
    pub recent_review: Option<ProductReview>,
    /// Batched product to suggest to an inactive customer.
    pub promoted_product: Option<String>,
}

impl GreetingContext {
    /// Gather context from the customer's orders (newest first), the catalog
    /// and the shop settings.
    #[must_use]
    pub fn gather(
        customer_name: &str,
        orders: &[Order],
        products: &[Product],
        settings: &ShopSettings,
        today: NaiveDate,
        inactivity_days: i64,
    ) -> Self {
        let active_order = orders
            .iter()
            .find(|o| o.status.is_in_progress())
            .map(|o| ActiveOrder {
                products: product_names(o),
                status: o.status.label(),
            });
        let last_completed = orders
            .iter()
            .find(|o| o.status == OrderStatus::Completed);
        let last_order = if active_order.is_none() {
            last_completed.map(product_names)
        } else {
            None
        };

        let recent_review = products
            .iter()
            .filter_map(|p| p.latest_review_by(customer_name))
            .max_by_key(|r| r.date)
            .cloned();

        let is_inactive =
            last_completed.is_none_or(|o| (today - o.date).num_days() > inactivity_days);
        let promoted_product = if is_inactive {
            settings
                .batch_product_ids
                .iter()
                .find_map(|id| products.iter().find(|p| &p.id == id))
                .map(|p| p.name.clone())
        } else {
            None
        };

        Self {
            customer_name: customer_name.to_string(),
            active_order,
            last_order,
            recent_review,
            promoted_product,
        }
    }

    /// Greeting used when generation is unavailable.
    #[must_use]
    pub fn fallback(&self) -> String {
        let name = &self.customer_name;
        format!(
            "Chào {name}! Bếp Mian đã nhận được tin nhắn, \
             bạn chờ một xíu để chủ tiệm vào trò chuyện nhé! ❤️"
        )
    }
}

fn product_names(order: &Order) -> String {
    order
        .items()
        .iter()
        .map(|item| item.product_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Greeting service.
pub struct GreetingService<'a, G> {
    store: &'a RecordStore,
    generator: &'a G,
    inactivity_days: i64,
}

impl<'a, G: TextGenerator> GreetingService<'a, G> {
    /// Create a new greeting service.
    #[must_use]
    pub const fn new(store: &'a RecordStore, generator: &'a G, inactivity_days: i64) -> Self {
        Self {
            store,
            generator,
            inactivity_days,
        }
    }

    /// Compose the greeting for the session's customer.
    ///
    /// Never fails because of the text generator; only storage errors and a
    /// missing profile are returned.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoProfile` or `StorefrontError::Storage`.
    #[instrument(skip_all)]
    pub async fn greet(&self, session: &CustomerSession) -> Result<String> {
        let profile = session.require_profile()?;
        let orders = OrderRepository::new(self.store)
            .list_for_phone(&profile.phone)
            .await?;
        let products = ProductRepository::new(self.store).list().await?;
        let settings = SettingsRepository::new(self.store).shop_settings().await?;

        let context = GreetingContext::gather(
            &profile.name,
            &orders,
            &products,
            &settings,
            Local::now().date_naive(),
            self.inactivity_days,
        );
        let fallback = context.fallback();
        let Ok(prompt) = context.render() else {
            tracing::warn!("greeting prompt failed to render, using fallback");
            return Ok(fallback);
        };

        Ok(complete_or_fallback(self.generator, &CompletionRequest::text(prompt), fallback).await)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use mian_bakery_core::ai::DisabledGenerator;
    use mian_bakery_core::{OrderItem, Price, UserProfile, default_catalog};

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("datetime")
    }

    fn order(status: OrderStatus, when: NaiveDateTime) -> Order {
        let mut order = Order::builder("Minh Anh")
            .item(OrderItem {
                product_name: "Bánh Kem Dâu Tây".to_string(),
                product_image: String::new(),
                price: Price::new(55_000),
                quantity: 1,
            })
            .address("Quận 1")
            .placed_at(when)
            .build()
            .expect("order");
        order.status = status;
        order
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("date")
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).expect("date")
    }

    #[test]
    fn test_active_order_hides_last_order() {
        let orders = vec![
            order(OrderStatus::Roasting, at(2025, 5, 30)),
            order(OrderStatus::Completed, at(2025, 5, 20)),
        ];
        let ctx = GreetingContext::gather(
            "Minh Anh",
            &orders,
            &default_catalog(),
            &ShopSettings::default(),
            today(),
            90,
        );

        let active = ctx.active_order.as_ref().expect("active order");
        assert_eq!(active.status, "Đang nướng");
        assert!(ctx.last_order.is_none());
        assert!(ctx.promoted_product.is_none());

        let prompt = ctx.render().expect("render");
        assert!(prompt.contains("Minh Anh"));
        assert!(prompt.contains("Đang nướng"));
    }

    #[test]
    fn test_inactive_customer_gets_batched_product() {
        let orders = vec![order(OrderStatus::Completed, at(2025, 1, 10))];
        let ctx = GreetingContext::gather(
            "Minh Anh",
            &orders,
            &default_catalog(),
            &ShopSettings::default(),
            today(),
            90,
        );

        assert_eq!(ctx.last_order.as_deref(), Some("Bánh Kem Dâu Tây"));
        assert_eq!(ctx.promoted_product.as_deref(), Some("Bánh Mì Phô Mai Chảy"));
    }

    #[test]
    fn test_new_customer_counts_as_inactive() {
        let ctx = GreetingContext::gather(
            "Lan",
            &[],
            &default_catalog(),
            &ShopSettings::default(),
            today(),
            90,
        );
        assert!(ctx.promoted_product.is_some());
        assert!(ctx.active_order.is_none());
    }

    #[test]
    fn test_latest_review_is_picked() {
        let mut products = default_catalog();
        products[0].add_review(
            ProductReview::new("Minh Anh", 2, "Hơi khô", day(1)).expect("review"),
        );
        products[1].add_review(
            ProductReview::new("Minh Anh", 5, "Rất ngon", day(9)).expect("review"),
        );
        let ctx = GreetingContext::gather(
            "Minh Anh",
            &[],
            &products,
            &ShopSettings::default(),
            today(),
            90,
        );
        assert_eq!(ctx.recent_review.map(|r| r.comment), Some("Rất ngon".to_string()));
    }

    #[tokio::test]
    async fn test_greet_falls_back_without_generator() {
        let store = RecordStore::open_in_memory().await.expect("open");
        ProductRepository::new(&store).seed_if_empty().await.expect("seed");
        let profile = UserProfile::new("Minh Anh", "0901234567").expect("profile");
        let session = CustomerSession::new(Some(profile));

        let greeting = GreetingService::new(&store, &DisabledGenerator, 90)
            .greet(&session)
            .await
            .expect("greet");
        assert!(greeting.starts_with("Chào Minh Anh!"));
    }
}
