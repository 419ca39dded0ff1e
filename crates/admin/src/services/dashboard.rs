//! The numbers on the admin home screen.

use tracing::instrument;

use mian_bakery_core::Product;
use mian_bakery_core::chat::Reader;
use mian_bakery_core::report::{BatchProgress, batch_progress, pending_count};
use mian_bakery_store::{
    MessageRepository, OrderRepository, ProductRepository, RecordStore, SettingsRepository,
};

use crate::error::Result;

/// A batched product and its progress toward the batch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCard {
    pub product: Product,
    pub progress: BatchProgress,
}

/// Dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Orders in `PENDING` or `BAKING`.
    pub new_orders: usize,
    /// Customer messages the shop has not read.
    pub unread_messages: usize,
    pub batches: Vec<BatchCard>,
}

/// Dashboard service.
pub struct DashboardService<'a> {
    store: &'a RecordStore,
}

impl<'a> DashboardService<'a> {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Build the dashboard from the current store contents.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<Dashboard> {
        let orders = OrderRepository::new(self.store).list().await?;
        let products = ProductRepository::new(self.store).list().await?;
        let settings = SettingsRepository::new(self.store).shop_settings().await?;
        let unread_messages = MessageRepository::new(self.store)
            .unread_count(Reader::Admin)
            .await?;

        let batches = settings
            .batch_product_ids
            .iter()
            .filter_map(|id| products.iter().find(|p| &p.id == id))
            .map(|product| BatchCard {
                progress: batch_progress(&orders, &product.name, product.target_qty),
                product: product.clone(),
            })
            .collect();

        Ok(Dashboard {
            new_orders: pending_count(&orders),
            unread_messages,
            batches,
        })
    }
}
