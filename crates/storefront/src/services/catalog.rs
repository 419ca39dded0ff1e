//! Catalog browsing for customers.

use chrono::Local;
use tracing::{info, instrument};

use mian_bakery_core::report::{BatchProgress, batch_progress};
use mian_bakery_core::{Product, ProductId, ProductReview};
use mian_bakery_store::{OrderRepository, ProductRepository, RecordStore, SettingsRepository};

use crate::error::{Result, StorefrontError};
use crate::session::CustomerSession;

/// A batched product and how close its batch is to baking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCard {
    pub product: Product,
    pub progress: BatchProgress,
}

/// Catalog service.
pub struct CatalogService<'a> {
    store: &'a RecordStore,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Every product, batched products first in batch order, the rest in
    /// catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Storage` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>> {
        let products = ProductRepository::new(self.store).list().await?;
        let settings = SettingsRepository::new(self.store).shop_settings().await?;

        let mut ordered: Vec<Product> = settings
            .batch_product_ids
            .iter()
            .filter_map(|id| products.iter().find(|p| &p.id == id).cloned())
            .collect();
        ordered.extend(
            products
                .into_iter()
                .filter(|p| !settings.is_batched(&p.id)),
        );
        Ok(ordered)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` if the product does not exist.
    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        ProductRepository::new(self.store)
            .get(id)
            .await?
            .ok_or_else(|| StorefrontError::NotFound(format!("product {id}")))
    }

    /// Batch progress of every batched product, for the home screen.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Storage` if the store cannot be read.
    pub async fn batch_cards(&self) -> Result<Vec<BatchCard>> {
        let products = ProductRepository::new(self.store).list().await?;
        let settings = SettingsRepository::new(self.store).shop_settings().await?;
        let orders = OrderRepository::new(self.store).list().await?;

        Ok(settings
            .batch_product_ids
            .iter()
            .filter_map(|id| products.iter().find(|p| &p.id == id))
            .map(|product| BatchCard {
                progress: batch_progress(&orders, &product.name, product.target_qty),
                product: product.clone(),
            })
            .collect())
    }

    /// Leave a review as the session's customer.
    ///
    /// # Errors
    ///
    /// - `StorefrontError::NoProfile` without a profile
    /// - `StorefrontError::Validation` for a rating outside 1-5 or a blank comment
    /// - `StorefrontError::NotFound` if the product was deleted
    #[instrument(skip(self, session, comment))]
    pub async fn add_review(
        &self,
        session: &CustomerSession,
        product_id: &ProductId,
        rating: u8,
        comment: &str,
    ) -> Result<Product> {
        let profile = session.require_profile()?;
        let review = ProductReview::new(&profile.name, rating, comment, Local::now().date_naive())?;

        let product = ProductRepository::new(self.store)
            .add_review(product_id, review)
            .await
            .map_err(|e| match e {
                mian_bakery_store::StorageError::NotFound => {
                    StorefrontError::NotFound(format!("product {product_id}"))
                }
                other => other.into(),
            })?;
        info!(%product_id, rating, "review added");
        Ok(product)
    }
}
