//! Product management and the batch list.

use tracing::{info, instrument};

use mian_bakery_core::{Product, ProductId};
use mian_bakery_store::{ProductRepository, RecordStore, SettingsRepository, StorageError};

use crate::error::{AdminError, Result};

/// Product management service.
pub struct ProductAdminService<'a> {
    store: &'a RecordStore,
}

impl<'a> ProductAdminService<'a> {
    /// Create a new product management service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Every product in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(ProductRepository::new(self.store).list().await?)
    }

    /// Create or replace a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a blank name or negative price.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn save(&self, product: &Product) -> Result<()> {
        product.validate()?;
        ProductRepository::new(self.store).save(product).await?;
        info!(name = %product.name, "product saved");
        Ok(())
    }

    /// Delete a product and take it off the batch list.
    ///
    /// Orders keep their own copy of the product name and price, so past
    /// orders are unaffected. Deleting a missing product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<()> {
        ProductRepository::new(self.store).delete(id).await?;
        SettingsRepository::new(self.store)
            .update_shop_settings(|settings| {
                settings.batch_product_ids.retain(|batched| batched != id);
                Ok::<_, StorageError>(())
            })
            .await?;
        info!("product deleted");
        Ok(())
    }

    /// Add the product to the batch list, or remove it if already there.
    ///
    /// Returns whether the product is batched afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn toggle_batch(&self, id: &ProductId) -> Result<bool> {
        if ProductRepository::new(self.store).get(id).await?.is_none() {
            return Err(AdminError::NotFound(format!("product {id}")));
        }
        let batched = SettingsRepository::new(self.store)
            .update_shop_settings(|settings| {
                Ok::<_, StorageError>(settings.toggle_batch_product(id))
            })
            .await?;
        info!(batched, "batch list changed");
        Ok(batched)
    }
}
