//! Catalog persistence.

use tracing::{info, instrument};

use mian_bakery_core::{Product, ProductId, ProductReview, default_catalog};

use crate::{RecordStore, StorageError};

/// Repository for the `products` store.
pub struct ProductRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Every product, in the order they were first saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, StorageError> {
        self.store.get_all().await
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, StorageError> {
        self.store.get(id.as_str()).await
    }

    /// Save the full product, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn save(&self, product: &Product) -> Result<(), StorageError> {
        self.store.put(product).await
    }

    /// Delete a product. Existing orders keep their snapshot of it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), StorageError> {
        self.store.delete::<Product>(id.as_str()).await
    }

    /// Append a review and save the product.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the product no longer exists.
    #[instrument(skip(self, review), fields(rating = review.rating))]
    pub async fn add_review(
        &self,
        id: &ProductId,
        review: ProductReview,
    ) -> Result<Product, StorageError> {
        self.store
            .update(id.as_str(), |product: &mut Product| {
                product.add_review(review);
                Ok::<_, StorageError>(())
            })
            .await
    }

    /// Write the default catalog if the store is empty.
    ///
    /// Returns `true` if the catalog was seeded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    #[instrument(skip(self))]
    pub async fn seed_if_empty(&self) -> Result<bool, StorageError> {
        if self.store.count::<Product>().await? > 0 {
            return Ok(false);
        }
        let catalog = default_catalog();
        self.store.put_each(&catalog).await?;
        info!(count = catalog.len(), "seeded default catalog");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let store = RecordStore::open_in_memory().await.expect("open");
        let repo = ProductRepository::new(&store);

        assert!(repo.seed_if_empty().await.expect("seed"));
        assert!(!repo.seed_if_empty().await.expect("seed again"));
        assert_eq!(repo.list().await.expect("list").len(), default_catalog().len());
    }

    #[tokio::test]
    async fn test_add_review_persists() {
        let store = RecordStore::open_in_memory().await.expect("open");
        let repo = ProductRepository::new(&store);
        repo.seed_if_empty().await.expect("seed");

        let date = NaiveDate::from_ymd_opt(2025, 3, 12).expect("date");
        let review =
            ProductReview::new("Minh Anh", 5, "Phô mai chảy tuyệt vời", date).expect("review");
        repo.add_review(&ProductId::new("1"), review).await.expect("add review");

        let product = repo.get(&ProductId::new("1")).await.expect("get").expect("exists");
        assert_eq!(product.reviews.len(), 1);
        assert_eq!(product.reviews[0].user_name, "Minh Anh");
    }

    #[tokio::test]
    async fn test_review_on_deleted_product() {
        let store = RecordStore::open_in_memory().await.expect("open");
        let repo = ProductRepository::new(&store);

        let date = NaiveDate::from_ymd_opt(2025, 3, 12).expect("date");
        let review = ProductReview::new("Minh Anh", 4, "Ngon", date).expect("review");
        let result = repo.add_review(&ProductId::new("9"), review).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }
}
