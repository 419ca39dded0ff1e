//! Application state shared by the customer services.

use std::sync::Arc;

use tracing::instrument;

use mian_bakery_store::{ProductRepository, RecordStore, StorageError};

use crate::config::StorefrontConfig;

/// Shared resources for the customer role.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: RecordStore,
}

impl AppState {
    /// Create a new application state from an open store.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: RecordStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Open the configured database and seed the catalog on first run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the database cannot be opened or seeded.
    #[instrument(skip_all)]
    pub async fn connect(config: StorefrontConfig) -> Result<Self, StorageError> {
        let store = RecordStore::open(&config.database_url).await?;
        ProductRepository::new(&store).seed_if_empty().await?;
        Ok(Self::new(config, store))
    }

    /// Get the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.inner.store
    }
}
