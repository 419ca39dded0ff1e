//! Application state shared by the admin services.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use mian_bakery_store::settings::SHOP_SETTINGS_KEY;
use mian_bakery_store::{ProductRepository, RecordStore, SettingsRepository, StorageError};

use crate::claude::{Assistant, ClaudeError};
use crate::config::AdminConfig;

/// Errors raised while starting the admin role.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Claude client error: {0}")]
    Claude(#[from] ClaudeError),
}

/// Shared resources for the admin role.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: RecordStore,
    assistant: Assistant,
}

impl AppState {
    /// Create a new application state from an open store.
    #[must_use]
    pub fn new(config: AdminConfig, store: RecordStore, assistant: Assistant) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                assistant,
            }),
        }
    }

    /// Open the configured database, seed the catalog and the shop settings
    /// on first run, and build the Claude client if a key is configured.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if the database cannot be opened or seeded, or
    /// the Claude client cannot be built.
    #[instrument(skip_all)]
    pub async fn connect(config: AdminConfig) -> Result<Self, StartupError> {
        let store = RecordStore::open(&config.database_url).await?;
        seed_first_run(&store, &config).await?;

        let assistant = Assistant::from_config(config.claude.as_ref())?;
        info!(ai_enabled = assistant.is_enabled(), "admin state ready");
        Ok(Self::new(config, store, assistant))
    }

    /// Get the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.inner.store
    }

    /// Get the text generator.
    #[must_use]
    pub fn assistant(&self) -> &Assistant {
        &self.inner.assistant
    }
}

/// Seed the default catalog and the configured settings into an empty store.
///
/// # Errors
///
/// Returns `StorageError` if the store cannot be read or written.
pub async fn seed_first_run(store: &RecordStore, config: &AdminConfig) -> Result<(), StorageError> {
    ProductRepository::new(store).seed_if_empty().await?;

    let settings = SettingsRepository::new(store);
    if settings.get_setting(SHOP_SETTINGS_KEY).await?.is_none() {
        settings.save_shop_settings(&config.initial_settings()).await?;
        info!("shop settings initialised");
    }
    Ok(())
}
