//! Settings persistence.
//!
//! The `settings` store holds named JSON documents: the shop settings under
//! [`SHOP_SETTINGS_KEY`] and the customer profile under [`PROFILE_KEY`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

use mian_bakery_core::{ShopSettings, UserProfile};

use crate::{ObjectStore, RecordStore, StorageError};

/// Key of the shop settings document.
pub const SHOP_SETTINGS_KEY: &str = "shop";

/// Key of the customer profile document.
pub const PROFILE_KEY: &str = "profile";

/// Repository for the `settings` store.
pub struct SettingsRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Get a setting value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the value is not JSON.
    pub async fn get_setting(&self, key: &str) -> Result<Option<JsonValue>, StorageError> {
        self.get_typed(key).await
    }

    /// The shop settings, or the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the document is corrupt.
    #[instrument(skip(self))]
    pub async fn shop_settings(&self) -> Result<ShopSettings, StorageError> {
        let settings = self.get_typed(SHOP_SETTINGS_KEY).await?;
        if settings.is_none() {
            debug!("no shop settings stored, using defaults");
        }
        Ok(settings.unwrap_or_default())
    }

    /// Save the shop settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip_all)]
    pub async fn save_shop_settings(&self, settings: &ShopSettings) -> Result<(), StorageError> {
        self.set_typed(SHOP_SETTINGS_KEY, settings).await
    }

    /// Load the shop settings, apply `change`, and save them, under the write
    /// lock. Nothing is saved if `change` fails.
    ///
    /// # Errors
    ///
    /// Returns a storage error, or the error returned by `change`.
    pub async fn update_shop_settings<T, F, E>(&self, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut ShopSettings) -> Result<T, E> + Send,
        E: From<StorageError>,
    {
        let _guard = self.store.lock_writes().await;

        let mut settings = self
            .get_typed::<ShopSettings>(SHOP_SETTINGS_KEY)
            .await?
            .unwrap_or_default();
        let out = change(&mut settings)?;
        let json = serde_json::to_string(&settings).map_err(StorageError::from)?;
        self.store
            .put_json_locked(ObjectStore::Settings, SHOP_SETTINGS_KEY, &json)
            .await?;
        Ok(out)
    }

    /// The saved customer profile, if one was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the document is corrupt.
    pub async fn profile(&self) -> Result<Option<UserProfile>, StorageError> {
        self.get_typed(PROFILE_KEY).await
    }

    /// Save the customer profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    #[instrument(skip_all)]
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.set_typed(PROFILE_KEY, profile).await
    }

    async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(json) = self.store.get_json(ObjectStore::Settings, key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::DataCorruption(format!("setting {key}: {e}")))
    }

    async fn set_typed<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.store.put_json(ObjectStore::Settings, key, &json).await
    }
}
