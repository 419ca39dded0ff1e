//! Admin login, password and shop settings.

use tracing::{info, instrument, warn};

use mian_bakery_core::{ReportFrequency, ShopSettings};
use mian_bakery_store::{RecordStore, SettingsRepository};

use crate::error::{AdminError, Result};

/// The editable part of the shop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopDetails {
    pub bakery_phone: String,
    pub admin_email: String,
    pub auto_report_frequency: ReportFrequency,
}

/// Settings service.
pub struct SettingsService<'a> {
    store: &'a RecordStore,
}

impl<'a> SettingsService<'a> {
    /// Create a new settings service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Check the admin password.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` if the password is wrong.
    #[instrument(skip_all)]
    pub async fn login(&self, password: &str) -> Result<()> {
        let settings = SettingsRepository::new(self.store).shop_settings().await?;
        if settings.check_password(password) {
            info!("admin logged in");
            Ok(())
        } else {
            warn!("admin login rejected");
            Err(AdminError::Unauthorized("wrong password".to_string()))
        }
    }

    /// Change the admin password.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the current password is wrong, the
    /// new one is too short, or the confirmation does not match. Nothing is
    /// saved in that case.
    #[instrument(skip_all)]
    pub async fn change_password(&self, current: &str, new: &str, confirm: &str) -> Result<()> {
        SettingsRepository::new(self.store)
            .update_shop_settings(|settings| {
                settings
                    .change_password(current, new, confirm)
                    .map_err(AdminError::from)
            })
            .await?;
        info!("admin password changed");
        Ok(())
    }

    /// Current settings, or the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    pub async fn shop_settings(&self) -> Result<ShopSettings> {
        Ok(SettingsRepository::new(self.store).shop_settings().await?)
    }

    /// Save the shop's contact details and report frequency.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for an invalid phone or email.
    #[instrument(skip(self))]
    pub async fn save_details(&self, details: ShopDetails) -> Result<ShopSettings> {
        let settings = SettingsRepository::new(self.store)
            .update_shop_settings(|settings| {
                let mut updated = settings.clone();
                updated.bakery_phone = details.bakery_phone.trim().to_string();
                updated.admin_email = details.admin_email.trim().to_string();
                updated.auto_report_frequency = details.auto_report_frequency;
                updated.validate()?;
                *settings = updated;
                Ok::<_, AdminError>(settings.clone())
            })
            .await?;
        info!("shop settings saved");
        Ok(settings)
    }
}
