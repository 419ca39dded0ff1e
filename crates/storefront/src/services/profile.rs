//! Customer profile editing.

use tracing::{info, instrument};

use mian_bakery_core::UserProfile;
use mian_bakery_store::{RecordStore, SettingsRepository};

use crate::error::Result;
use crate::session::CustomerSession;

/// Profile service.
pub struct ProfileService<'a> {
    store: &'a RecordStore,
}

impl<'a> ProfileService<'a> {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Validate and save `profile`, then make it the session's profile.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` for a blank name and
    /// `StorefrontError::Storage` if the save fails. The session keeps its old
    /// profile on error.
    #[instrument(skip_all)]
    pub async fn save(&self, session: &mut CustomerSession, profile: UserProfile) -> Result<()> {
        profile.validate()?;
        SettingsRepository::new(self.store).save_profile(&profile).await?;
        info!("profile saved");
        session.set_profile(profile);
        Ok(())
    }
}
