//! The customer's in-memory session: profile and cart.

use mian_bakery_core::cart::Cart;
use mian_bakery_core::{ProductId, UserProfile};
use mian_bakery_store::{RecordStore, SettingsRepository};

use crate::error::{Result, StorefrontError};

/// State of the customer using this device.
///
/// The profile is loaded from the store; the cart starts empty and is never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct CustomerSession {
    profile: Option<UserProfile>,
    cart: Cart,
}

impl CustomerSession {
    /// A session for `profile` with an empty cart.
    #[must_use]
    pub fn new(profile: Option<UserProfile>) -> Self {
        Self {
            profile,
            cart: Cart::new(),
        }
    }

    /// Start a session with the saved profile, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Storage` if the profile cannot be read.
    pub async fn load(store: &RecordStore) -> Result<Self> {
        let profile = SettingsRepository::new(store).profile().await?;
        Ok(Self::new(profile))
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// The profile, required for ordering and chat.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoProfile` if none has been set up.
    pub fn require_profile(&self) -> Result<&UserProfile> {
        self.profile.as_ref().ok_or(StorefrontError::NoProfile)
    }

    pub(crate) fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub(crate) fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Add `quantity` units of a product to the cart.
    pub fn add_to_cart(&mut self, product_id: &ProductId, quantity: u32) {
        self.cart.add(product_id, quantity);
    }

    /// Change a cart line by `delta`; reaching zero removes it.
    pub fn update_qty(&mut self, product_id: &ProductId, delta: i32) {
        self.cart.update_qty(product_id, delta);
    }
}
