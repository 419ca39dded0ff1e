//! Shop-wide settings managed by the admin.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, require};
use crate::types::{Phone, ProductId, ReportFrequency};

/// Minimum length of a new admin password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Settings persisted in the `settings` store.
///
/// The admin password is a plain string compared in memory; it keeps the
/// customer out of the admin screens on a shared device and nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    /// Number customers call or text.
    pub bakery_phone: String,
    pub admin_email: String,
    #[serde(default)]
    pub auto_report_frequency: ReportFrequency,
    pub admin_password: String,
    /// Products currently collecting orders toward a batch, in display order.
    #[serde(default)]
    pub batch_product_ids: Vec<ProductId>,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            bakery_phone: "0866442283".to_string(),
            admin_email: "lamson.nguyen77@gmail.com".to_string(),
            auto_report_frequency: ReportFrequency::Monthly,
            admin_password: "Pa$$w0rd".to_string(),
            batch_product_ids: vec![ProductId::new("1")],
        }
    }
}

impl ShopSettings {
    /// Whether `candidate` is the admin password.
    #[must_use]
    pub fn check_password(&self, candidate: &str) -> bool {
        self.admin_password == candidate
    }

    /// Replace the admin password.
    ///
    /// # Errors
    ///
    /// - `WrongPassword` if `current` does not match
    /// - `PasswordTooShort` if `new` is shorter than [`MIN_PASSWORD_LENGTH`]
    /// - `PasswordMismatch` if `confirm` differs from `new`
    pub fn change_password(
        &mut self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), ValidationError> {
        if !self.check_password(current) {
            return Err(ValidationError::WrongPassword);
        }
        if new.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        if new != confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        self.admin_password = new.to_string();
        Ok(())
    }

    /// Add `id` to the batch list, or remove it if present.
    ///
    /// Returns `true` if the product is batched afterwards.
    pub fn toggle_batch_product(&mut self, id: &ProductId) -> bool {
        if let Some(pos) = self.batch_product_ids.iter().position(|p| p == id) {
            self.batch_product_ids.remove(pos);
            false
        } else {
            self.batch_product_ids.push(id.clone());
            true
        }
    }

    /// Whether `id` is collecting orders toward a batch.
    #[must_use]
    pub fn is_batched(&self, id: &ProductId) -> bool {
        self.batch_product_ids.contains(id)
    }

    /// Check contact details before saving.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhone` for a bad bakery phone and `InvalidEmail` if the
    /// admin email has no `@`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Phone::parse(&self.bakery_phone)?;
        let email = require(&self.admin_email, "admin email")?;
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ValidationError::InvalidEmail(email)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_rules() {
        let mut settings = ShopSettings::default();

        assert_eq!(
            settings.change_password("wrong", "newpass", "newpass"),
            Err(ValidationError::WrongPassword)
        );
        assert_eq!(
            settings.change_password("Pa$$w0rd", "abc", "abc"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            settings.change_password("Pa$$w0rd", "newpass", "newpas"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(settings.check_password("Pa$$w0rd"));

        settings
            .change_password("Pa$$w0rd", "banhmi2025", "banhmi2025")
            .expect("changed");
        assert!(settings.check_password("banhmi2025"));
        assert!(!settings.check_password("Pa$$w0rd"));
    }

    #[test]
    fn test_toggle_batch_product() {
        let mut settings = ShopSettings::default();
        let id = ProductId::new("2");

        assert!(settings.toggle_batch_product(&id));
        assert!(settings.is_batched(&id));
        assert_eq!(settings.batch_product_ids.len(), 2);

        assert!(!settings.toggle_batch_product(&id));
        assert!(!settings.is_batched(&id));
    }

    #[test]
    fn test_validate_contact_details() {
        let mut settings = ShopSettings::default();
        assert!(settings.validate().is_ok());

        settings.admin_email = "no-at".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidEmail(_))
        ));

        settings.admin_email = "a@b.c".to_string();
        settings.bakery_phone = "12".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidPhone(_))
        ));
    }
}
