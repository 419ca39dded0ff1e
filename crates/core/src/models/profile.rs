//! The customer profile kept on this device.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, require};
use crate::types::Phone;

/// Which saved address to deliver to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    #[default]
    Fixed,
    Temp,
}

/// The single customer identity on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    /// Identity key.
    pub phone: Phone,
    /// Home address.
    #[serde(default)]
    pub fixed_address: String,
    /// Temporary address (office, relative's house, ...).
    #[serde(default)]
    pub temp_address: String,
    #[serde(default)]
    pub selected_address: AddressKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// A new profile with no saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name and `InvalidPhone` if the phone
    /// number does not parse.
    pub fn new(name: &str, phone: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require(name, "name")?,
            age: None,
            phone: Phone::parse(phone)?,
            fixed_address: String::new(),
            temp_address: String::new(),
            selected_address: AddressKind::Fixed,
            avatar: None,
        })
    }

    /// The address of the selected kind.
    #[must_use]
    pub fn address(&self, kind: AddressKind) -> &str {
        match kind {
            AddressKind::Fixed => &self.fixed_address,
            AddressKind::Temp => &self.temp_address,
        }
    }

    /// The address pre-filled at checkout.
    #[must_use]
    pub fn delivery_address(&self) -> &str {
        self.address(self.selected_address)
    }

    /// Check the profile before saving.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        Ok(())
    }
}
