//! Chat messages shared by the customer and the shop.
//!
//! All messages live in one flat store. A customer message is sent by the
//! customer's phone; an admin message names the customer it is addressed to in
//! `conversation_id`. Older admin messages carried the address as a
//! `"<phone>->"` prefix on the text instead; those are still understood.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, require};
use crate::types::{MessageId, Phone};

/// Sender ID used for every message written by the shop.
pub const ADMIN_SENDER_ID: &str = "admin";

/// Delimiter of the legacy `"<phone>->text"` routing prefix.
pub const ROUTING_DELIMITER: &str = "->";

/// Who wrote a message.
///
/// Stored as a plain string: `"admin"` or the customer's phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SenderId {
    Admin,
    Customer(String),
}

impl SenderId {
    /// The stored string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => ADMIN_SENDER_ID,
            Self::Customer(phone) => phone,
        }
    }
}

impl From<String> for SenderId {
    fn from(s: String) -> Self {
        if s == ADMIN_SENDER_ID {
            Self::Admin
        } else {
            Self::Customer(s)
        }
    }
}

impl From<SenderId> for String {
    fn from(sender: SenderId) -> Self {
        match sender {
            SenderId::Admin => ADMIN_SENDER_ID.to_string(),
            SenderId::Customer(phone) => phone,
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_id: SenderId,
    pub sender_name: String,
    pub text: String,
    /// Customer phone an admin message is addressed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Display time of day (`HH:MM`).
    pub time: String,
    /// Milliseconds since the epoch; the sort key.
    pub timestamp: i64,
    #[serde(default)]
    pub is_read: bool,
}

impl ChatMessage {
    /// A message written by the customer with `phone`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if `text` is blank.
    pub fn from_customer<Tz: TimeZone>(
        phone: &Phone,
        sender_name: &str,
        text: &str,
        at: &DateTime<Tz>,
    ) -> Result<Self, ValidationError>
    where
        Tz::Offset: std::fmt::Display,
    {
        Ok(Self {
            id: MessageId::generate(),
            sender_id: SenderId::Customer(phone.as_str().to_string()),
            sender_name: sender_name.trim().to_string(),
            text: require(text, "message")?,
            conversation_id: None,
            time: at.format("%H:%M").to_string(),
            timestamp: at.timestamp_millis(),
            is_read: false,
        })
    }

    /// A message written by the shop to the customer with phone `to`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if `text` is blank.
    pub fn from_admin<Tz: TimeZone>(
        to: &Phone,
        sender_name: &str,
        text: &str,
        at: &DateTime<Tz>,
    ) -> Result<Self, ValidationError>
    where
        Tz::Offset: std::fmt::Display,
    {
        Ok(Self {
            id: MessageId::generate(),
            sender_id: SenderId::Admin,
            sender_name: sender_name.trim().to_string(),
            text: require(text, "message")?,
            conversation_id: Some(to.as_str().to_string()),
            time: at.format("%H:%M").to_string(),
            timestamp: at.timestamp_millis(),
            is_read: false,
        })
    }

    /// Whether the shop wrote this message.
    #[must_use]
    pub const fn is_from_admin(&self) -> bool {
        matches!(self.sender_id, SenderId::Admin)
    }

    /// Phone of the customer this message belongs to, if it can be determined.
    ///
    /// Customer messages belong to their sender. Admin messages use
    /// `conversation_id`, falling back to a legacy routing prefix that parses as
    /// a phone number.
    #[must_use]
    pub fn conversation_phone(&self) -> Option<&str> {
        match &self.sender_id {
            SenderId::Customer(phone) => Some(phone),
            SenderId::Admin => self
                .conversation_id
                .as_deref()
                .or_else(|| self.legacy_route().map(|(phone, _)| phone)),
        }
    }

    /// Text to show, without any legacy routing prefix.
    #[must_use]
    pub fn display_text(&self) -> &str {
        if self.is_from_admin() && self.conversation_id.is_none() {
            if let Some((_, body)) = self.legacy_route() {
                return body;
            }
        }
        &self.text
    }

    /// Key the admin inbox groups this message under: the conversation phone,
    /// or the raw sender ID when an admin message has no resolvable recipient.
    #[must_use]
    pub fn inbox_key(&self) -> &str {
        self.conversation_phone()
            .unwrap_or_else(|| self.sender_id.as_str())
    }

    fn legacy_route(&self) -> Option<(&str, &str)> {
        let (phone, body) = self.text.split_once(ROUTING_DELIMITER)?;
        Phone::parse(phone)
            .is_ok_and(|parsed| parsed.as_str() == phone)
            .then_some((phone, body))
    }
}
