//! Device handoff links for calling or texting a customer.
//!
//! The app never sends SMS or places calls itself; it builds `tel:` and
//! `sms:` URIs for the device's dialer and messaging apps.

use crate::types::Phone;

/// `tel:` link that opens the dialer.
#[must_use]
pub fn tel_uri(phone: &Phone) -> String {
    format!("tel:{phone}")
}

/// `sms:` link that opens the messaging app with `body` pre-filled.
///
/// The body is percent-encoded.
#[must_use]
pub fn sms_uri(phone: &Phone, body: &str) -> String {
    if body.is_empty() {
        return format!("sms:{phone}");
    }
    format!("sms:{phone}?body={}", urlencoding::encode(body))
}
