//! Conversation structure over the flat message store.
//!
//! Messages for every customer and the shop share one collection. These
//! functions group them into per-phone threads and do the read/unread
//! accounting for each role.

use serde::Serialize;

use crate::models::{ChatMessage, SenderId};

/// Who is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reader<'a> {
    Admin,
    /// The customer with this phone.
    Customer(&'a str),
}

/// A message ready to show: routing prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMessage<'a> {
    pub message: &'a ChatMessage,
    pub text: &'a str,
    pub from_admin: bool,
}

/// One row of the admin inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary<'a> {
    /// Customer phone, or the raw sender ID for unroutable admin messages.
    pub key: &'a str,
    pub last_message: &'a ChatMessage,
    /// Unread messages from the customer.
    pub unread_count: usize,
}

/// The thread between the shop and `phone`, oldest first.
#[must_use]
pub fn thread_for<'a>(messages: &'a [ChatMessage], phone: &str) -> Vec<DisplayMessage<'a>> {
    let mut thread: Vec<&ChatMessage> = messages
        .iter()
        .filter(|m| m.conversation_phone() == Some(phone))
        .collect();
    thread.sort_by_key(|m| m.timestamp);
    thread
        .into_iter()
        .map(|message| DisplayMessage {
            message,
            text: message.display_text(),
            from_admin: message.is_from_admin(),
        })
        .collect()
}

/// The admin inbox: one entry per conversation, most recent first.
///
/// Admin messages whose recipient cannot be determined are grouped under their
/// raw sender ID so they stay visible.
#[must_use]
pub fn conversation_index(messages: &[ChatMessage]) -> Vec<ConversationSummary<'_>> {
    let mut index: Vec<ConversationSummary<'_>> = Vec::new();
    for message in messages {
        let key = message.inbox_key();
        let unread = usize::from(!message.is_from_admin() && !message.is_read);
        if let Some(entry) = index.iter_mut().find(|e| e.key == key) {
            entry.unread_count += unread;
            if message.timestamp > entry.last_message.timestamp {
                entry.last_message = message;
            }
        } else {
            index.push(ConversationSummary {
                key,
                last_message: message,
                unread_count: unread,
            });
        }
    }
    index.sort_by(|a, b| b.last_message.timestamp.cmp(&a.last_message.timestamp));
    index
}

/// Whether `reader` has yet to read `message`.
fn is_unread_by(message: &ChatMessage, reader: Reader<'_>) -> bool {
    if message.is_read {
        return false;
    }
    match reader {
        Reader::Admin => matches!(message.sender_id, SenderId::Customer(_)),
        Reader::Customer(phone) => {
            message.is_from_admin() && message.conversation_phone() == Some(phone)
        }
    }
}

/// Messages waiting for `reader`.
///
/// The shop counts unread customer messages across every phone; a customer
/// counts unread shop messages addressed to them.
#[must_use]
pub fn unread_count_for_role(messages: &[ChatMessage], reader: Reader<'_>) -> usize {
    messages.iter().filter(|m| is_unread_by(m, reader)).count()
}

/// Messages `reader` has not read in the thread with `phone`, as read copies.
///
/// Callers persist each returned record. Running this again after persisting
/// returns nothing.
#[must_use]
pub fn mark_thread_read(
    messages: &[ChatMessage],
    reader: Reader<'_>,
    phone: &str,
) -> Vec<ChatMessage> {
    messages
        .iter()
        .filter(|m| m.conversation_phone() == Some(phone) && is_unread_by(m, reader))
        .map(|m| ChatMessage {
            is_read: true,
            ..m.clone()
        })
        .collect()
}
