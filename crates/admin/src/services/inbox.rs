//! The shop's inbox: every customer conversation in one place.

use chrono::Local;
use tracing::{info, instrument};

use mian_bakery_core::chat::{Reader, conversation_index};
use mian_bakery_core::{ChatMessage, Phone, ValidationError};
use mian_bakery_store::{MessageRepository, RecordStore};

use crate::error::Result;

/// Name shown on the shop's replies.
pub const SHOP_SENDER_NAME: &str = "Bếp Mian";

/// One row of the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Customer phone, or the raw sender ID for messages that name no phone.
    pub key: String,
    /// Name from the customer's latest message, if any.
    pub customer_name: Option<String>,
    pub last_text: String,
    pub last_time: String,
    pub unread_count: usize,
}

/// Inbox service.
pub struct InboxService<'a> {
    store: &'a RecordStore,
}

impl<'a> InboxService<'a> {
    /// Create a new inbox service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Conversations, most recent activity first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        let messages = MessageRepository::new(self.store).list().await?;
        Ok(conversation_index(&messages)
            .into_iter()
            .map(|summary| Conversation {
                key: summary.key.to_string(),
                customer_name: messages
                    .iter()
                    .filter(|m| !m.is_from_admin() && m.inbox_key() == summary.key)
                    .max_by_key(|m| m.timestamp)
                    .map(|m| m.sender_name.clone()),
                last_text: summary.last_message.display_text().to_string(),
                last_time: summary.last_message.time.clone(),
                unread_count: summary.unread_count,
            })
            .collect())
    }

    /// Open a conversation: mark the customer's messages read and return the
    /// thread, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store fails.
    #[instrument(skip(self))]
    pub async fn open(&self, phone: &str) -> Result<Vec<ChatMessage>> {
        let repo = MessageRepository::new(self.store);
        repo.mark_thread_read(Reader::Admin, phone).await?;
        Ok(repo.thread(phone).await?)
    }

    /// Reply to the customer with `phone`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for an invalid phone or blank text.
    #[instrument(skip(self, text))]
    pub async fn reply(&self, phone: &str, text: &str) -> Result<ChatMessage> {
        let to = Phone::parse(phone).map_err(ValidationError::from)?;
        let message = ChatMessage::from_admin(&to, SHOP_SENDER_NAME, text, &Local::now())?;
        MessageRepository::new(self.store).send(&message).await?;
        info!("reply sent");
        Ok(message)
    }

    /// Unread customer messages across all conversations.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    pub async fn unread_count(&self) -> Result<usize> {
        Ok(MessageRepository::new(self.store)
            .unread_count(Reader::Admin)
            .await?)
    }
}
