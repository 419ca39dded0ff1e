//! The customer's chat thread with the shop.

use chrono::Local;
use tracing::instrument;

use mian_bakery_core::ChatMessage;
use mian_bakery_core::chat::Reader;
use mian_bakery_store::{MessageRepository, RecordStore};

use crate::error::Result;
use crate::session::CustomerSession;

/// Customer chat service.
pub struct ChatService<'a> {
    store: &'a RecordStore,
}

impl<'a> ChatService<'a> {
    /// Create a new chat service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Open the thread: mark the shop's messages read and return the thread,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoProfile` without a profile and
    /// `StorefrontError::Storage` if the store fails.
    #[instrument(skip_all)]
    pub async fn open_thread(&self, session: &CustomerSession) -> Result<Vec<ChatMessage>> {
        let phone = session.require_profile()?.phone.as_str();
        let repo = MessageRepository::new(self.store);
        repo.mark_thread_read(Reader::Customer(phone), phone).await?;
        Ok(repo.thread(phone).await?)
    }

    /// The thread without changing read state.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoProfile` without a profile.
    pub async fn thread(&self, session: &CustomerSession) -> Result<Vec<ChatMessage>> {
        let phone = session.require_profile()?.phone.as_str();
        Ok(MessageRepository::new(self.store).thread(phone).await?)
    }

    /// Send a message to the shop.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` for a blank message.
    #[instrument(skip_all)]
    pub async fn send(&self, session: &CustomerSession, text: &str) -> Result<ChatMessage> {
        let profile = session.require_profile()?;
        let message =
            ChatMessage::from_customer(&profile.phone, &profile.name, text, &Local::now())?;
        MessageRepository::new(self.store).send(&message).await?;
        Ok(message)
    }

    /// Unread messages from the shop, for the chat badge.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoProfile` without a profile.
    pub async fn unread_count(&self, session: &CustomerSession) -> Result<usize> {
        let phone = session.require_profile()?.phone.as_str();
        Ok(MessageRepository::new(self.store)
            .unread_count(Reader::Customer(phone))
            .await?)
    }
}
