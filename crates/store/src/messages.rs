//! Chat message persistence.

use tracing::{debug, instrument};

use mian_bakery_core::ChatMessage;
use mian_bakery_core::chat::{self, Reader};

use crate::{RecordStore, StorageError};

/// Repository for the `messages` store.
pub struct MessageRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Every message, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<ChatMessage>, StorageError> {
        self.store.get_all().await
    }

    /// Store a newly sent message.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    pub async fn send(&self, message: &ChatMessage) -> Result<(), StorageError> {
        self.store.insert(message).await
    }

    /// Messages of the thread with `phone`, oldest first, with any routing
    /// prefix stripped from the text.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn thread(&self, phone: &str) -> Result<Vec<ChatMessage>, StorageError> {
        let messages = self.list().await?;
        Ok(chat::thread_for(&messages, phone)
            .into_iter()
            .map(|d| ChatMessage {
                text: d.text.to_string(),
                ..d.message.clone()
            })
            .collect())
    }

    /// Mark everything `reader` has not read in the thread with `phone` as
    /// read, writing each changed message back individually.
    ///
    /// Returns how many messages changed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    #[instrument(skip(self, reader))]
    pub async fn mark_thread_read(
        &self,
        reader: Reader<'_>,
        phone: &str,
    ) -> Result<usize, StorageError> {
        let _guard = self.store.lock_writes().await;

        let messages = self.list().await?;
        let updates = chat::mark_thread_read(&messages, reader, phone);
        for message in &updates {
            let json = serde_json::to_string(message)?;
            self.store
                .put_json_locked(crate::ObjectStore::Messages, message.id.as_str(), &json)
                .await?;
        }
        debug!(count = updates.len(), "marked messages read");
        Ok(updates.len())
    }

    /// Unread messages waiting for `reader`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn unread_count(&self, reader: Reader<'_>) -> Result<usize, StorageError> {
        let messages = self.list().await?;
        Ok(chat::unread_count_for_role(&messages, reader))
    }
}
