//! Storage interface consumed by the ingestion and digest drivers.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChatRecord, MessageRecord, NewMessage, UserRecord};

/// Persistence contract for chats, users and messages.
///
/// Chats and users are last-write-wins; messages are first-write-wins on
/// `(chat_id, message_id)`. Implementations never retry.
#[async_trait]
pub trait DigestRepository: Send + Sync {
    /// Creates tables and indexes if absent. Safe to call on every start.
    async fn initialize(&self) -> Result<()>;

    async fn upsert_chat(&self, chat: &ChatRecord) -> Result<()>;

    async fn upsert_user(&self, user: &UserRecord) -> Result<()>;

    /// Returns `true` when a row was inserted, `false` when the message was already stored.
    async fn save_message(&self, message: &NewMessage) -> Result<bool>;

    /// Highest stored timestamp for the chat, or `0` when it has no messages.
    async fn get_last_message_timestamp(&self, chat_id: i64) -> Result<i64>;

    /// Messages with `timestamp > after_timestamp`, ascending by timestamp.
    async fn get_messages_after(
        &self,
        chat_id: i64,
        after_timestamp: i64,
    ) -> Result<Vec<MessageRecord>>;

    async fn list_chats(&self) -> Result<Vec<ChatRecord>>;

    async fn close(&self);
}
