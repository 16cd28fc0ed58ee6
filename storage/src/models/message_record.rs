//! Message models for persistence.
//!
//! [`NewMessage`] is what ingestion hands to the store; [`MessageRecord`] is the
//! stored row read back, carrying the engine-assigned surrogate `id`.

use serde::{Deserialize, Serialize};

/// A message observed on the source platform, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub chat_id: i64,
    /// Platform message id, unique within `chat_id`.
    pub message_id: i64,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub text: String,
    /// Unix epoch seconds.
    pub timestamp: i64,
    /// Platform id of the replied-to message; the target may not be stored yet.
    #[serde(default)]
    pub reply_to_message_id: Option<i64>,
}

impl NewMessage {
    pub fn new(chat_id: i64, message_id: i64, text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            chat_id,
            message_id,
            author_id: None,
            text: text.into(),
            timestamp,
            reply_to_message_id: None,
        }
    }

    pub fn with_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn replying_to(mut self, message_id: i64) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    /// Engine-assigned, increasing; not meaningful outside the store.
    pub id: i64,
    pub chat_id: i64,
    pub message_id: i64,
    pub author_id: Option<i64>,
    pub text: String,
    pub timestamp: i64,
    pub reply_to_message_id: Option<i64>,
}
