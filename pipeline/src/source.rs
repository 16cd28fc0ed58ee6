//! Collaborators the drivers talk to: where messages come from, how a window
//! is summarized and where the digest goes.

use async_trait::async_trait;
use storage::{ChatRecord, MessageRecord, NewMessage, UserRecord};

/// Messages fetched for one chat plus the users who wrote them.
#[derive(Debug, Clone, Default)]
pub struct FetchedBatch {
    pub users: Vec<UserRecord>,
    pub messages: Vec<NewMessage>,
}

#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Chats the account currently belongs to.
    async fn list_chats(&self) -> anyhow::Result<Vec<ChatRecord>>;

    /// Messages of `chat_id` with `timestamp >= since_timestamp`.
    ///
    /// The boundary second is inclusive: messages sharing the stored high-water
    /// second come back again and are dropped by message dedup.
    async fn fetch_since(&self, chat_id: i64, since_timestamp: i64)
        -> anyhow::Result<FetchedBatch>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarizes `messages`, given in ascending timestamp order.
    async fn summarize(&self, chat: &ChatRecord, messages: &[MessageRecord])
        -> anyhow::Result<String>;
}

#[async_trait]
pub trait DigestSender: Send + Sync {
    async fn send_digest(&self, chat_id: i64, digest: &str) -> anyhow::Result<()>;
}
