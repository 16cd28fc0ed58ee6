//! Message source backed by a JSON export file.
//!
//! Format:
//!
//! ```json
//! {
//!   "chats": [
//!     {
//!       "chat": { "id": 1, "title": "Rust", "type": "supergroup" },
//!       "users": [{ "id": 7, "username": "ferris", "display_name": "Ferris" }],
//!       "messages": [{ "message_id": 1, "author_id": 7, "text": "hi", "timestamp": 1700000000 }]
//!     }
//!   ]
//! }
//! ```
//!
//! The file is re-read on every `list_chats`, so a scheduled sync picks up a
//! refreshed export; `fetch_since` answers from that snapshot.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storage::{ChatRecord, NewMessage, UserRecord};
use tokio::sync::RwLock;
use tracing::debug;

use crate::source::{FetchedBatch, MessageSource};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportDump {
    #[serde(default)]
    pub chats: Vec<DumpChat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpChat {
    pub chat: ChatRecord,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub messages: Vec<DumpMessage>,
}

/// A message inside a [`DumpChat`]; its chat id comes from the enclosing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpMessage {
    pub message_id: i64,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub text: String,
    pub timestamp: i64,
    #[serde(default)]
    pub reply_to_message_id: Option<i64>,
}

impl DumpMessage {
    fn to_new_message(&self, chat_id: i64) -> NewMessage {
        NewMessage {
            chat_id,
            message_id: self.message_id,
            author_id: self.author_id,
            text: self.text.clone(),
            timestamp: self.timestamp,
            reply_to_message_id: self.reply_to_message_id,
        }
    }
}

impl ExportDump {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parse export dump")
    }
}

pub struct JsonDumpSource {
    path: Option<PathBuf>,
    snapshot: RwLock<ExportDump>,
}

impl JsonDumpSource {
    /// Source that reads `path` on every `list_chats`.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            snapshot: RwLock::new(ExportDump::default()),
        }
    }

    /// Source over a fixed, already parsed dump.
    pub fn from_dump(dump: ExportDump) -> Self {
        Self {
            path: None,
            snapshot: RwLock::new(dump),
        }
    }

    async fn reload(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read export dump {}", path.display()))?;
        let dump = ExportDump::from_json(&raw)?;
        debug!(path = %path.display(), chats = dump.chats.len(), "Loaded export dump");
        *self.snapshot.write().await = dump;
        Ok(())
    }
}

#[async_trait]
impl MessageSource for JsonDumpSource {
    async fn list_chats(&self) -> anyhow::Result<Vec<ChatRecord>> {
        self.reload().await?;
        let snapshot = self.snapshot.read().await;
        Ok(snapshot.chats.iter().map(|entry| entry.chat.clone()).collect())
    }

    async fn fetch_since(
        &self,
        chat_id: i64,
        since_timestamp: i64,
    ) -> anyhow::Result<FetchedBatch> {
        let snapshot = self.snapshot.read().await;
        let Some(entry) = snapshot.chats.iter().find(|entry| entry.chat.id == chat_id) else {
            return Ok(FetchedBatch::default());
        };

        let messages: Vec<NewMessage> = entry
            .messages
            .iter()
            .filter(|m| m.timestamp >= since_timestamp)
            .map(|m| m.to_new_message(chat_id))
            .collect();

        let users = entry
            .users
            .iter()
            .filter(|u| messages.iter().any(|m| m.author_id == Some(u.id)))
            .cloned()
            .collect();

        Ok(FetchedBatch { users, messages })
    }
}
