//! Digest store: SQLite persistence for chats, users and messages.
//!
//! Uses SqlitePoolManager and the models (ChatRecord, UserRecord, MessageRecord).
//! External: SQLite via sqlx; the ingestion driver writes through the upsert/save
//! paths, the digest driver reads through `get_messages_after`.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::{Result, StorageError};
use crate::models::{ChatRecord, MessageRecord, NewMessage, StoreStats, UserRecord};
use crate::repository::DigestRepository;
use crate::schema::SCHEMA_STATEMENTS;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct DigestStore {
    pool_manager: SqlitePoolManager,
}

impl DigestStore {
    /// Opens (creating if missing) the database file without touching the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let pool_manager = SqlitePoolManager::new(path)
            .await
            .map_err(|e| StorageError::unavailable("open database", e))?;
        Ok(Self { pool_manager })
    }

    /// Opens the database and makes sure the schema exists.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::open(path).await?;
        store.initialize().await?;
        Ok(store)
    }

    pub fn is_closed(&self) -> bool {
        self.pool_manager.is_closed()
    }

    pub async fn get_chat(&self, chat_id: i64) -> Result<Option<ChatRecord>> {
        sqlx::query_as::<_, ChatRecord>("SELECT id, title, type FROM chats WHERE id = ?")
            .bind(chat_id)
            .fetch_optional(self.pool_manager.pool())
            .await
            .map_err(|e| StorageError::read("get chat", e))
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, display_name FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(|e| StorageError::read("get user", e))
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        let pool = self.pool_manager.pool();

        let chats: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chats")
            .fetch_one(pool)
            .await
            .map_err(|e| StorageError::read("count chats", e))?;

        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .map_err(|e| StorageError::read("count users", e))?;

        let messages: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(pool)
            .await
            .map_err(|e| StorageError::read("count messages", e))?;

        Ok(StoreStats {
            chats: chats.0,
            users: users.0,
            messages: messages.0,
        })
    }
}

#[async_trait]
impl DigestRepository for DigestStore {
    async fn initialize(&self) -> Result<()> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(*statement)
                .execute(pool)
                .await
                .map_err(|e| StorageError::unavailable("create schema", e))?;
        }

        info!("Database schema ready");
        Ok(())
    }

    #[instrument(skip(self, chat), fields(chat_id = chat.id))]
    async fn upsert_chat(&self, chat: &ChatRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chats (id, title, type)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                type = excluded.type
            "#,
        )
        .bind(chat.id)
        .bind(&chat.title)
        .bind(chat.chat_type.as_str())
        .execute(self.pool_manager.pool())
        .await
        .map_err(|e| StorageError::write("upsert chat", e))?;

        debug!(title = %chat.title, chat_type = %chat.chat_type, "Upserted chat");
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, display_name)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                display_name = excluded.display_name
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.display_name)
        .execute(self.pool_manager.pool())
        .await
        .map_err(|e| StorageError::write("upsert user", e))?;

        debug!(
            username = ?user.username,
            display_name = ?user.display_name,
            "Upserted user"
        );
        Ok(())
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat_id, message_id = message.message_id))]
    async fn save_message(&self, message: &NewMessage) -> Result<bool> {
        // First write wins: a re-fetched copy never overwrites the stored content.
        let result = sqlx::query(
            r#"
            INSERT INTO messages (chat_id, message_id, author_id, text, timestamp, reply_to_message_id)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(chat_id, message_id) DO NOTHING
            "#,
        )
        .bind(message.chat_id)
        .bind(message.message_id)
        .bind(message.author_id)
        .bind(&message.text)
        .bind(message.timestamp)
        .bind(message.reply_to_message_id)
        .execute(self.pool_manager.pool())
        .await
        .map_err(|e| StorageError::write("save message", e))?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            debug!(timestamp = message.timestamp, "Saved message");
        } else {
            debug!("Message already stored, skipped");
        }
        Ok(inserted)
    }

    async fn get_last_message_timestamp(&self, chat_id: i64) -> Result<i64> {
        // Served by idx_messages_chat_time: one index seek, not a scan.
        let last: Option<(i64,)> = sqlx::query_as(
            "SELECT timestamp FROM messages WHERE chat_id = ? ORDER BY timestamp DESC LIMIT 1",
        )
        .bind(chat_id)
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(|e| StorageError::read("get last message timestamp", e))?;

        Ok(last.map(|row| row.0).unwrap_or(0))
    }

    async fn get_messages_after(
        &self,
        chat_id: i64,
        after_timestamp: i64,
    ) -> Result<Vec<MessageRecord>> {
        let messages = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, chat_id, message_id, author_id, text, timestamp, reply_to_message_id
            FROM messages
            WHERE chat_id = ? AND timestamp > ?
            ORDER BY timestamp ASC, message_id ASC
            "#,
        )
        .bind(chat_id)
        .bind(after_timestamp)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(|e| StorageError::read("get messages after", e))?;

        debug!(
            chat_id,
            after_timestamp,
            count = messages.len(),
            "Retrieved messages after timestamp"
        );
        Ok(messages)
    }

    async fn list_chats(&self) -> Result<Vec<ChatRecord>> {
        sqlx::query_as::<_, ChatRecord>("SELECT id, title, type FROM chats ORDER BY id ASC")
            .fetch_all(self.pool_manager.pool())
            .await
            .map_err(|e| StorageError::read("list chats", e))
    }

    async fn close(&self) {
        self.pool_manager.close().await;
    }
}
