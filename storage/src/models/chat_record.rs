//! Chat record model: a Telegram group, supergroup or private conversation.
//!
//! Maps to the `chats` table. Re-observing a chat replaces its title and type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// Kind of chat as reported by the source platform. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Group,
    Supergroup,
    Private,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Group => "group",
            ChatType::Supergroup => "supergroup",
            ChatType::Private => "private",
        }
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChatTypeError(pub String);

impl fmt::Display for ParseChatTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown chat type: {}", self.0)
    }
}

impl std::error::Error for ParseChatTypeError {}

impl FromStr for ChatType {
    type Err = ParseChatTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(ChatType::Group),
            "supergroup" => Ok(ChatType::Supergroup),
            "private" => Ok(ChatType::Private),
            other => Err(ParseChatTypeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Source-platform chat id.
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
}

impl ChatRecord {
    pub fn new(id: i64, title: impl Into<String>, chat_type: ChatType) -> Self {
        Self {
            id,
            title: title.into(),
            chat_type,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for ChatRecord {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let chat_type: String = row.try_get("type")?;
        let chat_type = chat_type
            .parse::<ChatType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self {
            id,
            title,
            chat_type,
        })
    }
}
