//! Schema for the digest store.
//!
//! Every statement is `IF NOT EXISTS` so the whole list can run on each start.
//! References from `messages` to `chats`/`users` are deliberately not declared
//! as foreign keys: the platform is the source of truth and a message may
//! arrive before its chat or author row.

pub(crate) const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS chats (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        type TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        username TEXT,
        display_name TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        chat_id INTEGER NOT NULL,
        message_id INTEGER NOT NULL,
        author_id INTEGER,
        text TEXT NOT NULL DEFAULT '',
        timestamp INTEGER NOT NULL,
        reply_to_message_id INTEGER
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_messages_chat_message ON messages(chat_id, message_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_chat_time ON messages(chat_id, timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_messages_author_id ON messages(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_reply_to ON messages(reply_to_message_id)",
];
