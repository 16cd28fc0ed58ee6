//! Storage crate: chat, user and message persistence for the digest pipeline.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – ChatRecord, UserRecord, NewMessage, MessageRecord, StoreStats
//! - [`repository`] – DigestRepository trait
//! - [`digest_store`] – DigestStore (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod digest_store;
mod error;
mod models;
mod repository;
mod schema;
mod sqlite_pool;


pub use digest_store::DigestStore;
pub use error::{Result, StorageError};
pub use models::{
    ChatRecord, ChatType, MessageRecord, NewMessage, ParseChatTypeError, StoreStats, UserRecord,
};
pub use repository::DigestRepository;
pub use sqlite_pool::SqlitePoolManager;
