//! Row models for the `chats`, `users` and `messages` tables.

mod chat_record;
mod message_record;
mod store_stats;
mod user_record;

pub use chat_record::{ChatRecord, ChatType, ParseChatTypeError};
pub use message_record::{MessageRecord, NewMessage};
pub use store_stats::StoreStats;
pub use user_record::UserRecord;
