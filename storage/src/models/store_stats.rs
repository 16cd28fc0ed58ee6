//! Row counts per table. Returned by `DigestStore::stats`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub chats: i64,
    pub users: i64,
    pub messages: i64,
}
