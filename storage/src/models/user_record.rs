//! User record model: a message author. Maps to the `users` table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserRecord {
    pub fn new(id: i64, username: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            username,
            display_name,
        }
    }
}
