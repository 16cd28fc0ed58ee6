//! Storage error types.
//!
//! Duplicate keys are never reported here: repeated chat/user upserts and
//! re-ingested messages are absorbed by the write paths themselves.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The database file could not be opened, created or initialized.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    /// A write failed for a reason other than the dedup key.
    #[error("Storage write failed: {0}")]
    WriteFailed(String),
    #[error("Storage read failed: {0}")]
    ReadFailed(String),
}

impl StorageError {
    pub(crate) fn unavailable(context: &str, err: sqlx::Error) -> Self {
        Self::Unavailable(format!("{}: {}", context, err))
    }

    pub(crate) fn write(context: &str, err: sqlx::Error) -> Self {
        Self::WriteFailed(format!("{}: {}", context, err))
    }

    pub(crate) fn read(context: &str, err: sqlx::Error) -> Self {
        Self::ReadFailed(format!("{}: {}", context, err))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
