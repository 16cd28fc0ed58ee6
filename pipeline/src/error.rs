//! Errors that abort a single ingestion or digest cycle.

use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Summarizer error: {0}")]
    Summarizer(String),

    #[error("Delivery error: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
