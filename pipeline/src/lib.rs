//! # pipeline
//!
//! Drives the digest store from the outside: the ingestion cycle pulls new
//! messages from a [`MessageSource`] past each chat's high-water mark, the digest
//! cycle reads the window since the last digest and hands it to a
//! [`Summarizer`] and [`DigestSender`]. [`CycleScheduler`] runs either cycle on
//! an interval and keeps going when a run fails. [`TranscriptSummarizer`] and
//! [`WriterSender`] are the built-in collaborators the CLI runs digests with.

pub mod digest;
pub mod error;
pub mod ingest;
pub mod json_source;
pub mod scheduler;
pub mod source;
pub mod transcript;

#[cfg(test)]
mod test;

pub use digest::{DigestDriver, DigestReport};
pub use error::{PipelineError, Result};
pub use ingest::{IngestReport, IngestionDriver};
pub use json_source::{DumpChat, DumpMessage, ExportDump, JsonDumpSource};
pub use scheduler::{Cycle, CycleScheduler, SchedulerReport};
pub use source::{DigestSender, FetchedBatch, MessageSource, Summarizer};
pub use transcript::{TranscriptSummarizer, WriterSender};
