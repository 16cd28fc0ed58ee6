//! Unit tests for the drivers and the scheduler.
//!
//! Storage is a real `DigestStore` on a temp file; collaborators are the
//! recording fakes in [`fakes`].

mod ingest_test;
mod json_source_test;
mod scheduler_test;
