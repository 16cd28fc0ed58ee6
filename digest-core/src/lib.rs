//! # digest-core
//!
//! Ambient pieces shared by the digest service crates: [`BaseConfig`] loaded from
//! the environment, the [`DigestError`] type and tracing initialization.

pub mod config;
pub mod error;
pub mod logger;


pub use config::BaseConfig;
pub use error::{DigestError, Result};
pub use logger::init_tracing;
