//! Base config: database path, log file and sync interval. Loaded from env.

use std::env;
use std::time::Duration;

use crate::error::{DigestError, Result};

const DEFAULT_LOG_FILE: &str = "logs/tg-digest.log";
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// SQLITE_PATH: the digest store file
    pub sqlite_path: String,
    /// LOG_FILE
    pub log_file: String,
    /// SYNC_INTERVAL_SECS: seconds between ingestion cycles
    pub sync_interval_secs: u64,
}

impl BaseConfig {
    /// Load from environment variables. `sqlite_path` overrides SQLITE_PATH if provided.
    pub fn load(sqlite_path: Option<String>) -> Result<Self> {
        let sqlite_path = match sqlite_path {
            Some(path) => path,
            None => env::var("SQLITE_PATH").map_err(|_| {
                DigestError::Config("SQLITE_PATH not set (or pass --db)".to_string())
            })?,
        };
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let sync_interval_secs = parse_secs("SYNC_INTERVAL_SECS", DEFAULT_SYNC_INTERVAL_SECS)?;

        Ok(Self {
            sqlite_path,
            log_file,
            sync_interval_secs,
        })
    }

    /// Rejects an empty database path and a zero sync interval.
    pub fn validate(&self) -> Result<()> {
        if self.sqlite_path.trim().is_empty() {
            return Err(DigestError::Config("SQLITE_PATH is empty".to_string()));
        }
        if self.sync_interval_secs == 0 {
            return Err(DigestError::Config(
                "SYNC_INTERVAL_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }
}

fn parse_secs(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            DigestError::Config(format!("{} must be a non-negative integer, got {:?}", key, raw))
        }),
        Err(_) => Ok(default),
    }
}
