//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use digest_core::BaseConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tg-digest")]
#[command(about = "Telegram digest store: ingest exports, digest chats, inspect message windows", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database file; overrides SQLITE_PATH.
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the schema if missing and print row counts.
    Init,
    /// Run one ingestion cycle from a JSON export.
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Run ingestion cycles from a JSON export on an interval (Ctrl-C stops).
    Sync {
        #[arg(short, long)]
        file: PathBuf,
        /// Seconds between cycles; defaults to SYNC_INTERVAL_SECS.
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Stop after this many cycles.
        #[arg(long)]
        runs: Option<u64>,
    },
    /// Summarize each chat's new messages to stdout on an interval (Ctrl-C stops).
    Digest {
        /// Skip messages at or before this Unix timestamp on the first cycle.
        #[arg(long, default_value = "0")]
        since: i64,
        /// Seconds between cycles; defaults to SYNC_INTERVAL_SECS.
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Stop after this many cycles.
        #[arg(long)]
        runs: Option<u64>,
    },
    /// Print the newest stored timestamp of a chat (0 when empty).
    LastSeen {
        #[arg(long, allow_hyphen_values = true)]
        chat_id: i64,
    },
    /// Print messages of a chat newer than a timestamp, oldest first.
    Messages {
        #[arg(long, allow_hyphen_values = true)]
        chat_id: i64,
        #[arg(long, default_value = "0")]
        after: i64,
        /// Print as JSON instead of one line per message.
        #[arg(long)]
        json: bool,
    },
    /// List stored chats.
    Chats,
}

/// Load BaseConfig from environment. `db` overrides SQLITE_PATH.
pub fn load_config(db: Option<String>) -> Result<BaseConfig> {
    let config = BaseConfig::load(db)?;
    config.validate()?;
    Ok(config)
}
