//! # digest-cli
//!
//! The `tg-digest` command line: argument parsing, config loading and the
//! command handlers over the digest store.

pub mod cli;
pub mod commands;

pub use cli::{load_config, Cli, Commands};
pub use commands::{execute, format_message_line};
