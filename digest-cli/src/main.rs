//! tg-digest: maintain and inspect the Telegram digest store. Config from env and CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use digest_cli::{execute, load_config, Cli};
use digest_core::init_tracing;
use storage::{DigestRepository, DigestStore};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.db)?;
    init_tracing(&config.log_file).context("initialize logging")?;

    let store = Arc::new(
        DigestStore::new(&config.sqlite_path)
            .await
            .with_context(|| format!("open digest store {}", config.sqlite_path))?,
    );

    let mut stdout = std::io::stdout();
    let result = execute(&store, &config, cli.command, &mut stdout).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }

    store.close().await;
    result
}
