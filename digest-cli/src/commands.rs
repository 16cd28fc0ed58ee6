//! Command handlers. Output goes to the given writer so tests can capture it.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use digest_core::BaseConfig;
use pipeline::{
    Cycle, CycleScheduler, DigestDriver, IngestionDriver, JsonDumpSource, SchedulerReport,
    TranscriptSummarizer, WriterSender,
};
use storage::{DigestRepository, DigestStore, MessageRecord};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::Commands;

const TEXT_PREVIEW_LEN: usize = 80;

/// Runs one command against an open store. The caller owns closing the store.
pub async fn execute(
    store: &Arc<DigestStore>,
    config: &BaseConfig,
    command: Commands,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Init => {
            let stats = store.stats().await?;
            writeln!(
                out,
                "Store ready at {}: {} chats, {} users, {} messages",
                config.sqlite_path, stats.chats, stats.users, stats.messages
            )?;
        }
        Commands::Import { file } => {
            let driver = IngestionDriver::new(store.clone(), Arc::new(JsonDumpSource::from_path(&file)));
            let report = driver
                .run_once()
                .await
                .with_context(|| format!("import {}", file.display()))?;
            writeln!(
                out,
                "Imported {} chats: {} new messages, {} already stored, {} users",
                report.chats, report.inserted, report.duplicates, report.users
            )?;
        }
        Commands::Sync {
            file,
            interval_secs,
            runs,
        } => {
            let interval = resolve_interval(interval_secs, config)?;
            let driver = Arc::new(IngestionDriver::new(
                store.clone(),
                Arc::new(JsonDumpSource::from_path(&file)),
            ));
            let report = run_scheduled(driver, interval, runs).await;
            writeln!(
                out,
                "Sync stopped after {} cycles ({} failed)",
                report.runs, report.failures
            )?;
        }
        Commands::Digest {
            since,
            interval_secs,
            runs,
        } => {
            let interval = resolve_interval(interval_secs, config)?;
            let sender = Arc::new(WriterSender::new(io::stdout()));
            let driver = Arc::new(
                DigestDriver::new(store.clone(), Arc::new(TranscriptSummarizer), sender.clone())
                    .with_since(since),
            );
            let report = run_scheduled(driver, interval, runs).await;
            writeln!(
                out,
                "Digest stopped after {} cycles ({} failed), {} digests sent",
                report.runs,
                report.failures,
                sender.sent()
            )?;
        }
        Commands::LastSeen { chat_id } => {
            let ts = store.get_last_message_timestamp(chat_id).await?;
            writeln!(out, "{}", ts)?;
        }
        Commands::Messages {
            chat_id,
            after,
            json,
        } => {
            let messages = store.get_messages_after(chat_id, after).await?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&messages)?)?;
            } else if messages.is_empty() {
                writeln!(out, "No messages in chat {} after {}.", chat_id, after)?;
            } else {
                for message in &messages {
                    writeln!(out, "{}", format_message_line(message))?;
                }
            }
        }
        Commands::Chats => {
            let chats = store.list_chats().await?;
            if chats.is_empty() {
                writeln!(out, "No chats stored.")?;
            }
            for chat in &chats {
                let last = store.get_last_message_timestamp(chat.id).await?;
                writeln!(
                    out,
                    "{:<16} {:<11} {:<20} {}",
                    chat.id,
                    chat.chat_type,
                    format_timestamp(last),
                    chat.title
                )?;
            }
        }
    }
    Ok(())
}

fn resolve_interval(interval_secs: Option<u64>, config: &BaseConfig) -> Result<Duration> {
    let interval = interval_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.sync_interval());
    anyhow::ensure!(!interval.is_zero(), "--interval-secs must be greater than 0");
    Ok(interval)
}

/// Runs `cycle` until `runs` cycles are done or Ctrl-C arrives.
async fn run_scheduled(
    cycle: Arc<dyn Cycle>,
    interval: Duration,
    runs: Option<u64>,
) -> SchedulerReport {
    let mut scheduler = CycleScheduler::new(interval);
    if let Some(runs) = runs {
        scheduler = scheduler.with_max_runs(runs);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping after the current cycle");
            let _ = shutdown_tx.send(true);
        } else {
            warn!("Could not listen for Ctrl-C; stop with --runs");
            // Keep the sender alive so the scheduler only stops on --runs.
            std::future::pending::<()>().await;
        }
    });

    let report = scheduler.run(cycle, shutdown_rx).await;
    signal_task.abort();
    report
}

/// `timestamp  #message_id  author  text-preview`, one message per line.
pub fn format_message_line(message: &MessageRecord) -> String {
    let author = message
        .author_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut preview: String = message.text.chars().take(TEXT_PREVIEW_LEN).collect();
    if message.text.chars().count() > TEXT_PREVIEW_LEN {
        preview.push('…');
    }
    let preview = preview.replace('\n', " ");
    format!(
        "{:<20} #{:<10} {:<12} {}",
        format_timestamp(message.timestamp),
        message.message_id,
        author,
        preview
    )
}

fn format_timestamp(ts: i64) -> String {
    if ts == 0 {
        return "-".to_string();
    }
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}
