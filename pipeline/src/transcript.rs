//! Built-in collaborators for running digests without an external summarizer:
//! a plain transcript of the window, written to any `io::Write`.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storage::{ChatRecord, MessageRecord};
use tracing::info;

use crate::source::{DigestSender, Summarizer};

/// Header line with the chat title, then one `time  author: text` line per message.
#[derive(Debug, Clone, Default)]
pub struct TranscriptSummarizer;

#[async_trait]
impl Summarizer for TranscriptSummarizer {
    async fn summarize(
        &self,
        chat: &ChatRecord,
        messages: &[MessageRecord],
    ) -> anyhow::Result<String> {
        let mut digest = format!(
            "# {} ({}, {} messages)",
            chat.title,
            chat.chat_type,
            messages.len()
        );
        for message in messages {
            let author = message
                .author_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            digest.push('\n');
            digest.push_str(&format!(
                "{}  {}: {}",
                format_time(message.timestamp),
                author,
                message.text.replace('\n', " ")
            ));
        }
        Ok(digest)
    }
}

fn format_time(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Writes each digest followed by a blank line and counts what it delivered.
pub struct WriterSender<W> {
    writer: Mutex<W>,
    sent: AtomicUsize,
}

impl<W: Write + Send> WriterSender<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            sent: AtomicUsize::new(0),
        }
    }

    /// Digests written so far.
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> DigestSender for WriterSender<W> {
    async fn send_digest(&self, chat_id: i64, digest: &str) -> anyhow::Result<()> {
        {
            let mut writer = self
                .writer
                .lock()
                .map_err(|_| anyhow!("digest writer lock poisoned"))?;
            writeln!(writer, "{}\n", digest)?;
            writer.flush()?;
        }
        self.sent.fetch_add(1, Ordering::Relaxed);
        info!(chat_id, bytes = digest.len(), "Digest written");
        Ok(())
    }
}
