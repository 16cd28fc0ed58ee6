//! Digest cycle: summarize what each chat received since its last digest.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use storage::{DigestRepository, MessageRecord};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::error::{PipelineError, Result};
use crate::scheduler::Cycle;
use crate::source::{DigestSender, Summarizer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestReport {
    pub chats_considered: usize,
    pub digests_sent: usize,
    pub messages_summarized: usize,
}

/// Per-chat position of the last delivered digest.
///
/// Timestamps have second granularity and ingestion keeps storing messages in
/// the high-water second, so the watermark second is read again and the
/// `message_id`s already delivered in it are skipped.
#[derive(Debug, Clone, Default)]
struct Watermark {
    timestamp: i64,
    delivered_at_timestamp: HashSet<i64>,
}

impl Watermark {
    fn is_delivered(&self, message: &MessageRecord) -> bool {
        message.timestamp == self.timestamp
            && self.delivered_at_timestamp.contains(&message.message_id)
    }

    /// Watermark after `window` (non-empty, ascending) has been delivered.
    fn advance(&self, window: &[MessageRecord], newest: i64) -> Self {
        let mut delivered_at_timestamp: HashSet<i64> = window
            .iter()
            .filter(|m| m.timestamp == newest)
            .map(|m| m.message_id)
            .collect();
        if newest == self.timestamp {
            delivered_at_timestamp.extend(self.delivered_at_timestamp.iter().copied());
        }
        Self {
            timestamp: newest,
            delivered_at_timestamp,
        }
    }
}

/// Pulls the window since the last digest for every stored chat, summarizes
/// non-empty windows and sends them.
///
/// Watermarks live in memory, start at `since` and only move forward once a
/// digest has been delivered, so a failed send is retried with the same window
/// on the next cycle.
pub struct DigestDriver {
    repo: Arc<dyn DigestRepository>,
    summarizer: Arc<dyn Summarizer>,
    sender: Arc<dyn DigestSender>,
    since: i64,
    watermarks: Mutex<HashMap<i64, Watermark>>,
}

impl DigestDriver {
    pub fn new(
        repo: Arc<dyn DigestRepository>,
        summarizer: Arc<dyn Summarizer>,
        sender: Arc<dyn DigestSender>,
    ) -> Self {
        Self {
            repo,
            summarizer,
            sender,
            since: 0,
            watermarks: Mutex::new(HashMap::new()),
        }
    }

    /// Ignore messages at or before `since` for chats without a watermark yet.
    pub fn with_since(mut self, since: i64) -> Self {
        self.since = since;
        self
    }

    /// Timestamp of the newest message already digested for `chat_id`.
    pub async fn watermark(&self, chat_id: i64) -> i64 {
        let watermarks = self.watermarks.lock().await;
        watermarks
            .get(&chat_id)
            .map(|w| w.timestamp)
            .unwrap_or(self.since)
    }

    /// Undelivered messages of `chat_id`, oldest first.
    async fn pending_window(&self, chat_id: i64) -> Result<(Watermark, Vec<MessageRecord>)> {
        let current = self.watermarks.lock().await.get(&chat_id).cloned();
        match current {
            // `since` itself is excluded for chats never digested.
            None => {
                let window = self.repo.get_messages_after(chat_id, self.since).await?;
                let start = Watermark {
                    timestamp: self.since,
                    ..Watermark::default()
                };
                Ok((start, window))
            }
            Some(mark) => {
                let mut window = self
                    .repo
                    .get_messages_after(chat_id, mark.timestamp.saturating_sub(1))
                    .await?;
                window.retain(|m| !mark.is_delivered(m));
                Ok((mark, window))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<DigestReport> {
        let mut report = DigestReport::default();
        let chats = self.repo.list_chats().await?;

        for chat in &chats {
            report.chats_considered += 1;
            let (mark, window) = self.pending_window(chat.id).await?;
            let after = mark.timestamp;

            let Some(newest) = window.last().map(|m| m.timestamp) else {
                debug!(chat_id = chat.id, after, "No new messages, skipping digest");
                continue;
            };

            let digest = self
                .summarizer
                .summarize(chat, &window)
                .await
                .map_err(|e| PipelineError::Summarizer(format!("chat {}: {:#}", chat.id, e)))?;

            self.sender
                .send_digest(chat.id, &digest)
                .await
                .map_err(|e| PipelineError::Delivery(format!("chat {}: {:#}", chat.id, e)))?;

            self.watermarks
                .lock()
                .await
                .insert(chat.id, mark.advance(&window, newest));
            report.digests_sent += 1;
            report.messages_summarized += window.len();

            info!(
                chat_id = chat.id,
                messages = window.len(),
                from = after,
                to = newest,
                "Digest sent"
            );
        }

        Ok(report)
    }
}

#[async_trait]
impl Cycle for DigestDriver {
    fn name(&self) -> &'static str {
        "digest"
    }

    async fn run_cycle(&self) -> Result<()> {
        let report = self.run_once().await?;
        info!(
            chats = report.chats_considered,
            digests = report.digests_sent,
            messages = report.messages_summarized,
            "step: digest done"
        );
        Ok(())
    }
}
