//! Interval scheduler for ingestion and digest cycles.
//!
//! A failed run is logged and the next tick still fires; nothing is retried
//! in between. Runs of one scheduler never overlap.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::error::Result;

/// One unit of scheduled work.
#[async_trait]
pub trait Cycle: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run_cycle(&self) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerReport {
    pub runs: u64,
    pub failures: u64,
}

#[derive(Debug, Clone)]
pub struct CycleScheduler {
    interval: Duration,
    max_runs: Option<u64>,
}

impl CycleScheduler {
    /// The first run starts immediately, then one per `interval`.
    /// A zero interval is raised to one millisecond (tokio rejects zero periods).
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            max_runs: None,
        }
    }

    /// Stop after `max_runs` runs, failed ones included.
    pub fn with_max_runs(mut self, max_runs: u64) -> Self {
        self.max_runs = Some(max_runs);
        self
    }

    /// Runs `cycle` until `shutdown` turns `true`, its sender is dropped, or
    /// `max_runs` is reached. A run in progress is never interrupted.
    pub async fn run(
        &self,
        cycle: Arc<dyn Cycle>,
        mut shutdown: watch::Receiver<bool>,
    ) -> SchedulerReport {
        let name = cycle.name();
        let mut report = SchedulerReport::default();

        if self.max_runs == Some(0) || *shutdown.borrow() {
            return report;
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(cycle = name, interval_secs = self.interval.as_secs_f64(), "Scheduler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            report.runs += 1;
            match cycle.run_cycle().await {
                Ok(()) => info!(cycle = name, run = report.runs, "Cycle finished"),
                Err(e) => {
                    report.failures += 1;
                    error!(cycle = name, run = report.runs, error = %e, "Cycle failed, waiting for next tick");
                }
            }

            if self.max_runs.is_some_and(|max| report.runs >= max) {
                break;
            }
        }

        if report.failures > 0 {
            warn!(cycle = name, runs = report.runs, failures = report.failures, "Scheduler stopped");
        } else {
            info!(cycle = name, runs = report.runs, "Scheduler stopped");
        }
        report
    }
}
