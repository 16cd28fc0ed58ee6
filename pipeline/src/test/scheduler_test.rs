use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::sync::watch;

use super::fakes::ScriptedCycle;
use crate::scheduler::{CycleScheduler, SchedulerReport};

#[tokio::test]
async fn test_failed_runs_do_not_stop_the_schedule() {
    let cycle = ScriptedCycle::new(vec![1, 3]);
    let (_tx, rx) = watch::channel(false);

    let report = CycleScheduler::new(Duration::from_millis(5))
        .with_max_runs(4)
        .run(cycle.clone(), rx)
        .await;

    assert_eq!(report, SchedulerReport { runs: 4, failures: 2 });
    assert_eq!(cycle.runs.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_shutdown_signal_stops_scheduler() {
    let cycle = ScriptedCycle::new(Vec::new());
    let (tx, rx) = watch::channel(false);

    let scheduler = CycleScheduler::new(Duration::from_secs(3600));
    let handle = tokio::spawn({
        let cycle = cycle.clone();
        async move { scheduler.run(cycle, rx).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(true).unwrap();

    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();
    assert_eq!(report.runs, 1);
    assert_eq!(report.failures, 0);
}

#[tokio::test]
async fn test_already_shut_down_never_runs() {
    let cycle = ScriptedCycle::new(Vec::new());
    let (_tx, rx) = watch::channel(true);

    let report = CycleScheduler::new(Duration::from_millis(5))
        .with_max_runs(3)
        .run(cycle.clone(), rx)
        .await;

    assert_eq!(report.runs, 0);
    assert_eq!(cycle.runs.load(Ordering::SeqCst), 0);
}
