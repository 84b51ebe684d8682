//! Background deadline watcher for the report store.
//!
//! A recurring tokio task that sweeps the store on a fixed cadence and
//! auto-fails pending reports whose promised deadline has lapsed past the
//! grace period. The transition is applied to the local snapshot only: it
//! is an advisory warning for the operator, never pushed to the backend.
//!
//! A sweep never aborts: records with a missing or unparseable deadline are
//! skipped and evaluation continues with the rest.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::lifecycle::{self, Action, DEFAULT_GRACE_HOURS};
use crate::report::ReportStatus;
use crate::store::ReportStore;

/// Default sweep cadence. Deadlines are measured in days, so once per second
/// is more than enough; this is a tunable, not a correctness requirement.
const DEFAULT_TICK_SECS: u64 = 1;

/// Periodic deadline evaluator over a [`ReportStore`].
#[derive(Debug)]
pub struct DeadlineWatcher {
    store: ReportStore,
    tick: Duration,
    grace: TimeDelta,
}

impl DeadlineWatcher {
    pub fn new(store: ReportStore) -> Self {
        Self {
            store,
            tick: Duration::from_secs(DEFAULT_TICK_SECS),
            grace: TimeDelta::hours(DEFAULT_GRACE_HOURS),
        }
    }

    /// Set the sweep cadence.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Set the grace period past the promised deadline.
    pub fn with_grace(mut self, grace: TimeDelta) -> Self {
        self.grace = grace;
        self
    }

    /// Start the background sweep task. Dropping or stopping the returned
    /// handle cancels the task deterministically.
    pub fn spawn(self) -> WatcherHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.tick);
            loop {
                ticker.tick().await;
                Self::sweep(&self.store, Utc::now(), self.grace);
            }
        });
        WatcherHandle { task }
    }

    /// Evaluate every stored report against `now` and auto-fail the expired
    /// pending ones. Returns how many reports were newly marked failed.
    ///
    /// Each record is re-read and rewritten under the store lock, so a
    /// concurrent operator update is never clobbered by a stale observation.
    pub fn sweep(store: &ReportStore, now: DateTime<Utc>, grace: TimeDelta) -> usize {
        let ids: Vec<String> = store.all().into_iter().map(|r| r.id).collect();
        let mut newly_failed = 0;

        for id in ids {
            let failed = store
                .with_record(&id, |report| {
                    if report.status != ReportStatus::Pending {
                        return false;
                    }
                    if report.estimated_completion_time.is_some() && report.deadline().is_none() {
                        debug!(id = %report.id, "skipping report with unparseable deadline");
                        return false;
                    }
                    if !lifecycle::deadline_expired(report, now, grace) {
                        return false;
                    }
                    match lifecycle::transition(report, Action::AutoFail) {
                        Ok(next) => {
                            *report = next;
                            true
                        }
                        Err(err) => {
                            // Unreachable from pending; a sweep still must
                            // not abort on one bad record.
                            debug!(id = %report.id, %err, "auto-fail rejected");
                            false
                        }
                    }
                })
                .unwrap_or(false);

            if failed {
                info!(%id, "promised deadline lapsed; marking report failed locally");
                newly_failed += 1;
            }
        }

        newly_failed
    }
}

/// Handle to a running watcher task.
///
/// The task is aborted on [`WatcherHandle::stop`] or on drop, so a torn-down
/// dashboard leaks no timer and stops mutating the stale snapshot.
#[derive(Debug)]
pub struct WatcherHandle {
    task: JoinHandle<()>,
}

impl WatcherHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
