//! In-memory report store for the current viewing session.
//!
//! The store is the local cache of the backend's report collection, not the
//! source of truth. It is a cloneable handle over `Arc<Mutex<_>>`; every
//! public operation takes the lock exactly once, so each record mutation is
//! atomic. No partial-field write is ever observable, and the two producers
//! (deadline watcher and operator actions) serialize against the same record
//! without tearing a read.
//!
//! The store itself never decides state: callers compute new states through
//! `lifecycle::transition` and hand the result here.

use std::sync::{Arc, Mutex, PoisonError};

use crate::report::{Report, ReportPatch};

/// Cloneable handle to the session's report snapshot.
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    inner: Arc<Mutex<Vec<Report>>>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Report>> {
        // A panicked holder leaves the last consistent snapshot; per-record
        // mutations below are single assignments, so recovery is safe.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole snapshot, as after hydrating from the backend.
    pub fn replace_all(&self, reports: Vec<Report>) {
        *self.lock() = reports;
    }

    /// Merge a partial update into the record matching `id`, leaving all
    /// other records untouched. Returns `false` (no-op) if `id` is absent.
    pub fn apply(&self, id: &str, patch: &ReportPatch) -> bool {
        let mut reports = self.lock();
        match reports.iter_mut().find(|r| r.id == id) {
            Some(report) => {
                if let Some(status) = patch.status {
                    report.status = status;
                }
                if let Some(deadline) = &patch.estimated_completion_time {
                    report.estimated_completion_time = Some(deadline.clone());
                }
                true
            }
            None => false,
        }
    }

    /// Run `f` on the record matching `id` under the store lock.
    ///
    /// This is the watcher's mutation path: the closure sees the record's
    /// current state (not a stale snapshot) and its write lands atomically.
    pub fn with_record<F, R>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Report) -> R,
    {
        let mut reports = self.lock();
        reports.iter_mut().find(|r| r.id == id).map(f)
    }

    /// Delete the record matching `id`. Returns `false` (no-op) if absent.
    pub fn remove(&self, id: &str) -> bool {
        let mut reports = self.lock();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        reports.len() < before
    }

    /// Cloned copy of a single record.
    pub fn get(&self, id: &str) -> Option<Report> {
        self.lock().iter().find(|r| r.id == id).cloned()
    }

    /// Cloned snapshot of all records, in backend order.
    pub fn all(&self) -> Vec<Report> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
