//! Dashboard controller: bridges operator intent to the lifecycle policy,
//! the report store, and the backend.
//!
//! Ordering is the correctness contract here. An update is first validated
//! through `lifecycle::transition` (a rejection never reaches the network),
//! then persisted to the backend, and only after backend confirmation is the
//! same patch applied to the local store. A backend failure therefore leaves
//! local state exactly at its last-known-good value; there is no optimistic
//! mutation to roll back.
//!
//! No versioning exists between operators: the backend applies last
//! confirmed write wins, so two operators editing the same report can
//! silently overwrite each other. Known limitation, out of scope.

use tracing::{debug, info};

use crate::backend::{ReportBackend, StatusUpdate};
use crate::errors::{DashboardError, LifecycleError};
use crate::lifecycle::{self, Action};
use crate::report::{self, Report, ReportPatch, ReportStatus};
use crate::store::ReportStore;

/// Orchestrates operator actions over a [`ReportStore`] and a backend.
///
/// The only component in the crate that talks to the backend.
pub struct DashboardController<B: ReportBackend> {
    backend: B,
    store: ReportStore,
}

impl<B: ReportBackend> DashboardController<B> {
    pub fn new(backend: B, store: ReportStore) -> Self {
        Self { backend, store }
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    /// Hydrate the store from the backend, replacing the local snapshot
    /// wholesale. Returns the number of reports loaded.
    pub async fn load(&self) -> Result<usize, DashboardError> {
        let reports = self.backend.fetch_reports().await?;
        let count = reports.len();
        self.store.replace_all(reports);
        info!(count, "hydrated report snapshot from backend");
        Ok(count)
    }

    /// Load a record into an editable draft.
    ///
    /// Completed reports are frozen and cannot be opened for editing.
    pub fn select_report(&self, id: &str) -> Result<Report, DashboardError> {
        let report = self
            .store
            .get(id)
            .ok_or_else(|| DashboardError::UnknownReport { id: id.to_string() })?;
        if report.status.is_terminal() {
            return Err(LifecycleError::CompletedImmutable.into());
        }
        Ok(report)
    }

    /// Validate and persist an operator update, then reconcile the store.
    ///
    /// The proposed deadline (when it differs from the stored one) is applied
    /// first, while the report is still pending, then the proposed status:
    /// the same order the update form submits both fields in. On lifecycle
    /// rejection no network call is made; on backend failure the store is
    /// untouched.
    pub async fn commit_update(
        &self,
        id: &str,
        proposed_status: ReportStatus,
        proposed_deadline: Option<&str>,
    ) -> Result<Report, DashboardError> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| DashboardError::UnknownReport { id: id.to_string() })?;
        let mut next = current.clone();

        if let Some(raw) = proposed_deadline {
            if current.estimated_completion_time.as_deref() != Some(raw) {
                let deadline = report::parse_deadline(raw).ok_or_else(|| {
                    DashboardError::InvalidDeadline {
                        value: raw.to_string(),
                    }
                })?;
                next = lifecycle::transition(&next, Action::SetDeadline(deadline))?;
            }
        }

        if proposed_status != next.status {
            next = lifecycle::transition(&next, Action::SetStatus(proposed_status))?;
        }

        debug!(%id, status = %next.status, "persisting operator update");
        let update = StatusUpdate {
            status: next.status,
            estimated_completion_time: next.estimated_completion_time.clone(),
        };
        self.backend.put_status(id, &update).await?;

        // Backend confirmed; now the local snapshot may follow.
        self.store.apply(
            id,
            &ReportPatch {
                status: Some(next.status),
                estimated_completion_time: next.estimated_completion_time.clone(),
            },
        );
        info!(%id, status = %next.status, "report updated");
        Ok(next)
    }

    /// Delete a report at the backend, removing it locally only on success.
    pub async fn delete_report(&self, id: &str) -> Result<(), DashboardError> {
        self.backend.delete_report(id).await?;
        self.store.remove(id);
        info!(%id, "report deleted");
        Ok(())
    }
}
