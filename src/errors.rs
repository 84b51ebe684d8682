//! Typed error hierarchy for the curbside dashboard core.
//!
//! Three top-level enums cover the three failure domains:
//! - `LifecycleError` — locally rejected state transitions; never reach the network
//! - `BackendError` — authorization and transport failures from the municipal backend
//! - `DashboardError` — controller boundary, wrapping the two above

use thiserror::Error;

use crate::report::ReportStatus;

/// A transition rejected by the lifecycle policy.
///
/// These are validation failures, surfaced to the operator immediately and
/// never retried; no network call is made for a rejected transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Report is completed and can no longer be modified")]
    CompletedImmutable,

    #[error("Status 'failed' cannot be set by an operator; it is reached only by deadline expiry")]
    ManualFail,

    #[error("Deadline can only be changed while the report is pending (current status: {status})")]
    DeadlineFrozen { status: ReportStatus },
}

/// A failure talking to the municipal backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Backend request failed: {0}")]
    Transport(String),
}

/// Errors surfaced at the dashboard controller boundary.
///
/// Every variant renders as a human-readable message for the operator; none
/// terminates the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("Report {id} not found")]
    UnknownReport { id: String },

    #[error("Unrecognized deadline timestamp: {value}")]
    InvalidDeadline { value: String },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
