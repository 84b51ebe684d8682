//! Pure state-transition policy for report lifecycles.
//!
//! Every mutation of a report's `status` or deadline in this crate flows
//! through [`transition`]; neither the deadline watcher nor the dashboard
//! controller writes those fields directly. The function is total over the
//! (state, action) space: every pair yields a new report or a typed
//! [`LifecycleError`], never a panic or an undefined case.
//!
//! Policy summary:
//!
//! | Action                  | pending        | failed          | completed            |
//! |-------------------------|----------------|-----------------|----------------------|
//! | `SetStatus(Completed)`  | → completed    | → completed     | no-op                |
//! | `SetStatus(Pending)`    | no-op          | → pending       | `CompletedImmutable` |
//! | `SetStatus(Failed)`     | `ManualFail`   | `ManualFail`    | `ManualFail`         |
//! | `SetDeadline(t)`        | deadline := t  | `DeadlineFrozen`| `CompletedImmutable` |
//! | `AutoFail`              | → failed       | no-op           | no-op                |

use chrono::{DateTime, TimeDelta, Utc};

use crate::errors::LifecycleError;
use crate::report::{Report, ReportStatus};

/// Grace period past the promised deadline before a pending report is
/// auto-failed: one calendar day.
pub const DEFAULT_GRACE_HOURS: i64 = 24;

/// An operator- or watcher-initiated transition request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Operator picked a new status in the update form.
    SetStatus(ReportStatus),
    /// Operator edited the promised completion deadline.
    SetDeadline(DateTime<Utc>),
    /// Watcher observed the deadline (plus grace) lapse.
    AutoFail,
}

/// Compute the report that results from applying `action` to `report`.
///
/// Pure: the input report is untouched, and no-op transitions return an
/// unchanged clone so callers can compare before and after.
pub fn transition(report: &Report, action: Action) -> Result<Report, LifecycleError> {
    match action {
        Action::SetStatus(next) => set_status(report, next),
        Action::SetDeadline(deadline) => set_deadline(report, deadline),
        Action::AutoFail => auto_fail(report),
    }
}

fn set_status(report: &Report, next: ReportStatus) -> Result<Report, LifecycleError> {
    match (report.status, next) {
        // Operator resolution is always allowed: a late report can still be
        // marked completed. Setting completed on a completed report changes
        // nothing.
        (_, ReportStatus::Completed) => Ok(with_status(report, ReportStatus::Completed)),

        // Reopening a failed report, or a no-op while still pending.
        (ReportStatus::Pending, ReportStatus::Pending)
        | (ReportStatus::Failed, ReportStatus::Pending) => {
            Ok(with_status(report, ReportStatus::Pending))
        }

        (ReportStatus::Completed, ReportStatus::Pending) => {
            Err(LifecycleError::CompletedImmutable)
        }

        // Failed is reserved for deadline expiry.
        (_, ReportStatus::Failed) => Err(LifecycleError::ManualFail),
    }
}

fn set_deadline(report: &Report, deadline: DateTime<Utc>) -> Result<Report, LifecycleError> {
    match report.status {
        ReportStatus::Pending => {
            let mut next = report.clone();
            next.estimated_completion_time = Some(deadline.to_rfc3339());
            Ok(next)
        }
        ReportStatus::Completed => Err(LifecycleError::CompletedImmutable),
        ReportStatus::Failed => Err(LifecycleError::DeadlineFrozen {
            status: ReportStatus::Failed,
        }),
    }
}

fn auto_fail(report: &Report) -> Result<Report, LifecycleError> {
    match report.status {
        ReportStatus::Pending => Ok(with_status(report, ReportStatus::Failed)),
        // Terminal or already failed: the expiry signal is stale, ignore it.
        ReportStatus::Completed | ReportStatus::Failed => Ok(report.clone()),
    }
}

fn with_status(report: &Report, status: ReportStatus) -> Report {
    let mut next = report.clone();
    next.status = status;
    next
}

/// Whether `report`'s promised deadline has lapsed past the grace period.
///
/// Reports without a parseable deadline never expire; the watcher leaves
/// them pending rather than inventing a default.
pub fn deadline_expired(report: &Report, now: DateTime<Utc>, grace: TimeDelta) -> bool {
    match report.deadline() {
        Some(deadline) => now > deadline + grace,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(status: ReportStatus, deadline: Option<&str>) -> Report {
        Report {
            id: "1".to_string(),
            address: "12 Elm Street".to_string(),
            status,
            estimated_completion_time: deadline.map(|s| s.to_string()),
        }
    }

    // ── SetStatus ────────────────────────────────────────────────────

    #[test]
    fn test_complete_from_pending() {
        let before = report(ReportStatus::Pending, Some("2026-08-01T00:00:00Z"));
        let after = transition(&before, Action::SetStatus(ReportStatus::Completed)).unwrap();
        assert_eq!(after.status, ReportStatus::Completed);
        // Deadline survives resolution untouched.
        assert_eq!(
            after.estimated_completion_time,
            before.estimated_completion_time
        );
    }

    #[test]
    fn test_complete_from_failed() {
        let before = report(ReportStatus::Failed, Some("2026-08-01T00:00:00Z"));
        let after = transition(&before, Action::SetStatus(ReportStatus::Completed)).unwrap();
        assert_eq!(after.status, ReportStatus::Completed);
        assert_eq!(
            after.estimated_completion_time,
            before.estimated_completion_time
        );
    }

    #[test]
    fn test_completed_report_is_frozen() {
        let before = report(ReportStatus::Completed, Some("2026-08-01T00:00:00Z"));

        let err = transition(&before, Action::SetStatus(ReportStatus::Pending)).unwrap_err();
        assert_eq!(err, LifecycleError::CompletedImmutable);

        // Re-completing changes nothing.
        let after = transition(&before, Action::SetStatus(ReportStatus::Completed)).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_reopen_failed_report() {
        let before = report(ReportStatus::Failed, Some("2026-08-01T00:00:00Z"));
        let after = transition(&before, Action::SetStatus(ReportStatus::Pending)).unwrap();
        assert_eq!(after.status, ReportStatus::Pending);
    }

    #[test]
    fn test_set_pending_while_pending_is_noop() {
        let before = report(ReportStatus::Pending, None);
        let after = transition(&before, Action::SetStatus(ReportStatus::Pending)).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_manual_fail_rejected_from_every_state() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::Completed,
            ReportStatus::Failed,
        ] {
            let before = report(status, None);
            let err = transition(&before, Action::SetStatus(ReportStatus::Failed)).unwrap_err();
            assert_eq!(err, LifecycleError::ManualFail);
        }
    }

    // ── SetDeadline ──────────────────────────────────────────────────

    #[test]
    fn test_set_deadline_while_pending() {
        let before = report(ReportStatus::Pending, Some("2026-08-01T00:00:00Z"));
        let new_deadline = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
        let after = transition(&before, Action::SetDeadline(new_deadline)).unwrap();
        assert_eq!(after.deadline(), Some(new_deadline));
        assert_eq!(after.status, ReportStatus::Pending);
    }

    #[test]
    fn test_set_deadline_rejected_when_completed() {
        let before = report(ReportStatus::Completed, Some("2026-08-01T00:00:00Z"));
        let new_deadline = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
        let err = transition(&before, Action::SetDeadline(new_deadline)).unwrap_err();
        assert_eq!(err, LifecycleError::CompletedImmutable);
    }

    #[test]
    fn test_set_deadline_rejected_when_failed() {
        let before = report(ReportStatus::Failed, Some("2026-08-01T00:00:00Z"));
        let new_deadline = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
        let err = transition(&before, Action::SetDeadline(new_deadline)).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::DeadlineFrozen {
                status: ReportStatus::Failed
            }
        );
    }

    // ── AutoFail ─────────────────────────────────────────────────────

    #[test]
    fn test_auto_fail_from_pending() {
        let before = report(ReportStatus::Pending, Some("2026-08-01T00:00:00Z"));
        let after = transition(&before, Action::AutoFail).unwrap();
        assert_eq!(after.status, ReportStatus::Failed);
        assert_eq!(
            after.estimated_completion_time,
            before.estimated_completion_time
        );
    }

    #[test]
    fn test_auto_fail_on_completed_is_noop() {
        let before = report(ReportStatus::Completed, Some("2026-08-01T00:00:00Z"));
        let after = transition(&before, Action::AutoFail).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_auto_fail_on_failed_is_noop() {
        let before = report(ReportStatus::Failed, Some("2026-08-01T00:00:00Z"));
        let after = transition(&before, Action::AutoFail).unwrap();
        assert_eq!(after, before);
    }

    // ── deadline_expired ─────────────────────────────────────────────

    #[test]
    fn test_not_expired_within_grace() {
        let r = report(ReportStatus::Pending, Some("2026-08-01T00:00:00Z"));
        let grace = TimeDelta::hours(DEFAULT_GRACE_HOURS);
        // 23 hours past the deadline: still inside the one-day grace window.
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 23, 0, 0).unwrap();
        assert!(!deadline_expired(&r, now, grace));
        // Exactly at deadline + grace: not yet expired (strictly greater).
        let now = Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap();
        assert!(!deadline_expired(&r, now, grace));
    }

    #[test]
    fn test_expired_past_grace() {
        let r = report(ReportStatus::Pending, Some("2026-08-01T00:00:00Z"));
        let grace = TimeDelta::hours(DEFAULT_GRACE_HOURS);
        let now = Utc.with_ymd_and_hms(2026, 8, 2, 1, 0, 0).unwrap();
        assert!(deadline_expired(&r, now, grace));
    }

    #[test]
    fn test_missing_or_malformed_deadline_never_expires() {
        let grace = TimeDelta::hours(DEFAULT_GRACE_HOURS);
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let r = report(ReportStatus::Pending, None);
        assert!(!deadline_expired(&r, now, grace));
        let r = report(ReportStatus::Pending, Some("whenever"));
        assert!(!deadline_expired(&r, now, grace));
    }

    // ── totality ─────────────────────────────────────────────────────

    #[test]
    fn test_every_state_action_pair_is_defined() {
        let deadline = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        let actions = [
            Action::SetStatus(ReportStatus::Pending),
            Action::SetStatus(ReportStatus::Completed),
            Action::SetStatus(ReportStatus::Failed),
            Action::SetDeadline(deadline),
            Action::AutoFail,
        ];
        for status in [
            ReportStatus::Pending,
            ReportStatus::Completed,
            ReportStatus::Failed,
        ] {
            for action in &actions {
                // Every pair yields Ok or a typed error; none panic.
                let _ = transition(&report(status, None), action.clone());
            }
        }
    }

    #[test]
    fn test_completed_is_fixed_point_of_all_transitions() {
        let deadline = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        let before = report(ReportStatus::Completed, Some("2026-08-01T00:00:00Z"));
        let actions = [
            Action::SetStatus(ReportStatus::Pending),
            Action::SetStatus(ReportStatus::Completed),
            Action::SetStatus(ReportStatus::Failed),
            Action::SetDeadline(deadline),
            Action::AutoFail,
        ];
        for action in actions {
            match transition(&before, action) {
                Ok(after) => assert_eq!(after, before),
                Err(_) => {} // rejected, state untouched by construction
            }
        }
    }
}
