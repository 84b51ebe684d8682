//! Report domain types shared across the dashboard core.
//!
//! The wire contract with the municipal backend is:
//!
//! ```json
//! { "id": "...", "address": "...", "status": "pending",
//!   "estimatedCompletionTime": "2026-08-01T12:00:00Z" }
//! ```
//!
//! Field names are camelCase on the wire, statuses are lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a garbage-collection report.
///
/// `Failed` is never chosen by an operator; it is reached only through
/// deadline expiry (see `lifecycle::transition`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Completed reports are frozen: no transition may change them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid report status: {}", s)),
        }
    }
}

/// A citizen-submitted garbage-collection report as known to this session.
///
/// The backend owns the durable record; this is the local snapshot. `id` and
/// `address` are immutable after creation. The deadline is kept as the raw
/// wire string so an unparseable value round-trips untouched; use
/// [`Report::deadline`] for the parsed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub address: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub estimated_completion_time: Option<String>,
}

impl Report {
    /// Parse the promised completion deadline, if present and well-formed.
    ///
    /// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (read as
    /// midnight UTC). Returns `None` for anything else; the watcher skips
    /// such records rather than guessing a deadline.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        let raw = self.estimated_completion_time.as_deref()?;
        parse_deadline(raw)
    }
}

/// Parse a deadline string from the wire or operator input.
pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(DateTime::from_naive_utc_and_offset(
            date.and_time(NaiveTime::MIN),
            Utc,
        ));
    }
    None
}

/// Partial update applied to a stored report.
///
/// `None` fields are left untouched; the store merges the rest atomically
/// per record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    pub estimated_completion_time: Option<String>,
}

impl ReportPatch {
    /// Patch that only changes the status.
    pub fn status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
