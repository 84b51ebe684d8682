//! HTTP client for the municipal backend collaborator.
//!
//! The backend owns the durable report collection and exposes a small
//! REST-ish surface, authorized by a bearer token:
//!
//! - `GET {base}/reports` — full collection as JSON
//! - `PUT {base}/report/{id}/status` — body `{status, estimatedCompletionTime}`
//! - `DELETE {base}/report/{id}`
//!
//! `ReportBackend` is the seam the dashboard controller talks through, so
//! tests substitute an in-memory fake for the HTTP client. Rejected tokens
//! (401/403) surface as `BackendError::Auth`; everything else that goes
//! wrong on the wire is `BackendError::Transport`. Neither is retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::BackendError;
use crate::report::{Report, ReportStatus};

/// Body of a `PUT /report/{id}/status` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ReportStatus,
    #[serde(default)]
    pub estimated_completion_time: Option<String>,
}

/// Remote authority for the report collection.
#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// Fetch the full report collection.
    async fn fetch_reports(&self) -> Result<Vec<Report>, BackendError>;

    /// Persist a status/deadline update for one report.
    async fn put_status(&self, id: &str, update: &StatusUpdate) -> Result<(), BackendError>;

    /// Delete one report.
    async fn delete_report(&self, id: &str) -> Result<(), BackendError>;
}

/// Production [`ReportBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
            token,
        }
    }

    fn token(&self) -> Result<&str, BackendError> {
        self.token
            .as_deref()
            .ok_or_else(|| BackendError::Auth("no identity token configured".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map an HTTP response to the error taxonomy: 401/403 are auth
    /// failures, any other non-success status is a transport failure.
    fn check_status(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, BackendError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(BackendError::Auth(format!(
                "backend rejected the identity token ({})",
                status
            )));
        }
        resp.error_for_status()
            .map_err(|e| transport(context, &e))
    }
}

fn transport(context: &str, err: &reqwest::Error) -> BackendError {
    BackendError::Transport(format!("{}: {}", context, err))
}

fn normalize_base_url(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[async_trait]
impl ReportBackend for HttpBackend {
    async fn fetch_reports(&self) -> Result<Vec<Report>, BackendError> {
        let token = self.token()?;
        let resp = self
            .client
            .get(self.url("reports"))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| transport("Failed to fetch reports", &e))?;

        Self::check_status(resp, "Reports endpoint returned error status")?
            .json::<Vec<Report>>()
            .await
            .map_err(|e| transport("Failed to parse reports response", &e))
    }

    async fn put_status(&self, id: &str, update: &StatusUpdate) -> Result<(), BackendError> {
        let token = self.token()?;
        let resp = self
            .client
            .put(self.url(&format!("report/{}/status", id)))
            .header("Authorization", format!("Bearer {}", token))
            .json(update)
            .send()
            .await
            .map_err(|e| transport("Failed to send status update", &e))?;

        Self::check_status(resp, "Status update endpoint returned error status")?;
        Ok(())
    }

    async fn delete_report(&self, id: &str) -> Result<(), BackendError> {
        let token = self.token()?;
        let resp = self
            .client
            .delete(self.url(&format!("report/{}", id)))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| transport("Failed to send delete request", &e))?;

        Self::check_status(resp, "Delete endpoint returned error status")?;
        Ok(())
    }
}
