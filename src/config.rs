//! Layered configuration for the curbside dashboard.
//!
//! Three layers, later ones winning: `curbside.toml` → environment → CLI
//! flags. The identity token normally arrives through the environment so it
//! never lands in a config file.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:2000/api"
//!
//! [watcher]
//! tick_secs = 1
//! grace_hours = 24
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:2000/api";
pub const DEFAULT_CONFIG_FILE: &str = "curbside.toml";

/// Environment variable holding the backend base URL.
pub const ENV_BACKEND_URL: &str = "CURBSIDE_BACKEND_URL";
/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "CURBSIDE_TOKEN";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurbsideConfig {
    pub backend: BackendSection,
    pub watcher: WatcherSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    pub base_url: String,
    /// Bearer token for the municipal backend. Usually supplied via
    /// `CURBSIDE_TOKEN` rather than the file.
    pub token: Option<String>,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherSection {
    /// Sweep cadence in seconds.
    pub tick_secs: u64,
    /// Grace period past the promised deadline, in hours.
    pub grace_hours: i64,
}

impl Default for WatcherSection {
    fn default() -> Self {
        Self {
            tick_secs: 1,
            grace_hours: crate::lifecycle::DEFAULT_GRACE_HOURS,
        }
    }
}

impl CurbsideConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `path` if given (must exist), otherwise `curbside.toml` in the
    /// working directory if present, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Overlay the environment layer (`CURBSIDE_BACKEND_URL`,
    /// `CURBSIDE_TOKEN`).
    pub fn overlay_env(self) -> Self {
        self.overlay(
            std::env::var(ENV_BACKEND_URL).ok(),
            std::env::var(ENV_TOKEN).ok(),
        )
    }

    /// Overlay explicit values (the CLI-flag layer); `None` leaves the
    /// current value in place.
    pub fn overlay(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.backend.base_url = base_url;
        }
        if let Some(token) = token {
            self.backend.token = Some(token);
        }
        self
    }
}
