// ── Runtime connection configuration ──
//
// Describes *where* the simulator backend lives and how patient to be
// with it. Never touches disk; the CLI/TUI builds one from a profile.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;

/// Backend address used when no profile or flag names one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:2208";

/// Configuration for a [`Controller`](crate::Controller).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Root of the backend REST API.
    pub url: Url,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ControllerConfig {
    pub fn new(url: Url) -> Self {
        Self { url, timeout: None }
    }

    /// Parse a backend URL, e.g. from a CLI flag.
    pub fn from_url_str(raw: &str) -> Result<Self, CoreError> {
        let url = Url::parse(raw.trim()).map_err(|e| CoreError::Config {
            message: format!("invalid backend URL '{raw}': {e}"),
        })?;
        Ok(Self::new(url))
    }

    /// Config pointing at a backend on this machine.
    pub fn local() -> Result<Self, CoreError> {
        Self::from_url_str(DEFAULT_BACKEND_URL)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
