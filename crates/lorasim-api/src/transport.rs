// Shared transport configuration for building reqwest::Client instances.
//
// The backend is a plain-HTTP service on the operator's machine, so there
// is no TLS or cookie tuning here. No timeout is applied unless asked for.

use std::time::Duration;

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Per-request timeout. `None` lets a hung backend call wait forever.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Config with a request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("lorasim/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::ClientBuild(format!("failed to build HTTP client: {e}")))
    }
}
