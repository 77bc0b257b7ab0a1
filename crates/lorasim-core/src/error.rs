// ── Core error types ──
//
// User-facing errors from lorasim-core. The `From<lorasim_api::Error>`
// impl separates requests that never completed from backend
// rejections, which keep the backend's message verbatim.

use thiserror::Error;

use lorasim_api::GENERIC_FAILURE;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request errors ───────────────────────────────────────────────
    /// The request could not complete (refused, reset, DNS, timeout).
    #[error("Cannot reach backend at {url}: {reason}")]
    NetworkFailure { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Non-2xx response. `message` is the backend's text verbatim.
    #[error("{message}")]
    Http { status: u16, message: String },

    // ── Input errors ─────────────────────────────────────────────────
    /// Client-side check failed; no request was sent.
    #[error("{message}")]
    Validation { field: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Text suitable for showing to the operator after an action prefix.
    ///
    /// Backend messages pass through untouched; an empty one becomes the
    /// generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } if message.is_empty() => GENERIC_FAILURE.to_owned(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a backend rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// The backend could not be reached or did not answer in time.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lorasim_api::Error> for CoreError {
    fn from(err: lorasim_api::Error) -> Self {
        match err {
            lorasim_api::Error::Transport(ref e) => {
                if let Some(status) = e.status() {
                    return CoreError::Http {
                        status: status.as_u16(),
                        message: GENERIC_FAILURE.to_owned(),
                    };
                }
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization());
                if e.is_timeout() {
                    return CoreError::Timeout { url };
                }
                let reason = if e.is_connect() {
                    "connection refused".to_owned()
                } else {
                    e.to_string()
                };
                CoreError::NetworkFailure { url, reason }
            }
            lorasim_api::Error::Http { status, message } => CoreError::Http { status, message },
            lorasim_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            lorasim_api::Error::UnusableBaseUrl(url) => CoreError::Config {
                message: format!("Backend URL cannot carry API paths: {url}"),
            },
            lorasim_api::Error::ClientBuild(msg) => CoreError::Config { message: msg },
            lorasim_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
