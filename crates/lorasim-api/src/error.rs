use thiserror::Error;

/// Fallback message when a failed response carries no usable `{message}`.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Top-level error type for the `lorasim-api` crate.
///
/// `lorasim-core` maps these into the user-facing taxonomy
/// (network failure, HTTP error, validation error).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request never produced a response (connection refused, DNS
    /// failure, reset, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Base URL that cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for API paths: {0}")]
    UnusableBaseUrl(String),

    /// Failed to construct the underlying HTTP client.
    #[error("HTTP client setup failed: {0}")]
    ClientBuild(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the backend's `{message}` verbatim,
    /// or [`GENERIC_FAILURE`] when the body had none.
    #[error("{message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Http { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the backend rejected a create because the
    /// identifier already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Http { status: 409, .. })
    }

    /// Returns `true` if the request failed before a response arrived.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status of a backend rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
