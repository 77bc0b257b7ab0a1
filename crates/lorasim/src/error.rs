//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use lorasim_config::ConfigError;
use lorasim_core::{Command, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the simulator backend at {url}")]
    #[diagnostic(
        code(lorasim::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             Reason: {reason}\n\
             Try: lorasim --backend http://localhost:2208 servers list"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(lorasim::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { url: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(lorasim::not_found),
        help("Run: lorasim {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    /// The backend refused a command; `message` already carries the
    /// action prefix.
    #[error("{message}")]
    #[diagnostic(code(lorasim::rejected))]
    Rejected { message: String, status: Option<u16> },

    #[error("{message}")]
    #[diagnostic(code(lorasim::backend))]
    Backend { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lorasim::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lorasim::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lorasim config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(lorasim::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(lorasim::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(lorasim::output))]
    Output(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Rejected {
                status: Some(409), ..
            } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Error for a command the backend (or validation) refused.
    pub fn from_command(command: &Command, err: CoreError) -> Self {
        match err {
            CoreError::Http { status, .. } => Self::Rejected {
                message: command.failure_message(&err),
                status: Some(status),
            },
            CoreError::Validation { .. } => Self::Rejected {
                message: command.failure_message(&err),
                status: None,
            },
            other => Self::from(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NetworkFailure { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { url } => CliError::Timeout { url },

            CoreError::Http { status, .. } => CliError::Rejected {
                message: err.user_message(),
                status: Some(status),
            },

            CoreError::Validation { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            CoreError::Config { message } | CoreError::Internal(message) => {
                CliError::Backend { message }
            }
        }
    }
}
