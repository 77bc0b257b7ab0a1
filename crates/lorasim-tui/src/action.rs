//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use lorasim_core::{Command, CommandEvent, CommandOutcome, FleetSnapshot};

use crate::create_form::FormKind;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    /// Toast summarising a finished command, if it deserves one.
    ///
    /// Failures carry the backend's message verbatim, plus the refresh
    /// error if the follow-up refresh failed too. Successes are only
    /// announced for commands with an explicit success message; the tree
    /// refresh that follows is feedback enough for the rest.
    pub fn for_outcome(outcome: &CommandOutcome) -> Option<Self> {
        if let Some(message) = outcome.failure_message() {
            let message = match outcome.refresh_error() {
                Some(err) => format!("{message} (refresh also failed: {})", err.user_message()),
                None => message,
            };
            return Some(Self::error(message));
        }
        if let Some(err) = outcome.refresh_error() {
            return Some(Self::warning(format!(
                "{} done, but the refresh failed: {}",
                outcome.command,
                err.user_message()
            )));
        }
        outcome.command.success_message().map(Self::success)
    }
}

/// Backend reachability as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Unreachable(String),
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data Events (from lorasim-core) ───────────────────────────
    FleetUpdated(Arc<FleetSnapshot>),
    CommandProgress(CommandEvent),
    RefreshStarted,
    RefreshFinished(ConnectionStatus),

    // ── Tree Navigation ───────────────────────────────────────────
    SelectPrev,
    SelectNext,
    SelectFirst,
    SelectLast,
    ToggleSelected,

    // ── Commands ──────────────────────────────────────────────────
    RequestRefresh,
    Execute(Command),

    OpenForm(FormKind),

    // ── Confirm Dialog ────────────────────────────────────────────
    ConfirmYes,
    ConfirmNo,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
