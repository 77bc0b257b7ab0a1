// ── Command API ──
//
// Every mutation flows through the `Command` enum. The controller issues
// the REST call, then refreshes the whole tree. Progress is
// published as `CommandEvent`s so front ends can show what is in flight.

pub mod requests;

use std::fmt;

use serde::Serialize;
use strum::Display;

use crate::error::CoreError;
use crate::store::RefreshReport;
use lorasim_api::{CreateDeviceRequest, CreateGatewayRequest, CreateServerRequest};

pub use requests::{NewDevice, NewGateway, NewServer, parse_devnonce};

/// All write operations against the simulator backend.
///
/// Create variants carry already-validated request bodies; build them
/// from [`NewServer`], [`NewGateway`] or [`NewDevice`].
#[derive(Debug, Clone)]
pub enum Command {
    // ── Network servers ──────────────────────────────────────────────
    CreateServer(CreateServerRequest),
    DeleteServer { name: String },
    SyncServer { name: String },

    // ── Gateways ─────────────────────────────────────────────────────
    CreateGateway {
        server: String,
        request: CreateGatewayRequest,
    },
    DeleteGateway { server: String, eui: String },
    ConnectGateway { server: String, eui: String },
    DisconnectGateway { server: String, eui: String },

    // ── Devices ──────────────────────────────────────────────────────
    CreateDevice {
        server: String,
        request: CreateDeviceRequest,
    },
    DeleteDevice { server: String, eui: String },
    JoinDevice { server: String, eui: String },
    UplinkDevice { server: String, eui: String },
}

impl Command {
    /// Deletes need an explicit yes from the operator before dispatch.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::DeleteServer { .. } | Self::DeleteGateway { .. } | Self::DeleteDevice { .. }
        )
    }

    /// Question to ask before dispatching a destructive command.
    pub fn confirmation_prompt(&self) -> Option<String> {
        match self {
            Self::DeleteServer { name } => Some(format!(
                "Are you sure you want to delete network server \"{name}\"?"
            )),
            Self::DeleteGateway { eui, .. } => {
                Some(format!("Are you sure you want to delete gateway \"{eui}\"?"))
            }
            Self::DeleteDevice { eui, .. } => {
                Some(format!("Are you sure you want to delete device \"{eui}\"?"))
            }
            _ => None,
        }
    }

    /// Prefix for a failure message, e.g. `Error deleting gateway`.
    pub fn failure_context(&self) -> &'static str {
        match self {
            Self::CreateServer(_) => "Error creating server",
            Self::DeleteServer { .. } => "Error deleting network server",
            Self::SyncServer { .. } => "Error syncing network server",
            Self::CreateGateway { .. } => "Error creating gateway",
            Self::DeleteGateway { .. } => "Error deleting gateway",
            Self::ConnectGateway { .. } => "Error connecting gateway",
            Self::DisconnectGateway { .. } => "Error disconnecting gateway",
            Self::CreateDevice { .. } => "Error creating device",
            Self::DeleteDevice { .. } => "Error deleting device",
            Self::JoinDevice { .. } => "Error sending join",
            Self::UplinkDevice { .. } => "Error sending uplink",
        }
    }

    /// Full operator-facing failure text.
    pub fn failure_message(&self, err: &CoreError) -> String {
        format!("{}: {}", self.failure_context(), err.user_message())
    }

    /// Confirmation worth showing after success, if any.
    pub fn success_message(&self) -> Option<String> {
        match self {
            Self::SyncServer { name } => Some(format!("Successfully synced {name}")),
            _ => None,
        }
    }

    /// Server the command targets.
    pub fn server(&self) -> &str {
        match self {
            Self::CreateServer(req) => &req.name,
            Self::DeleteServer { name } | Self::SyncServer { name } => name,
            Self::CreateGateway { server, .. }
            | Self::DeleteGateway { server, .. }
            | Self::ConnectGateway { server, .. }
            | Self::DisconnectGateway { server, .. }
            | Self::CreateDevice { server, .. }
            | Self::DeleteDevice { server, .. }
            | Self::JoinDevice { server, .. }
            | Self::UplinkDevice { server, .. } => server,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateServer(req) => write!(f, "create server {}", req.name),
            Self::DeleteServer { name } => write!(f, "delete server {name}"),
            Self::SyncServer { name } => write!(f, "sync server {name}"),
            Self::CreateGateway { server, request } => {
                write!(f, "create gateway {} on {server}", request.eui)
            }
            Self::DeleteGateway { server, eui } => write!(f, "delete gateway {eui} on {server}"),
            Self::ConnectGateway { server, eui } => write!(f, "connect gateway {eui} on {server}"),
            Self::DisconnectGateway { server, eui } => {
                write!(f, "disconnect gateway {eui} on {server}")
            }
            Self::CreateDevice { server, request } => {
                write!(f, "create device {} on {server}", request.deveui)
            }
            Self::DeleteDevice { server, eui } => write!(f, "delete device {eui} on {server}"),
            Self::JoinDevice { server, eui } => write!(f, "join device {eui} on {server}"),
            Self::UplinkDevice { server, eui } => write!(f, "uplink device {eui} on {server}"),
        }
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────

/// Where a single command is in its lifecycle.
///
/// `Pending → Succeeded → Refreshing → Idle` on success,
/// `Pending → Failed → Idle` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[serde(tag = "phase", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommandPhase {
    Pending,
    Succeeded,
    Failed { message: String },
    Refreshing,
    Idle,
}

/// Progress notification for one command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandEvent {
    /// Unique per controller, shared by all events of one command.
    pub id: u64,
    /// Human-readable description, e.g. `join device 0102… on s1`.
    pub label: String,
    pub phase: CommandPhase,
}

/// Result of [`Controller::execute`](crate::Controller::execute).
///
/// `refresh` holds the tree reload that followed the call. A failed
/// refresh never reverses a successful command.
#[derive(Debug)]
pub struct CommandOutcome {
    pub command: Command,
    pub result: Result<(), CoreError>,
    pub refresh: Result<RefreshReport, CoreError>,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// Failure text for the command, if it failed.
    pub fn failure_message(&self) -> Option<String> {
        self.result
            .as_ref()
            .err()
            .map(|e| self.command.failure_message(e))
    }

    pub fn refresh_error(&self) -> Option<&CoreError> {
        self.refresh.as_ref().err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete_gateway() -> Command {
        Command::DeleteGateway {
            server: "s1".into(),
            eui: "0102030405060708".into(),
        }
    }

    #[test]
    fn only_deletes_are_destructive() {
        assert!(delete_gateway().is_destructive());
        assert!(
            Command::DeleteServer {
                name: "s1".into()
            }
            .is_destructive()
        );
        assert!(
            !Command::JoinDevice {
                server: "s1".into(),
                eui: "0102030405060708".into()
            }
            .is_destructive()
        );
        assert!(
            !Command::SyncServer {
                name: "s1".into()
            }
            .is_destructive()
        );
    }

    #[test]
    fn destructive_commands_have_prompts() {
        assert_eq!(
            delete_gateway().confirmation_prompt().as_deref(),
            Some("Are you sure you want to delete gateway \"0102030405060708\"?")
        );
        assert_eq!(
            Command::DeleteServer {
                name: "lab".into()
            }
            .confirmation_prompt()
            .as_deref(),
            Some("Are you sure you want to delete network server \"lab\"?")
        );
        assert!(
            Command::ConnectGateway {
                server: "s1".into(),
                eui: "x".into()
            }
            .confirmation_prompt()
            .is_none()
        );
    }

    #[test]
    fn failure_message_prefixes_backend_text() {
        let err = CoreError::Http {
            status: 404,
            message: "gateway not found".into(),
        };
        assert_eq!(
            delete_gateway().failure_message(&err),
            "Error deleting gateway: gateway not found"
        );
    }

    #[test]
    fn sync_reports_success() {
        assert_eq!(
            Command::SyncServer {
                name: "cs".into()
            }
            .success_message()
            .as_deref(),
            Some("Successfully synced cs")
        );
    }

    #[test]
    fn phase_display_is_lowercase() {
        assert_eq!(CommandPhase::Refreshing.to_string(), "refreshing");
        assert_eq!(
            CommandPhase::Failed {
                message: "x".into()
            }
            .to_string(),
            "failed"
        );
    }
}
