// ── Gateway domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use lorasim_api::Gateway;

const CONNECTED: &str = "connected";
const DISCONNECTED: &str = "disconnected";

/// Tri-state gateway status derived from the two link states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GatewayStatus {
    /// Data link is up.
    Connected,
    /// Both discovery and data links are down.
    Disconnected,
    /// Anything in between, including states the backend omitted.
    Pending,
}

impl GatewayStatus {
    /// Classify from `(discoveryState, dataState)`.
    ///
    /// The data link alone decides "connected"; both links must be down
    /// for "disconnected".
    pub fn classify(discovery_state: Option<&str>, data_state: Option<&str>) -> Self {
        match (discovery_state, data_state) {
            (_, Some(CONNECTED)) => Self::Connected,
            (Some(DISCONNECTED), Some(DISCONNECTED)) => Self::Disconnected,
            _ => Self::Pending,
        }
    }

    pub fn of(gateway: &Gateway) -> Self {
        Self::classify(
            gateway.discovery_state.as_deref(),
            gateway.data_state.as_deref(),
        )
    }

    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// The action an operator is offered for a gateway in this state.
    pub fn primary_action(self) -> GatewayAction {
        if self.is_connected() {
            GatewayAction::Disconnect
        } else {
            GatewayAction::Connect
        }
    }
}

/// Link action on a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum GatewayAction {
    Connect,
    Disconnect,
}
