// ── Fleet snapshot ──
//
// One immutable picture of the backend: every server in list order,
// plus the gateway and device lists fetched for each of them.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{Device, Gateway, NetworkServer};

/// Everything the last applied refresh returned.
///
/// Every server in `servers` has an entry in both maps (possibly empty),
/// and the maps have no entries for servers outside `servers`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FleetSnapshot {
    pub(crate) servers: Vec<NetworkServer>,
    pub(crate) gateways: IndexMap<String, Vec<Gateway>>,
    pub(crate) devices: IndexMap<String, Vec<Device>>,
    /// Refresh generation that produced this snapshot (0 = never refreshed).
    pub(crate) generation: u64,
    pub(crate) refreshed_at: Option<DateTime<Utc>>,
}

impl FleetSnapshot {
    pub fn servers(&self) -> &[NetworkServer] {
        &self.servers
    }

    pub fn server(&self, name: &str) -> Option<&NetworkServer> {
        self.servers.iter().find(|s| s.name == name)
    }

    /// Gateways of `server`; empty if the server is unknown or its fetch failed.
    pub fn gateways_of(&self, server: &str) -> &[Gateway] {
        self.gateways.get(server).map_or(&[], Vec::as_slice)
    }

    /// Devices of `server`; empty if the server is unknown or its fetch failed.
    pub fn devices_of(&self, server: &str) -> &[Device] {
        self.devices.get(server).map_or(&[], Vec::as_slice)
    }

    pub fn gateway(&self, server: &str, eui: &str) -> Option<&Gateway> {
        self.gateways_of(server)
            .iter()
            .find(|g| g.eui.eq_ignore_ascii_case(eui))
    }

    pub fn device(&self, server: &str, eui: &str) -> Option<&Device> {
        self.devices_of(server)
            .iter()
            .find(|d| d.deveui.eq_ignore_ascii_case(eui))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When this snapshot was applied, `None` before the first refresh.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn gateway_total(&self) -> usize {
        self.gateways.values().map(Vec::len).sum()
    }

    pub fn device_total(&self) -> usize {
        self.devices.values().map(Vec::len).sum()
    }
}
