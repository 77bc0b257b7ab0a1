// ── Refresh application logic ──
//
// Collects one refresh pass into a `FleetSnapshot` and records which
// servers had to be degraded to empty lists.

use chrono::Utc;
use serde::Serialize;

use super::FleetSnapshot;
use crate::model::{Device, Gateway, NetworkServer};

/// A server whose gateway/device fetch failed during a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshFailure {
    pub server: String,
    pub message: String,
}

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    pub generation: u64,
    /// `false` when a newer refresh started before this one finished and
    /// the result was thrown away.
    pub applied: bool,
    pub servers: usize,
    pub gateways: usize,
    pub devices: usize,
    /// Servers shown with empty lists because their fetch failed.
    pub failures: Vec<RefreshFailure>,
}

impl RefreshReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Accumulates per-server results in server-list order.
pub(crate) struct SnapshotBuilder {
    snapshot: FleetSnapshot,
    failures: Vec<RefreshFailure>,
}

impl SnapshotBuilder {
    pub(crate) fn new(generation: u64, servers: Vec<NetworkServer>) -> Self {
        Self {
            snapshot: FleetSnapshot {
                servers,
                generation,
                ..FleetSnapshot::default()
            },
            failures: Vec::new(),
        }
    }

    pub(crate) fn server_names(&self) -> Vec<String> {
        self.snapshot
            .servers
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    pub(crate) fn insert(&mut self, server: &str, gateways: Vec<Gateway>, devices: Vec<Device>) {
        self.snapshot.gateways.insert(server.to_owned(), gateways);
        self.snapshot.devices.insert(server.to_owned(), devices);
    }

    /// Both lists go empty when either fetch fails.
    pub(crate) fn degrade(&mut self, server: &str, message: String) {
        self.insert(server, Vec::new(), Vec::new());
        self.failures.push(RefreshFailure {
            server: server.to_owned(),
            message,
        });
    }

    pub(crate) fn finish(mut self) -> (FleetSnapshot, RefreshReport) {
        self.snapshot.refreshed_at = Some(Utc::now());
        let report = RefreshReport {
            generation: self.snapshot.generation,
            applied: false,
            servers: self.snapshot.servers.len(),
            gateways: self.snapshot.gateway_total(),
            devices: self.snapshot.device_total(),
            failures: self.failures,
        };
        (self.snapshot, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(name: &str) -> NetworkServer {
        NetworkServer {
            name: name.into(),
            config: None,
            device_count: 0,
            gateway_count: 0,
        }
    }

    fn gateway(eui: &str) -> Gateway {
        Gateway {
            eui: eui.into(),
            discovery_uri: None,
            discovery_state: None,
            data_uri: None,
            data_state: None,
        }
    }

    #[test]
    fn degraded_server_gets_empty_lists() {
        let mut builder = SnapshotBuilder::new(3, vec![server("a"), server("b")]);
        builder.insert("a", vec![gateway("0102030405060708")], Vec::new());
        builder.degrade("b", "boom".into());
        let (snap, report) = builder.finish();

        assert_eq!(snap.gateways_of("a").len(), 1);
        assert!(snap.gateways_of("b").is_empty());
        assert!(snap.devices_of("b").is_empty());
        assert_eq!(report.generation, 3);
        assert_eq!(report.gateways, 1);
        assert_eq!(
            report.failures,
            vec![RefreshFailure {
                server: "b".into(),
                message: "boom".into()
            }]
        );
        assert!(snap.refreshed_at().is_some());
    }

    #[test]
    fn lookups_ignore_eui_case() {
        let mut builder = SnapshotBuilder::new(1, vec![server("a")]);
        builder.insert("a", vec![gateway("aabbccddeeff0011")], Vec::new());
        let (snap, _) = builder.finish();
        assert!(snap.gateway("a", "AABBCCDDEEFF0011").is_some());
        assert!(snap.gateway("zzz", "AABBCCDDEEFF0011").is_none());
    }
}
