// ── View model ──
//
// `render` turns a snapshot plus expansion state into a description of
// what a front end should draw. It is pure: no I/O, no mutation, same
// inputs give the same view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{
    Availability, Device, Gateway, GatewayAction, GatewayStatus, KeyMaterial, NetworkServer,
    ServerKind, join_availability, uplink_availability,
};
use crate::presentation::{PresentationState, TreeLevel};
use crate::store::FleetSnapshot;

pub const NO_SERVERS: &str = "No network servers";
pub const NO_GATEWAYS: &str = "No gateways";
pub const NO_DEVICES: &str = "No devices";

/// The whole tree as it should be displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetView {
    pub servers: Vec<ServerView>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerView {
    pub name: String,
    pub kind: ServerKind,
    /// Upstream URL; sync is offered only when present.
    pub url: Option<String>,
    pub expanded: bool,
    pub gateways: GroupView<GatewayView>,
    pub devices: GroupView<DeviceView>,
}

impl ServerView {
    pub fn can_sync(&self) -> bool {
        self.url.is_some()
    }
}

/// A gateway or device group under a server.
///
/// `count` is always filled; `items` only when the server and the group
/// are both expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView<T> {
    pub expanded: bool,
    pub count: usize,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayView {
    pub eui: String,
    pub status: GatewayStatus,
    pub action: GatewayAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    pub deveui: String,
    pub devaddr: Option<String>,
    pub fcntup: u32,
    pub fcntdn: u32,
    pub join: Availability,
    pub uplink: Availability,
}

// ── Rendering ───────────────────────────────────────────────────────

/// Build the view for `snapshot` under `presentation`.
pub fn render(snapshot: &FleetSnapshot, presentation: &PresentationState) -> FleetView {
    FleetView {
        servers: snapshot
            .servers()
            .iter()
            .map(|server| render_server(snapshot, presentation, server))
            .collect(),
        refreshed_at: snapshot.refreshed_at(),
    }
}

fn render_server(
    snapshot: &FleetSnapshot,
    presentation: &PresentationState,
    server: &NetworkServer,
) -> ServerView {
    let name = server.name.as_str();
    let expanded = presentation.is_expanded(TreeLevel::Server, name);
    let gateways = snapshot.gateways_of(name);
    let devices = snapshot.devices_of(name);

    let gateways_expanded = presentation.is_expanded(TreeLevel::Gateways, name);
    let devices_expanded = presentation.is_expanded(TreeLevel::Devices, name);

    ServerView {
        name: server.name.clone(),
        kind: server.kind(),
        url: server.upstream_url().map(str::to_owned),
        expanded,
        gateways: GroupView {
            expanded: gateways_expanded,
            count: gateways.len(),
            items: if expanded && gateways_expanded {
                gateways.iter().map(render_gateway).collect()
            } else {
                Vec::new()
            },
        },
        devices: GroupView {
            expanded: devices_expanded,
            count: devices.len(),
            items: if expanded && devices_expanded {
                devices.iter().map(render_device).collect()
            } else {
                Vec::new()
            },
        },
    }
}

pub fn render_gateway(gateway: &Gateway) -> GatewayView {
    let status = GatewayStatus::of(gateway);
    GatewayView {
        eui: gateway.eui.clone(),
        status,
        action: status.primary_action(),
    }
}

pub fn render_device(device: &Device) -> DeviceView {
    DeviceView {
        deveui: device.deveui.clone(),
        devaddr: device.devaddr.as_ref().and_then(KeyMaterial::to_hex),
        fcntup: device.fcntup,
        fcntdn: device.fcntdn,
        join: join_availability(device),
        uplink: uplink_availability(device),
    }
}

// ── Flattening ──────────────────────────────────────────────────────

/// One visible line of the tree, for list-based front ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Row<'a> {
    Server(&'a ServerView),
    Group {
        server: &'a ServerView,
        level: TreeLevel,
    },
    Gateway {
        server: &'a str,
        gateway: &'a GatewayView,
    },
    Device {
        server: &'a str,
        device: &'a DeviceView,
    },
    Empty {
        depth: u8,
        text: &'static str,
    },
}

impl Row<'_> {
    /// Indentation level: servers 0, groups 1, items 2.
    pub fn depth(&self) -> u8 {
        match self {
            Self::Server(_) => 0,
            Self::Group { .. } => 1,
            Self::Gateway { .. } | Self::Device { .. } => 2,
            Self::Empty { depth, .. } => *depth,
        }
    }

    /// Server the row belongs to.
    pub fn server(&self) -> Option<&str> {
        match self {
            Self::Server(server) | Self::Group { server, .. } => Some(&server.name),
            Self::Gateway { server, .. } | Self::Device { server, .. } => Some(server),
            Self::Empty { .. } => None,
        }
    }
}

impl FleetView {
    /// Visible rows in display order.
    pub fn rows(&self) -> Vec<Row<'_>> {
        if self.servers.is_empty() {
            return vec![Row::Empty {
                depth: 0,
                text: NO_SERVERS,
            }];
        }

        let mut rows = Vec::new();
        for server in &self.servers {
            rows.push(Row::Server(server));
            if !server.expanded {
                continue;
            }

            rows.push(Row::Group {
                server,
                level: TreeLevel::Gateways,
            });
            if server.gateways.expanded {
                if server.gateways.items.is_empty() {
                    rows.push(Row::Empty {
                        depth: 2,
                        text: NO_GATEWAYS,
                    });
                }
                rows.extend(server.gateways.items.iter().map(|gateway| Row::Gateway {
                    server: &server.name,
                    gateway,
                }));
            }

            rows.push(Row::Group {
                server,
                level: TreeLevel::Devices,
            });
            if server.devices.expanded {
                if server.devices.items.is_empty() {
                    rows.push(Row::Empty {
                        depth: 2,
                        text: NO_DEVICES,
                    });
                }
                rows.extend(server.devices.items.iter().map(|device| Row::Device {
                    server: &server.name,
                    device,
                }));
            }
        }
        rows
    }

    pub fn server(&self, name: &str) -> Option<&ServerView> {
        self.servers.iter().find(|s| s.name == name)
    }
}
