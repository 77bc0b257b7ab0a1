// ── Presentation state ──
//
// Which parts of the fleet tree are expanded. Keyed by server name and
// owned by the front end. Refreshes never touch it, so a server that
// disappears and comes back keeps its expansion.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The three independently expandable nodes under each server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TreeLevel {
    /// The server node itself.
    Server,
    /// The server's gateway group.
    Gateways,
    /// The server's device group.
    Devices,
}

/// A set of expanded server names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet(HashSet<String>);

impl ExpansionSet {
    /// Flip membership of `name`, returning the new state.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.0.remove(name) {
            false
        } else {
            self.0.insert(name.to_owned());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn set(&mut self, name: &str, expanded: bool) {
        if expanded {
            self.0.insert(name.to_owned());
        } else {
            self.0.remove(name);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Expansion state for the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationState {
    servers: ExpansionSet,
    gateways: ExpansionSet,
    devices: ExpansionSet,
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one node, returning its new state. Other nodes are untouched.
    pub fn toggle(&mut self, level: TreeLevel, server: &str) -> bool {
        self.set_for(level).toggle(server)
    }

    pub fn is_expanded(&self, level: TreeLevel, server: &str) -> bool {
        self.set_of(level).contains(server)
    }

    pub fn set_expanded(&mut self, level: TreeLevel, server: &str, expanded: bool) {
        self.set_for(level).set(server, expanded);
    }

    /// Expand every node of every listed server.
    pub fn expand_all<'a>(&mut self, servers: impl IntoIterator<Item = &'a str>) {
        for name in servers {
            self.servers.set(name, true);
            self.gateways.set(name, true);
            self.devices.set(name, true);
        }
    }

    pub fn set_of(&self, level: TreeLevel) -> &ExpansionSet {
        match level {
            TreeLevel::Server => &self.servers,
            TreeLevel::Gateways => &self.gateways,
            TreeLevel::Devices => &self.devices,
        }
    }

    fn set_for(&mut self, level: TreeLevel) -> &mut ExpansionSet {
        match level {
            TreeLevel::Server => &mut self.servers,
            TreeLevel::Gateways => &mut self.gateways,
            TreeLevel::Devices => &mut self.devices,
        }
    }
}
