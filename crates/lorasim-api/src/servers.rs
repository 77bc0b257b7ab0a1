// Network-server endpoints
//
// `/network-servers` and `/network-servers/{name}[/sync]`

use tracing::debug;

use crate::client::FleetClient;
use crate::error::Error;
use crate::models::{CreateServerRequest, NetworkServer};

pub(crate) const SERVERS: &str = "network-servers";

impl FleetClient {
    /// List all network servers.
    ///
    /// `GET /network-servers`
    pub async fn list_servers(&self) -> Result<Vec<NetworkServer>, Error> {
        self.get_list(&[SERVERS]).await
    }

    /// Fetch one network server.
    ///
    /// `GET /network-servers/{name}`
    pub async fn get_server(&self, name: &str) -> Result<Option<NetworkServer>, Error> {
        self.get(&[SERVERS, name]).await
    }

    /// Create a network server connection.
    ///
    /// `POST /network-servers` with `{name, config}`
    pub async fn create_server(
        &self,
        req: &CreateServerRequest,
    ) -> Result<Option<NetworkServer>, Error> {
        debug!(name = %req.name, kind = %req.config.kind, "creating network server");
        self.post(&[SERVERS], req).await
    }

    /// Delete a network server and everything registered under it.
    ///
    /// `DELETE /network-servers/{name}`
    pub async fn delete_server(&self, name: &str) -> Result<(), Error> {
        debug!(name, "deleting network server");
        self.delete(&[SERVERS, name]).await
    }

    /// Resynchronise gateways and devices with the upstream server.
    ///
    /// `POST /network-servers/{name}/sync`
    pub async fn sync_server(&self, name: &str) -> Result<(), Error> {
        debug!(name, "syncing network server");
        self.post_action(&[SERVERS, name, "sync"]).await
    }
}
