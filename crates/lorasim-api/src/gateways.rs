// Gateway endpoints
//
// `/network-servers/{name}/gateways[/{eui}[/connect|/disconnect]]`

use tracing::debug;

use crate::client::FleetClient;
use crate::error::Error;
use crate::models::{CreateGatewayRequest, Gateway};
use crate::servers::SERVERS;

const GATEWAYS: &str = "gateways";

impl FleetClient {
    /// List the gateways registered under a server.
    ///
    /// `GET /network-servers/{name}/gateways`
    pub async fn list_gateways(&self, server: &str) -> Result<Vec<Gateway>, Error> {
        self.get_list(&[SERVERS, server, GATEWAYS]).await
    }

    /// `GET /network-servers/{name}/gateways/{eui}`
    pub async fn get_gateway(&self, server: &str, eui: &str) -> Result<Option<Gateway>, Error> {
        self.get(&[SERVERS, server, GATEWAYS, eui]).await
    }

    /// Register a gateway.
    ///
    /// `POST /network-servers/{name}/gateways` with `{eui, discoveryUri}`
    pub async fn create_gateway(
        &self,
        server: &str,
        req: &CreateGatewayRequest,
    ) -> Result<Option<Gateway>, Error> {
        debug!(server, eui = %req.eui, "creating gateway");
        self.post(&[SERVERS, server, GATEWAYS], req).await
    }

    /// `DELETE /network-servers/{name}/gateways/{eui}`
    pub async fn delete_gateway(&self, server: &str, eui: &str) -> Result<(), Error> {
        debug!(server, eui, "deleting gateway");
        self.delete(&[SERVERS, server, GATEWAYS, eui]).await
    }

    /// Start the gateway's discovery + data connections.
    ///
    /// `POST /network-servers/{name}/gateways/{eui}/connect`
    pub async fn connect_gateway(&self, server: &str, eui: &str) -> Result<(), Error> {
        debug!(server, eui, "connecting gateway");
        self.post_action(&[SERVERS, server, GATEWAYS, eui, "connect"])
            .await
    }

    /// `POST /network-servers/{name}/gateways/{eui}/disconnect`
    pub async fn disconnect_gateway(&self, server: &str, eui: &str) -> Result<(), Error> {
        debug!(server, eui, "disconnecting gateway");
        self.post_action(&[SERVERS, server, GATEWAYS, eui, "disconnect"])
            .await
    }
}
