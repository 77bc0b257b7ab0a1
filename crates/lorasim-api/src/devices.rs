// Device endpoints
//
// `/network-servers/{name}/devices[/{eui}[/join|/uplink]]`

use tracing::debug;

use crate::client::FleetClient;
use crate::error::Error;
use crate::models::{CreateDeviceRequest, Device};
use crate::servers::SERVERS;

const DEVICES: &str = "devices";

impl FleetClient {
    /// List the devices registered under a server.
    ///
    /// `GET /network-servers/{name}/devices`
    pub async fn list_devices(&self, server: &str) -> Result<Vec<Device>, Error> {
        self.get_list(&[SERVERS, server, DEVICES]).await
    }

    /// `GET /network-servers/{name}/devices/{eui}`
    pub async fn get_device(&self, server: &str, eui: &str) -> Result<Option<Device>, Error> {
        self.get(&[SERVERS, server, DEVICES, eui]).await
    }

    /// Register a device.
    ///
    /// `POST /network-servers/{name}/devices` with
    /// `{deveui, joineui, appkey, devnonce}` plus any ABP fields.
    pub async fn create_device(
        &self,
        server: &str,
        req: &CreateDeviceRequest,
    ) -> Result<Option<Device>, Error> {
        debug!(server, deveui = %req.deveui, "creating device");
        self.post(&[SERVERS, server, DEVICES], req).await
    }

    /// `DELETE /network-servers/{name}/devices/{eui}`
    pub async fn delete_device(&self, server: &str, eui: &str) -> Result<(), Error> {
        debug!(server, eui, "deleting device");
        self.delete(&[SERVERS, server, DEVICES, eui]).await
    }

    /// Send a simulated join request.
    ///
    /// `POST /network-servers/{name}/devices/{eui}/join`
    pub async fn join_device(&self, server: &str, eui: &str) -> Result<(), Error> {
        debug!(server, eui, "sending join");
        self.post_action(&[SERVERS, server, DEVICES, eui, "join"])
            .await
    }

    /// Send a simulated uplink.
    ///
    /// `POST /network-servers/{name}/devices/{eui}/uplink`
    pub async fn uplink_device(&self, server: &str, eui: &str) -> Result<(), Error> {
        debug!(server, eui, "sending uplink");
        self.post_action(&[SERVERS, server, DEVICES, eui, "uplink"])
            .await
    }
}
