// ── Controller abstraction ──
//
// Owns the backend client and the entity store. Refreshes pull the
// whole fleet tree; commands issue one REST call followed by a refresh,
// publishing their progress on a broadcast channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandEvent, CommandOutcome, CommandPhase};
use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::store::{EntityStore, FleetSnapshot, RefreshReport, SnapshotBuilder};
use crate::stream::FleetStream;

use lorasim_api::{FleetClient, TransportConfig};

const EVENT_CHANNEL_SIZE: usize = 64;

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. There is no connection
/// to establish: the backend is stateless REST, so a controller is
/// usable as soon as it is built.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    client: FleetClient,
    store: Arc<EntityStore>,
    event_tx: broadcast::Sender<CommandEvent>,
    next_command_id: AtomicU64,
}

impl Controller {
    /// Build a controller for the configured backend.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = FleetClient::new(config.url.as_str(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a controller around an existing client.
    pub fn with_client(config: ControllerConfig, client: FleetClient) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                store: Arc::new(EntityStore::new()),
                event_tx,
                next_command_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &FleetClient {
        &self.inner.client
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.inner.store
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Reload the whole fleet tree from the backend.
    ///
    /// Servers are walked in list order. For each, gateways and devices
    /// are fetched together; if either fails that server is shown with
    /// empty lists and the failure lands in the report. If the server
    /// list itself cannot be fetched the store is left as it was.
    ///
    /// A refresh that finishes after a newer one has started is
    /// discarded; the report says so via `applied`.
    pub async fn refresh(&self) -> Result<RefreshReport, CoreError> {
        let store = &self.inner.store;
        let client = &self.inner.client;
        let generation = store.begin_refresh();
        debug!(generation, "refresh started");

        let servers = client.list_servers().await.map_err(|e| {
            let err = CoreError::from(e);
            warn!(generation, error = %err, "server list fetch failed");
            err
        })?;

        let mut builder = SnapshotBuilder::new(generation, servers);
        for name in builder.server_names() {
            let (gateways, devices) =
                tokio::join!(client.list_gateways(&name), client.list_devices(&name));
            match (gateways, devices) {
                (Ok(gateways), Ok(devices)) => builder.insert(&name, gateways, devices),
                (Err(e), _) | (_, Err(e)) => {
                    let err = CoreError::from(e);
                    warn!(server = %name, error = %err, "fleet fetch failed, showing empty lists");
                    builder.degrade(&name, err.user_message());
                }
            }
        }

        let (snapshot, mut report) = builder.finish();
        report.applied = store.apply(snapshot);
        info!(
            generation,
            applied = report.applied,
            servers = report.servers,
            gateways = report.gateways,
            devices = report.devices,
            failures = report.failures.len(),
            "refresh finished"
        );
        Ok(report)
    }

    // ── Command execution ────────────────────────────────────────

    /// Run one command: issue the REST call, then refresh.
    ///
    /// The refresh runs whether or not the call succeeded; only a
    /// successful call reports the `Refreshing` phase.
    ///
    /// Confirmation of destructive commands is the caller's job; by the
    /// time a command reaches here the operator has agreed to it.
    pub async fn execute(&self, command: Command) -> CommandOutcome {
        let id = self.inner.next_command_id.fetch_add(1, Ordering::Relaxed);
        let label = command.to_string();
        self.emit(id, &label, CommandPhase::Pending);
        debug!(id, command = %label, "dispatching command");

        let result = self.dispatch(&command).await;
        match &result {
            Ok(()) => {
                self.emit(id, &label, CommandPhase::Succeeded);
                self.emit(id, &label, CommandPhase::Refreshing);
            }
            Err(err) => {
                let message = command.failure_message(err);
                warn!(id, command = %label, error = %err, "command failed");
                self.emit(id, &label, CommandPhase::Failed { message });
            }
        }
        let refresh = self.refresh().await;
        self.emit(id, &label, CommandPhase::Idle);

        CommandOutcome {
            command,
            result,
            refresh,
        }
    }

    async fn dispatch(&self, command: &Command) -> Result<(), CoreError> {
        let client = &self.inner.client;
        match command {
            Command::CreateServer(req) => client.create_server(req).await.map(drop)?,
            Command::DeleteServer { name } => client.delete_server(name).await?,
            Command::SyncServer { name } => client.sync_server(name).await?,
            Command::CreateGateway { server, request } => {
                client.create_gateway(server, request).await.map(drop)?;
            }
            Command::DeleteGateway { server, eui } => client.delete_gateway(server, eui).await?,
            Command::ConnectGateway { server, eui } => client.connect_gateway(server, eui).await?,
            Command::DisconnectGateway { server, eui } => {
                client.disconnect_gateway(server, eui).await?;
            }
            Command::CreateDevice { server, request } => {
                client.create_device(server, request).await.map(drop)?;
            }
            Command::DeleteDevice { server, eui } => client.delete_device(server, eui).await?,
            Command::JoinDevice { server, eui } => client.join_device(server, eui).await?,
            Command::UplinkDevice { server, eui } => client.uplink_device(server, eui).await?,
        }
        Ok(())
    }

    fn emit(&self, id: u64, label: &str, phase: CommandPhase) {
        // No subscribers is fine.
        let _ = self.inner.event_tx.send(CommandEvent {
            id,
            label: label.to_owned(),
            phase,
        });
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to command lifecycle events.
    pub fn command_events(&self) -> broadcast::Receiver<CommandEvent> {
        self.inner.event_tx.subscribe()
    }

    pub fn snapshot(&self) -> Arc<FleetSnapshot> {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> FleetStream {
        self.inner.store.subscribe()
    }
}
