//! Network-server command handlers.

use serde::Serialize;
use tabled::Tabled;

use lorasim_core::{Command, Controller, FleetSnapshot, NewServer, ServerKind};

use crate::cli::{GlobalOpts, ServerType, ServersArgs, ServersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

/// What `servers list` shows; upstream credentials never leave the core.
#[derive(Serialize)]
struct ServerSummary {
    name: String,
    kind: ServerKind,
    url: Option<String>,
    gateways: usize,
    devices: usize,
}

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Upstream")]
    url: String,
    #[tabled(rename = "Gateways")]
    gateways: usize,
    #[tabled(rename = "Devices")]
    devices: usize,
}

impl From<&ServerSummary> for ServerRow {
    fn from(s: &ServerSummary) -> Self {
        Self {
            name: s.name.clone(),
            kind: s.kind.to_string(),
            url: s.url.clone().unwrap_or_else(|| "-".into()),
            gateways: s.gateways,
            devices: s.devices,
        }
    }
}

fn summaries(snapshot: &FleetSnapshot) -> Vec<ServerSummary> {
    snapshot
        .servers()
        .iter()
        .map(|s| ServerSummary {
            name: s.name.clone(),
            kind: s.kind(),
            url: s.upstream_url().map(str::to_owned),
            gateways: snapshot.gateways_of(&s.name).len(),
            devices: snapshot.devices_of(&s.name).len(),
        })
        .collect()
}

fn server_kind(kind: ServerType) -> ServerKind {
    match kind {
        ServerType::Generic => ServerKind::Generic,
        ServerType::Loriot => ServerKind::Loriot,
        ServerType::ChirpStack => ServerKind::ChirpStack,
        ServerType::Ttn => ServerKind::Ttn,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ServersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ServersCommand::List => {
            util::refresh(controller, global).await?;
            let list = summaries(&controller.snapshot());
            let out = output::render_list(
                global.output,
                &list,
                |s| ServerRow::from(s),
                |s| s.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServersCommand::Create {
            name,
            kind,
            url,
            auth_header,
            api_key,
        } => {
            let request = NewServer {
                name,
                kind: server_kind(kind),
                url,
                auth_header,
                api_key,
            }
            .validate()?;
            util::run_command(controller, Command::CreateServer(request), global).await
        }

        ServersCommand::Delete { name } => {
            util::run_command(controller, Command::DeleteServer { name }, global).await
        }

        ServersCommand::Sync { name } => {
            util::run_command(controller, Command::SyncServer { name }, global).await
        }
    }
}
