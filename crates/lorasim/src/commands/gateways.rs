//! Gateway command handlers.

use tabled::Tabled;

use lorasim_core::view::render_gateway;
use lorasim_core::{Command, Controller, GatewayView, NewGateway};

use crate::cli::{GatewayRef, GatewaysArgs, GatewaysCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GatewayRow {
    #[tabled(rename = "EUI")]
    eui: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Action")]
    action: String,
}

fn row(g: &GatewayView, color: bool) -> GatewayRow {
    GatewayRow {
        eui: g.eui.clone(),
        status: output::paint_status(g.status, color),
        action: g.action.to_string().to_lowercase(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: GatewaysArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GatewaysCommand::List { server } => {
            let gateways = controller
                .client()
                .list_gateways(&server)
                .await
                .map_err(|e| util::server_error(&server, e.into()))?;
            let views: Vec<GatewayView> = gateways.iter().map(render_gateway).collect();
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &views,
                |g| row(g, color),
                |g| g.eui.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GatewaysCommand::Create {
            server,
            eui,
            discovery_uri,
            headers,
            latitude,
            longitude,
        } => {
            let request = NewGateway {
                eui,
                discovery_uri,
                headers: util::parse_headers(&headers)?,
                latitude,
                longitude,
            }
            .validate()?;
            util::run_command(controller, Command::CreateGateway { server, request }, global)
                .await
        }

        GatewaysCommand::Delete(GatewayRef { server, eui }) => {
            util::run_command(controller, Command::DeleteGateway { server, eui }, global).await
        }

        GatewaysCommand::Connect(GatewayRef { server, eui }) => {
            util::run_command(controller, Command::ConnectGateway { server, eui }, global).await
        }

        GatewaysCommand::Disconnect(GatewayRef { server, eui }) => {
            util::run_command(controller, Command::DisconnectGateway { server, eui }, global)
                .await
        }
    }
}
