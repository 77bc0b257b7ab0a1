//! Device command handlers.

use tabled::Tabled;

use lorasim_core::view::render_device;
use lorasim_core::{Command, Controller, DeviceView, NewDevice, parse_devnonce};

use crate::cli::{DeviceCreateArgs, DeviceRef, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "DevEUI")]
    deveui: String,
    #[tabled(rename = "DevAddr")]
    devaddr: String,
    #[tabled(rename = "FCntUp")]
    fcntup: u32,
    #[tabled(rename = "FCntDn")]
    fcntdn: u32,
    #[tabled(rename = "Join")]
    join: String,
    #[tabled(rename = "Uplink")]
    uplink: String,
}

fn row(d: &DeviceView, color: bool) -> DeviceRow {
    DeviceRow {
        deveui: d.deveui.clone(),
        devaddr: d.devaddr.clone().unwrap_or_else(|| "-".into()),
        fcntup: d.fcntup,
        fcntdn: d.fcntdn,
        join: output::paint_availability(d.join, color),
        uplink: output::paint_availability(d.uplink, color),
    }
}

impl From<DeviceCreateArgs> for NewDevice {
    fn from(a: DeviceCreateArgs) -> Self {
        Self {
            deveui: a.deveui,
            joineui: a.joineui,
            appkey: a.appkey,
            devnonce: parse_devnonce(&a.devnonce),
            latitude: a.latitude,
            longitude: a.longitude,
            devaddr: a.devaddr,
            appskey: a.appskey,
            nwkskey: a.nwkskey,
            fcntup: a.fcntup,
            fcntdn: a.fcntdn,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List { server } => {
            let devices = controller
                .client()
                .list_devices(&server)
                .await
                .map_err(|e| util::server_error(&server, e.into()))?;
            let views: Vec<DeviceView> = devices.iter().map(render_device).collect();
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &views,
                |d| row(d, color),
                |d| d.deveui.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Create(create) => {
            let server = create.server.clone();
            let request = NewDevice::from(create).validate()?;
            util::run_command(controller, Command::CreateDevice { server, request }, global)
                .await
        }

        DevicesCommand::Delete(DeviceRef { server, eui }) => {
            util::run_command(controller, Command::DeleteDevice { server, eui }, global).await
        }

        DevicesCommand::Join(DeviceRef { server, eui }) => {
            util::run_command(controller, Command::JoinDevice { server, eui }, global).await
        }

        DevicesCommand::Uplink(DeviceRef { server, eui }) => {
            util::run_command(controller, Command::UplinkDevice { server, eui }, global).await
        }
    }
}
