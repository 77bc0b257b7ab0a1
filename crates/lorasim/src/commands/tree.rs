//! Fleet tree and refresh handlers.

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use lorasim_core::{Controller, FleetView, PresentationState, RefreshReport, Row, TreeLevel, render};

use crate::cli::{GlobalOpts, OutputFormat, TreeArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Tree ─────────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: &TreeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::refresh(controller, global).await?;
    let snapshot = controller.snapshot();

    let mut presentation = PresentationState::new();
    if args.expand {
        presentation.expand_all(snapshot.servers().iter().map(|s| s.name.as_str()));
    } else {
        for name in &args.servers {
            presentation.set_expanded(TreeLevel::Server, name, true);
        }
    }

    let mut view = render(&snapshot, &presentation);
    if !args.servers.is_empty() {
        view.servers.retain(|s| args.servers.contains(&s.name));
    }

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &view,
        |v| draw(v, color),
        |v| {
            v.servers
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Indented text rendering of the visible rows.
pub fn draw(view: &FleetView, color: bool) -> String {
    let mut out = String::new();
    for row in view.rows() {
        let indent = "  ".repeat(usize::from(row.depth()));
        let line = match row {
            Row::Server(s) => {
                let marker = if s.expanded { "▾" } else { "▸" };
                let name = if color {
                    s.name.bold().to_string()
                } else {
                    s.name.clone()
                };
                let mut line = format!(
                    "{marker} {name} ({})  {} gateways, {} devices",
                    s.kind, s.gateways.count, s.devices.count
                );
                if let Some(ref url) = s.url {
                    let _ = write!(line, "  -> {url}");
                }
                line
            }
            Row::Group { server, level } => {
                let (expanded, count) = match level {
                    TreeLevel::Gateways => (server.gateways.expanded, server.gateways.count),
                    _ => (server.devices.expanded, server.devices.count),
                };
                let marker = if expanded { "▾" } else { "▸" };
                format!("{marker} {level} ({count})")
            }
            Row::Gateway { gateway, .. } => format!(
                "{}  {}  [{}]",
                gateway.eui,
                output::paint_status(gateway.status, color),
                gateway.action.to_string().to_lowercase()
            ),
            Row::Device { device, .. } => format!(
                "{}  fcnt {}/{}  join: {}  uplink: {}",
                device.deveui,
                device.fcntup,
                device.fcntdn,
                output::paint_availability(device.join, color),
                output::paint_availability(device.uplink, color)
            ),
            Row::Empty { text, .. } => {
                if color {
                    text.dimmed().to_string()
                } else {
                    text.to_owned()
                }
            }
        };
        let _ = writeln!(out, "{indent}{line}");
    }
    out.trim_end().to_owned()
}

// ── Refresh ──────────────────────────────────────────────────────────

fn summary(report: &RefreshReport) -> String {
    let mut out = format!(
        "Loaded {} servers, {} gateways, {} devices",
        report.servers, report.gateways, report.devices
    );
    if report.is_partial() {
        let _ = write!(out, " ({} servers failed to load)", report.failures.len());
    }
    out
}

pub async fn refresh(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let report = util::refresh(controller, global).await?;
    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => summary(&report),
        _ => output::render_single(global.output, &report, summary, summary)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
