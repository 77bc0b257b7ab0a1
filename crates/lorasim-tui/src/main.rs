//! `lorasim-tui`: interactive dashboard for a LoRaWAN test-fleet simulator.
//!
//! Shows every network server with collapsible gateway and device groups,
//! kept current by `lorasim-core`'s [`FleetStream`](lorasim_core::FleetStream).
//! Gateways can be connected or disconnected, devices joined or made to
//! send uplinks, and anything can be deleted after a y/n confirmation.
//!
//! Logs go to a file (default `/tmp/lorasim-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod create_form;
mod data_bridge;
mod fleet_tree;
mod theme;
mod tui;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lorasim_config::ConfigError;
use lorasim_core::{Controller, ControllerConfig};

use crate::app::App;

/// Terminal dashboard for a LoRaWAN test-fleet simulator.
#[derive(Parser, Debug)]
#[command(name = "lorasim-tui", version, about)]
struct Cli {
    /// Simulator backend URL (overrides the profile)
    #[arg(short = 'b', long, env = "LORASIM_BACKEND")]
    backend: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "LORASIM_PROFILE")]
    profile: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "LORASIM_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/lorasim-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; the returned guard must live until exit so the
/// non-blocking writer flushes.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("lorasim_tui={log_level},lorasim_core={log_level}"))
    });

    let log_dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("lorasim-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Backend configuration: flags over the selected profile over defaults.
fn controller_config(cli: &Cli) -> Result<ControllerConfig> {
    let cfg = lorasim_config::load_config()?;
    let name = cfg.active_profile_name(cli.profile.as_deref());

    let mut config = match cfg.resolve_profile(name) {
        Ok(profile) => lorasim_config::profile_to_controller_config(&cfg, &profile)?,
        Err(ConfigError::UnknownProfile { .. }) if cli.backend.is_some() => {
            ControllerConfig::local()?
        }
        Err(ConfigError::UnknownProfile { profile }) => {
            return Err(eyre!(
                "profile '{profile}' not found; create it with `lorasim config init --name {profile}`"
            ));
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref backend) = cli.backend {
        config.url = ControllerConfig::from_url_str(backend)?.url;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Some(Duration::from_secs(secs));
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let config = controller_config(&cli)?;
    info!(backend = %config.url, "starting lorasim-tui");

    let controller = Controller::new(config)?;
    App::new(controller).run().await
}
