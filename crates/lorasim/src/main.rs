//! `lorasim` binary: argument parsing, logging, exit codes.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lorasim_core::Controller;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.global);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = u8::try_from(err.exit_code()).unwrap_or(1);
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so structured output on stdout stays parseable.
/// `RUST_LOG` wins over `-v`/`-q` when set.
fn init_tracing(global: &GlobalOpts) {
    let level = match (global.quiet, global.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lorasim={level},lorasim_core={level},lorasim_api={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;
    match command {
        Command::Config(args) => commands::config_cmd::handle(args, &global),
        Command::Completions(args) => {
            commands::completions(args.shell);
            Ok(())
        }
        command => {
            let controller = connect(&global)?;
            debug!(?command, backend = %controller.config().url, "dispatching");
            commands::dispatch(command, &controller, &global).await
        }
    }
}

/// Controller for the selected profile with flag overrides applied.
fn connect(global: &GlobalOpts) -> Result<Controller, CliError> {
    let cfg = config::load_config()?;
    let controller_config = config::resolve(global, &cfg)?;
    Ok(Controller::new(controller_config)?)
}
