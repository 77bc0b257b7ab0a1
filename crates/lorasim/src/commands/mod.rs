//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod gateways;
pub mod servers;
pub mod tree;
pub mod util;

use clap::CommandFactory;

use lorasim_core::Controller;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Servers(args) => servers::handle(controller, args, global).await,
        Command::Gateways(args) => gateways::handle(controller, args, global).await,
        Command::Devices(args) => devices::handle(controller, args, global).await,
        Command::Tree(args) => tree::handle(controller, &args, global).await,
        Command::Refresh => tree::refresh(controller, global).await,
        // Config and Completions never need a backend
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Write a completion script for `shell` to stdout.
pub fn completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "lorasim", &mut std::io::stdout());
}
