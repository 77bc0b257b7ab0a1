//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use lorasim_core::{Command, CommandOutcome, Controller, CoreError, RefreshReport};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses rather than guessing.
pub fn confirm(prompt: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Confirm if needed, run the command, report the result.
pub async fn run_command(
    controller: &Controller,
    command: Command,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let label = command.to_string();
    if let Some(prompt) = command.confirmation_prompt() {
        if !confirm(&prompt, &label, global.yes)? {
            output::print_status("Aborted", global.quiet);
            return Ok(());
        }
    }

    let CommandOutcome {
        command,
        result,
        refresh,
    } = controller.execute(command).await;
    if let Err(err) = result {
        report_refresh_failure(&refresh, global);
        return Err(CliError::from_command(&command, err));
    }

    let message = command
        .success_message()
        .unwrap_or_else(|| format!("Done: {label}"));
    output::print_status(&message, global.quiet);
    report_refresh_failure(&refresh, global);
    Ok(())
}

/// A failed follow-up refresh is a warning, never the command's error.
fn report_refresh_failure(refresh: &Result<RefreshReport, CoreError>, global: &GlobalOpts) {
    if let Err(err) = refresh {
        tracing::warn!(error = %err, "refresh after command failed");
        output::print_status(
            &format!("Warning: refresh failed: {}", err.user_message()),
            global.quiet,
        );
    }
}

/// Refresh the whole fleet, with a spinner on interactive terminals.
pub async fn refresh(controller: &Controller, global: &GlobalOpts) -> Result<RefreshReport, CliError> {
    let spinner = (!global.quiet && io::stderr().is_terminal()).then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Loading fleet from {}", controller.config().url));
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    });

    let result = controller.refresh().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = result?;
    for failure in &report.failures {
        output::print_status(
            &format!(
                "warning: could not load server '{}': {}",
                failure.server, failure.message
            ),
            global.quiet,
        );
    }
    Ok(report)
}

/// A per-server fetch failed; a 404 means the server itself is unknown.
pub fn server_error(server: &str, err: CoreError) -> CliError {
    if err.is_not_found() {
        return CliError::NotFound {
            resource_type: "network server".into(),
            identifier: server.into(),
            list_command: "servers list".into(),
        };
    }
    err.into()
}

/// Split `KEY=VALUE` header arguments.
pub fn parse_headers(
    raw: &[String],
) -> Result<std::collections::BTreeMap<String, String>, CliError> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| CliError::Validation {
                    field: "header".into(),
                    reason: format!("expected KEY=VALUE, got '{pair}'"),
                })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn headers_split_on_first_equals() {
        let headers =
            parse_headers(&["Authorization=Bearer a=b".into(), " X-Id = 7 ".into()]).unwrap();
        assert_eq!(headers["Authorization"], "Bearer a=b");
        assert_eq!(headers["X-Id"], "7");
    }

    #[test]
    fn header_without_key_is_rejected() {
        assert!(parse_headers(&["=value".into()]).is_err());
        assert!(parse_headers(&["novalue".into()]).is_err());
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete?", "delete server s1", true).unwrap());
    }
}
