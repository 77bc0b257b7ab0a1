//! Config subcommand handlers.

use std::io::{self, IsTerminal};

use dialoguer::Input;
use serde::Serialize;
use tabled::Tabled;

use lorasim_core::DEFAULT_BACKEND_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_backend() -> Result<String, CliError> {
    Input::new()
        .with_prompt("Simulator backend URL")
        .default(DEFAULT_BACKEND_URL.to_owned())
        .interact_text()
        .map_err(prompt_err)
}

#[derive(Serialize)]
struct ProfileSummary {
    name: String,
    backend: String,
    timeout: Option<u64>,
    default: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Backend")]
    backend: String,
    #[tabled(rename = "Timeout")]
    timeout: String,
    #[tabled(rename = "Default")]
    default: String,
}

impl From<&ProfileSummary> for ProfileRow {
    fn from(p: &ProfileSummary) -> Self {
        Self {
            name: p.name.clone(),
            backend: p.backend.clone(),
            timeout: p.timeout.map_or_else(|| "-".into(), |t| format!("{t}s")),
            default: if p.default { "*".into() } else { String::new() },
        }
    }
}

fn summaries(cfg: &Config) -> Vec<ProfileSummary> {
    let default = cfg.active_profile_name(None);
    cfg.profiles
        .iter()
        .map(|(name, p)| ProfileSummary {
            name: name.clone(),
            backend: p.backend.clone(),
            timeout: p.timeout,
            default: name == default,
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            name,
            backend,
            timeout,
        } => {
            let backend = match backend {
                Some(url) => url,
                None if io::stdin().is_terminal() => prompt_backend()?,
                None => DEFAULT_BACKEND_URL.to_owned(),
            };
            let profile = Profile { backend, timeout };
            // Validate before writing anything.
            let mut cfg = config::load_config()?;
            lorasim_config::profile_to_controller_config(&cfg, &profile)?;

            if cfg.profiles.is_empty() {
                cfg.default_profile = Some(name.clone());
            }
            cfg.profiles.insert(name.clone(), profile);
            let path = config::save_config(&cfg)?;
            output::print_status(
                &format!("Profile '{name}' written to {}", path.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let list = summaries(&cfg);
            let out = output::render_list(
                global.output,
                &list,
                |p| ProfileRow::from(p),
                |p| p.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetDefault { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_status(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_marked() {
        let mut cfg = Config {
            default_profile: Some("lab".into()),
            ..Config::default()
        };
        cfg.profiles.insert("lab".into(), Profile::default());
        cfg.profiles.insert("ci".into(), Profile::default());

        let list = summaries(&cfg);
        let marked: Vec<&str> = list
            .iter()
            .filter(|p| p.default)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(marked, vec!["lab"]);
    }
}
