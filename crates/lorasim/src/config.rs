//! CLI configuration: thin wrapper around `lorasim_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--backend`, `--profile`, `--timeout`).

use std::time::Duration;

use lorasim_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use lorasim_config::{
    Config, ConfigError, Profile, config_path, load_config, save_config,
};

/// Build a `ControllerConfig` from the config file, profile, and flags.
///
/// Precedence: `--backend` / `--timeout` flags, then the selected
/// profile, then built-in defaults. A named profile that does not exist
/// is an error unless `--backend` makes it irrelevant.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<ControllerConfig, CliError> {
    let name = cfg.active_profile_name(global.profile.as_deref());
    let profile = match cfg.resolve_profile(name) {
        Ok(profile) => profile,
        Err(ConfigError::UnknownProfile { .. }) if global.backend.is_some() => Profile::default(),
        Err(ConfigError::UnknownProfile { profile }) => {
            return Err(CliError::ProfileNotFound {
                name: profile,
                available: available_profiles(cfg),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut controller = lorasim_config::profile_to_controller_config(cfg, &profile)?;

    if let Some(ref backend) = global.backend {
        controller.url = backend.trim().parse().map_err(|_| CliError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {backend}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        controller.timeout = Some(Duration::from_secs(secs));
    }
    Ok(controller)
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
