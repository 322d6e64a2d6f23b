//! CLI configuration: thin wrapper around `forgekit_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--config,
//! --profile, --api-url, --api-token, --timeout, --output).

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use forgekit_core::ClientConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use forgekit_config::{Config, Profile};

/// Config file in effect: `--config` or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(forgekit_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(forgekit_config::load_config_from(&config_file(global))?)
}

pub fn save(global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    forgekit_config::save_config_to(cfg, &config_file(global))?;
    Ok(())
}

pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// `--output`, else the config default, else JSON.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or(OutputFormat::Json)
    })
}

/// Translate the active profile plus global flags into a `ClientConfig`.
///
/// An explicitly named profile must exist; the implicit default may be
/// missing, in which case flags and env vars carry everything.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let name = active_profile_name(global, cfg);
    let profile = match cfg.profiles.get(&name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
                name,
            });
        }
        None => Profile::default(),
    };

    let token = forgekit_config::resolve_api_token(&profile, &name, global.api_token.as_deref())?;
    let mut client = forgekit_config::profile_to_client_config(&profile, &cfg.defaults, token)?;

    if let Some(ref raw) = global.api_url {
        client.base_url = raw.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(profile = %name, base_url = %client.base_url, "resolved client config");
    Ok(client)
}
