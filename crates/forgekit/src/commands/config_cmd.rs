//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};

use forgekit_core::DEFAULT_BASE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut masked = cfg.clone();
    for profile in masked.profiles.values_mut() {
        if profile.api_token.is_some() {
            profile.api_token = Some("****".into());
        }
    }
    masked
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<String, CliError> {
    let token = Password::new()
        .with_prompt("Forge API token")
        .interact()
        .map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "api_token".into(),
            reason: "API token cannot be empty".into(),
        });
    }
    Ok(token)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, mut cfg: Config) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_file(global);
            eprintln!("forgekit configuration");
            eprintln!("   Config path: {}\n", path.display());

            let name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(DEFAULT_BASE_URL.into())
                .interact_text()
                .map_err(prompt_err)?;

            let token = prompt_token()?;
            let choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let selection = Select::new()
                .with_prompt("Where to store the API token?")
                .items(choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let api_token = if selection == 0 {
                forgekit_config::store_api_token(&name, &token)?;
                eprintln!("   ✓ API token stored in system keyring");
                None
            } else {
                Some(token)
            };

            let profile = Profile {
                api_url: (api_url != DEFAULT_BASE_URL).then_some(api_url),
                api_token,
                ..Profile::default()
            };
            cfg.profiles.insert(name.clone(), profile);
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            config::save(global, &cfg)?;
            eprintln!("\n   ✓ Profile '{name}' saved to {}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let shown = toml::to_string_pretty(&redacted(&cfg))
                .map_err(forgekit_config::ConfigError::from)?;
            output::print_output(&shown, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_file(global).display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let active = config::active_profile_name(global, &cfg);
            let lines: Vec<String> = cfg
                .profiles
                .keys()
                .map(|name| {
                    let marker = if *name == active { "*" } else { " " };
                    format!("{marker} {name}")
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save(global, &cfg)?;
            eprintln!("Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken => {
            let name = config::active_profile_name(global, &cfg);
            let token = prompt_token()?;
            forgekit_config::store_api_token(&name, &token)?;
            eprintln!("API token for profile '{name}' stored in system keyring");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_token: Some("secret-token".into()),
                api_token_env: Some("FORGE_TOKEN".into()),
                ..Profile::default()
            },
        );
        let masked = redacted(&cfg);
        let profile = &masked.profiles["default"];
        assert_eq!(profile.api_token.as_deref(), Some("****"));
        assert_eq!(profile.api_token_env.as_deref(), Some("FORGE_TOKEN"));
    }
}
