//! Configuration for the forgekit CLI and other embedders.
//!
//! TOML profiles, API token resolution (flag + env + keyring + plaintext),
//! and translation to `forgekit_core::ClientConfig`. The CLI layers its
//! global flags on top of what this crate resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use forgekit_core::ClientConfig;

/// Keyring service name; entries are `<profile>/api-token`.
pub const KEYRING_SERVICE: &str = "forgekit";

/// Checked after the profile's own `api_token_env`.
pub const TOKEN_ENV: &str = "FORGEKIT_API_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}
fn default_timeout() -> u64 {
    10
}

/// One Forge account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API root; the public Forge API when unset.
    pub api_url: Option<String>,

    /// Plaintext token. Prefer the keyring or an env var.
    pub api_token: Option<String>,

    /// Name of an environment variable holding the token.
    pub api_token_env: Option<String>,

    /// Request timeout override, seconds.
    pub timeout: Option<u64>,

    /// Sleep before retrying a 429, seconds.
    pub rate_limit_backoff: Option<u64>,
}

impl Config {
    /// Pick the named profile, else the default one.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name.to_owned(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config path (`~/.config/forgekit/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "forgekit", "forgekit").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("forgekit");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path plus `FORGEKIT_` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` plus `FORGEKIT_` env vars. A missing file yields the
/// defaults. Nested keys use a double underscore:
/// `FORGEKIT_PROFILES__DEFAULT__API_URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FORGEKIT_").split("__").ignore(&["api_token"]));

    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize to TOML and write `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-token"))
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_api_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

/// Resolve the API token: flag, profile env var, `FORGEKIT_API_TOKEN`,
/// keyring, then plaintext.
pub fn resolve_api_token(
    profile: &Profile,
    profile_name: &str,
    flag: Option<&str>,
) -> Result<SecretString, ConfigError> {
    resolve_api_token_with(profile, profile_name, flag, |name| std::env::var(name).ok())
}

/// [`resolve_api_token`] with an explicit environment lookup.
pub fn resolve_api_token_with(
    profile: &Profile,
    profile_name: &str,
    flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    if let Some(token) = flag {
        return Ok(SecretString::from(token.to_owned()));
    }

    if let Some(token) = profile.api_token_env.as_deref().and_then(&env) {
        debug!(profile = profile_name, "token from profile env var");
        return Ok(SecretString::from(token));
    }

    if let Some(token) = env(TOKEN_ENV) {
        debug!(profile = profile_name, "token from {TOKEN_ENV}");
        return Ok(SecretString::from(token));
    }

    if let Ok(secret) = keyring_entry(profile_name).and_then(|e| e.get_password()) {
        debug!(profile = profile_name, "token from keyring");
        return Ok(SecretString::from(secret));
    }

    if let Some(ref token) = profile.api_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile and an already-resolved token.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
    token: SecretString,
) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::new(token).map_err(|e| ConfigError::Validation {
        field: "api_url".into(),
        reason: e.to_string(),
    })?;

    if let Some(ref raw) = profile.api_url {
        config.base_url = raw.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }

    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    if let Some(secs) = profile.rate_limit_backoff {
        config.rate_limit_backoff = Duration::from_secs(secs);
    }

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            api_token: Some("plain".into()),
            api_token_env: Some("MY_FORGE_TOKEN".into()),
            ..Profile::default()
        }
    }

    fn expose(s: &SecretString) -> &str {
        secrecy::ExposeSecret::expose_secret(s)
    }

    #[test]
    fn flag_wins_over_everything() {
        let token =
            resolve_api_token_with(&profile(), "t", Some("flag"), |_| Some("env".into())).unwrap();
        assert_eq!(expose(&token), "flag");
    }

    #[test]
    fn profile_env_var_beats_global_env_var() {
        let token = resolve_api_token_with(&profile(), "t", None, |name| match name {
            "MY_FORGE_TOKEN" => Some("profile-env".into()),
            TOKEN_ENV => Some("global-env".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(expose(&token), "profile-env");
    }

    #[test]
    fn global_env_var_used_when_profile_var_unset() {
        let token = resolve_api_token_with(&profile(), "t", None, |name| {
            (name == TOKEN_ENV).then(|| "global-env".into())
        })
        .unwrap();
        assert_eq!(expose(&token), "global-env");
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile(Some("staging")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn client_config_applies_overrides() {
        let p = Profile {
            api_url: Some("https://forge.example.test/api/v1".into()),
            timeout: Some(45),
            rate_limit_backoff: Some(5),
            ..Profile::default()
        };
        let cfg = profile_to_client_config(&p, &Defaults::default(), SecretString::from("t")).unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://forge.example.test/api/v1");
        assert_eq!(cfg.timeout, Duration::from_secs(45));
        assert_eq!(cfg.rate_limit_backoff, Duration::from_secs(5));
    }

    #[test]
    fn client_config_defaults_to_public_api() {
        let cfg =
            profile_to_client_config(&Profile::default(), &Defaults::default(), SecretString::from("t"))
                .unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://forge.laravel.com/api/v1");
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.rate_limit_backoff, Duration::from_secs(30));
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let p = Profile {
            api_url: Some("not a url".into()),
            ..Profile::default()
        };
        let err = profile_to_client_config(&p, &Defaults::default(), SecretString::from("t"))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid api_url: invalid URL: not a url");
    }
}
