//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use forgekit_config::ConfigError;
use forgekit_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Forge at {url}")]
    #[diagnostic(
        code(forgekit::connection_failed),
        help("Check the API URL and your network.\nReason: {reason}")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to Forge timed out")]
    #[diagnostic(
        code(forgekit::timeout),
        help("Increase the timeout with --timeout or the profile's `timeout`.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Forge rejected the API token ({status})")]
    #[diagnostic(
        code(forgekit::auth_failed),
        help("Create a new token under Account > API in Forge, then run: forgekit config set-token")
    )]
    AuthFailed { status: u16 },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(forgekit::no_credentials),
        help(
            "Pass --api-token, set FORGEKIT_API_TOKEN, or run: forgekit config set-token"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{kind} '{id}' no longer exists")]
    #[diagnostic(
        code(forgekit::not_found),
        help("Forget its id and create it again if it is still wanted.")
    )]
    NotFound { kind: String, id: String },

    #[error("{message}")]
    #[diagnostic(code(forgekit::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(forgekit::api_error))]
    Api { message: String },

    /// Readiness polling gave up. The message is the phase's own wording.
    #[error("{message}")]
    #[diagnostic(
        code(forgekit::wait_timeout),
        help("Forge may still finish in the background; check the resource before retrying.")
    )]
    WaitTimeout { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(forgekit::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(forgekit::profile_not_found),
        help("Available profiles: {available}\nCreate one with: forgekit config init")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(forgekit::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(forgekit::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(forgekit::json))]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    #[diagnostic(code(forgekit::toml))]
    Toml(#[from] toml::de::Error),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout | Self::WaitTimeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::Json(_)
            | Self::Toml(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::RequestTimeout => CliError::Timeout,

            CoreError::Api {
                status: Some(status @ (401 | 403)),
                ..
            } => CliError::AuthFailed { status },

            CoreError::Api {
                message,
                status: Some(422),
                ..
            } => CliError::Conflict { message },

            CoreError::WaitTimeout { .. } => CliError::WaitTimeout {
                message: err.to_string(),
            },

            CoreError::Vanished { kind, id } => CliError::NotFound { kind, id },

            CoreError::Attribute { field, reason } => CliError::Validation { field, reason },

            CoreError::InvalidId(e) => CliError::Validation {
                field: "id".into(),
                reason: e.to_string(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            other => CliError::Api {
                message: other.to_string(),
            },
        }
    }
}
