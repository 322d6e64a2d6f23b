// ── Runtime client configuration ──
//
// Everything needed to talk to one Forge account. Built once by the caller
// (usually from a `forgekit-config` profile) and never mutated afterwards.
// Core never reads config files itself.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use forgekit_api::transport::{DEFAULT_RATE_LIMIT_BACKOFF, DEFAULT_TIMEOUT};
use forgekit_api::{DEFAULT_BASE_URL, TransportConfig};

use crate::error::CoreError;
use crate::wait::WaitSettings;

/// Connection and pacing settings for a [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root including the version prefix.
    pub base_url: Url,
    pub token: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Sleep before re-sending a rate-limited request.
    pub rate_limit_backoff: Duration,
    pub waits: WaitSettings,
}

impl ClientConfig {
    /// Production defaults against the public Forge API.
    pub fn new(token: SecretString) -> Result<Self, CoreError> {
        let base_url = Url::parse(DEFAULT_BASE_URL).map_err(|e| CoreError::Config {
            message: format!("Invalid URL: {e}"),
        })?;
        Ok(Self {
            base_url,
            token,
            timeout: DEFAULT_TIMEOUT,
            rate_limit_backoff: DEFAULT_RATE_LIMIT_BACKOFF,
            waits: WaitSettings::default(),
        })
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            rate_limit_backoff: self.rate_limit_backoff,
            ..TransportConfig::default()
        }
    }
}
