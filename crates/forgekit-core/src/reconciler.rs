// ── Reconciler ──
//
// Owns the transport handle and wait settings. Every lifecycle operation is
// an inherent method (see `resources/` and `resource.rs`) taking `&self`, so
// one reconciler can be shared by reference across any number of resources.

use tracing::debug;

use forgekit_api::ForgeClient;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::wait::WaitSettings;

/// Drives remote entities toward a desired state.
#[derive(Debug, Clone)]
pub struct Reconciler {
    pub(crate) client: ForgeClient,
    pub(crate) waits: WaitSettings,
}

impl Reconciler {
    /// Build the transport from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        debug!(base_url = %config.base_url, "building forge client");
        let client = ForgeClient::new(config.base_url.as_str(), &config.token, &config.transport())?;
        Ok(Self::with_client(client, config.waits.clone()))
    }

    /// Wrap an already-built client.
    pub fn with_client(client: ForgeClient, waits: WaitSettings) -> Self {
        Self { client, waits }
    }
}

/// Map a 404 to `None`; every other failure propagates.
pub(crate) fn absent_on_404<T>(result: Result<T, forgekit_api::Error>) -> Result<Option<T>, CoreError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => {
            debug!("remote entity is gone (404)");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
