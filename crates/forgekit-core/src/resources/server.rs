// Server lifecycle.
//
// Creation returns immediately with `is_ready: false`; the server is only
// usable once Forge flips the flag, which can take several minutes. A
// timed-out wait leaves the half-provisioned server in place.

use tracing::{debug, info};

use forgekit_api::ServerId;
use forgekit_api::models::{CreateServer, Server, UpdateServer};

use crate::error::CoreError;
use crate::reconciler::{Reconciler, absent_on_404};
use crate::wait::{WaitPhase, wait_until};

/// A ready server plus the one-time secrets from its creation response.
#[derive(Debug, Clone)]
pub struct ProvisionedServer {
    pub server: Server,
    pub provision_command: Option<String>,
    pub sudo_password: Option<String>,
}

/// In-place changes to an existing server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerChanges {
    /// Sent as a `PUT` when present.
    pub update: Option<UpdateServer>,
    /// Toggle OPcache when present.
    pub opcache: Option<bool>,
}

impl Reconciler {
    /// Create a server, wait until it is ready, then optionally enable OPcache.
    pub async fn create_server(
        &self,
        req: &CreateServer,
        opcache: bool,
    ) -> Result<ProvisionedServer, CoreError> {
        info!(name = %req.name, provider = %req.provider, "creating server");
        let created = self.client.create_server(req).await?;
        let id = created.server.id;

        let client = &self.client;
        let server = wait_until(
            self.waits.server,
            WaitPhase::ServerProvisioning,
            move || client.get_server(id),
            |s: &Server| s.is_ready,
        )
        .await?;
        info!(server = %id, "server is ready");

        if opcache {
            self.client.enable_opcache(id).await?;
        }

        Ok(ProvisionedServer {
            server,
            provision_command: created.provision_command,
            sudo_password: created.sudo_password,
        })
    }

    /// Current state, or `None` when the server no longer exists.
    pub async fn read_server(&self, id: ServerId) -> Result<Option<Server>, CoreError> {
        absent_on_404(self.client.get_server(id).await)
    }

    /// Strict lookup: any failure, 404 included, is an error.
    pub async fn lookup_server(&self, id: ServerId) -> Result<Server, CoreError> {
        Ok(self.client.get_server(id).await?)
    }

    /// Apply in-place changes, then return the refreshed server.
    pub async fn update_server(
        &self,
        id: ServerId,
        changes: &ServerChanges,
    ) -> Result<Server, CoreError> {
        if let Some(update) = &changes.update {
            info!(server = %id, "updating server");
            self.client.update_server(id, update).await?;
        }
        match changes.opcache {
            Some(true) => self.client.enable_opcache(id).await?,
            Some(false) => self.client.disable_opcache(id).await?,
            None => {}
        }
        Ok(self.client.get_server(id).await?)
    }

    /// Delete a server. A server that is already gone counts as deleted.
    pub async fn delete_server(&self, id: ServerId) -> Result<(), CoreError> {
        info!(server = %id, "deleting server");
        match self.client.delete_server(id).await {
            Err(e) if e.is_not_found() => {
                debug!(server = %id, "server already gone");
                Ok(())
            }
            other => Ok(other?),
        }
    }
}
