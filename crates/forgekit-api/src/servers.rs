// Server endpoints
//
// Servers are the root of every scope chain. Creation answers immediately
// with `is_ready: false`; readiness polling lives in `forgekit-core`.

use tracing::debug;

use crate::client::ForgeClient;
use crate::error::Error;
use crate::ids::ServerId;
use crate::models::{CreateServer, Server, ServerCreated, ServerEnvelope, UpdateServer};

impl ForgeClient {
    /// `GET /servers/{id}`
    pub async fn get_server(&self, id: ServerId) -> Result<Server, Error> {
        debug!(server = %id, "fetching server");
        let env: ServerEnvelope = self.get(&format!("servers/{id}")).await?;
        Ok(env.server)
    }

    /// Request a new server.
    ///
    /// `POST /servers`. The returned envelope carries the provisioning
    /// command and sudo password, which Forge never returns again.
    pub async fn create_server(&self, req: &CreateServer) -> Result<ServerCreated, Error> {
        debug!(name = %req.name, provider = %req.provider, "creating server");
        self.post("servers", req).await
    }

    /// `PUT /servers/{id}`
    pub async fn update_server(&self, id: ServerId, req: &UpdateServer) -> Result<Server, Error> {
        debug!(server = %id, "updating server");
        let env: ServerEnvelope = self.put(&format!("servers/{id}"), req).await?;
        Ok(env.server)
    }

    /// `DELETE /servers/{id}`
    pub async fn delete_server(&self, id: ServerId) -> Result<(), Error> {
        debug!(server = %id, "deleting server");
        self.delete(&format!("servers/{id}")).await
    }

    /// `POST /servers/{id}/php/opcache`
    pub async fn enable_opcache(&self, id: ServerId) -> Result<(), Error> {
        debug!(server = %id, "enabling opcache");
        self.post_empty(&format!("servers/{id}/php/opcache")).await
    }

    /// `DELETE /servers/{id}/php/opcache`
    pub async fn disable_opcache(&self, id: ServerId) -> Result<(), Error> {
        debug!(server = %id, "disabling opcache");
        self.delete_empty(&format!("servers/{id}/php/opcache")).await
    }
}
