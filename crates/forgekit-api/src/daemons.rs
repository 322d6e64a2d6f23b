// Supervisor daemon endpoints, scoped under a server.

use tracing::debug;

use crate::client::ForgeClient;
use crate::error::Error;
use crate::ids::{DaemonId, ServerId};
use crate::models::{CreateDaemon, Daemon, DaemonEnvelope};

impl ForgeClient {
    /// `GET /servers/{server}/daemons/{daemon}`
    pub async fn get_daemon(&self, server: ServerId, daemon: DaemonId) -> Result<Daemon, Error> {
        debug!(%server, %daemon, "fetching daemon");
        let env: DaemonEnvelope = self
            .get(&format!("servers/{server}/daemons/{daemon}"))
            .await?;
        Ok(env.daemon)
    }

    /// `POST /servers/{server}/daemons`
    pub async fn create_daemon(&self, server: ServerId, req: &CreateDaemon) -> Result<Daemon, Error> {
        debug!(%server, command = %req.command, "creating daemon");
        let env: DaemonEnvelope = self.post(&format!("servers/{server}/daemons"), req).await?;
        Ok(env.daemon)
    }

    /// `DELETE /servers/{server}/daemons/{daemon}`
    pub async fn delete_daemon(&self, server: ServerId, daemon: DaemonId) -> Result<(), Error> {
        debug!(%server, %daemon, "deleting daemon");
        self.delete(&format!("servers/{server}/daemons/{daemon}"))
            .await
    }
}
