// Supervisor daemon lifecycle. Creation waits for `installed`.

use tracing::info;

use forgekit_api::models::{CreateDaemon, Daemon};
use forgekit_api::{DaemonId, ServerId};

use crate::error::CoreError;
use crate::reconciler::{Reconciler, absent_on_404};
use crate::resources::job::INSTALLED;
use crate::wait::{WaitPhase, wait_until};

pub const DEFAULT_PROCESSES: u32 = 1;
pub const DEFAULT_START_SECS: u32 = 1;
pub const DEFAULT_STOP_WAIT_SECS: u32 = 10;
pub const DEFAULT_STOP_SIGNAL: &str = "SIGTERM";

impl Reconciler {
    pub async fn create_daemon(
        &self,
        server: ServerId,
        req: &CreateDaemon,
    ) -> Result<Daemon, CoreError> {
        info!(%server, command = %req.command, processes = req.processes, "creating daemon");
        let created = self.client.create_daemon(server, req).await?;
        let id = created.id;

        let client = &self.client;
        let daemon = wait_until(
            self.waits.daemon,
            WaitPhase::DaemonInstall,
            move || client.get_daemon(server, id),
            |d: &Daemon| d.status.as_deref() == Some(INSTALLED),
        )
        .await?;
        info!(%server, daemon = %id, "daemon installed");
        Ok(daemon)
    }

    pub async fn read_daemon(
        &self,
        server: ServerId,
        daemon: DaemonId,
    ) -> Result<Option<Daemon>, CoreError> {
        absent_on_404(self.client.get_daemon(server, daemon).await)
    }

    pub async fn delete_daemon(&self, server: ServerId, daemon: DaemonId) -> Result<(), CoreError> {
        info!(%server, %daemon, "deleting daemon");
        Ok(self.client.delete_daemon(server, daemon).await?)
    }
}
