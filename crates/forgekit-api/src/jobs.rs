// Scheduled job endpoints, scoped under a server.

use tracing::debug;

use crate::client::ForgeClient;
use crate::error::Error;
use crate::ids::{JobId, ServerId};
use crate::models::{CreateJob, Job, JobEnvelope};

impl ForgeClient {
    /// `GET /servers/{server}/jobs/{job}`
    pub async fn get_job(&self, server: ServerId, job: JobId) -> Result<Job, Error> {
        debug!(%server, %job, "fetching scheduled job");
        let env: JobEnvelope = self.get(&format!("servers/{server}/jobs/{job}")).await?;
        Ok(env.job)
    }

    /// `POST /servers/{server}/jobs`
    pub async fn create_job(&self, server: ServerId, req: &CreateJob) -> Result<Job, Error> {
        debug!(%server, frequency = %req.frequency, "creating scheduled job");
        let env: JobEnvelope = self.post(&format!("servers/{server}/jobs"), req).await?;
        Ok(env.job)
    }

    /// `DELETE /servers/{server}/jobs/{job}`
    pub async fn delete_job(&self, server: ServerId, job: JobId) -> Result<(), Error> {
        debug!(%server, %job, "deleting scheduled job");
        self.delete(&format!("servers/{server}/jobs/{job}")).await
    }
}
