// Scheduled job lifecycle.
//
// Forge writes the crontab entry asynchronously; creation waits for the job
// status to reach `installed`.

use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use tracing::info;

use forgekit_api::models::{CreateJob, Job};
use forgekit_api::{JobId, ServerId};

use crate::error::CoreError;
use crate::reconciler::{Reconciler, absent_on_404};
use crate::wait::{WaitPhase, wait_until};

pub(crate) const INSTALLED: &str = "installed";

/// Accepted job frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum JobFrequency {
    Minutely,
    Hourly,
    Nightly,
    Weekly,
    Monthly,
    Reboot,
    Custom,
}

impl JobFrequency {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        raw.parse().map_err(|_| {
            CoreError::attribute(
                "frequency",
                format!(
                    "'{raw}' is not in list of accepted values. Please use one of: {}",
                    Self::VARIANTS.join(", ")
                ),
            )
        })
    }
}

impl Reconciler {
    /// Create a job and wait until it is installed.
    pub async fn create_job(&self, server: ServerId, req: &CreateJob) -> Result<Job, CoreError> {
        JobFrequency::parse(&req.frequency)?;
        info!(%server, command = %req.command, frequency = %req.frequency, "creating scheduled job");
        let created = self.client.create_job(server, req).await?;
        let id = created.id;

        let client = &self.client;
        let job = wait_until(
            self.waits.job,
            WaitPhase::JobInstall,
            move || client.get_job(server, id),
            |j: &Job| j.status.as_deref() == Some(INSTALLED),
        )
        .await?;
        info!(%server, job = %id, "scheduled job installed");
        Ok(job)
    }

    pub async fn read_job(&self, server: ServerId, job: JobId) -> Result<Option<Job>, CoreError> {
        absent_on_404(self.client.get_job(server, job).await)
    }

    pub async fn delete_job(&self, server: ServerId, job: JobId) -> Result<(), CoreError> {
        info!(%server, %job, "deleting scheduled job");
        Ok(self.client.delete_job(server, job).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_frequencies() {
        assert_eq!(JobFrequency::parse("nightly").ok(), Some(JobFrequency::Nightly));
        assert_eq!(JobFrequency::Custom.to_string(), "custom");
    }

    #[test]
    fn rejects_unknown_frequency_with_the_accepted_list() {
        let err = JobFrequency::parse("fortnightly").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid attribute 'frequency': 'fortnightly' is not in list of accepted values. \
             Please use one of: minutely, hourly, nightly, weekly, monthly, reboot, custom"
        );
    }
}
