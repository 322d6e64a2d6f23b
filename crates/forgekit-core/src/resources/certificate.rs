// SSL certificate lifecycle.
//
// Two independent transitions: the certificate is first issued/installed
// (`status → installed`), then, when activation is requested, activated
// (`active → true`). Activation never starts before installation finishes.

use tracing::{debug, info};

use forgekit_api::models::{
    Certificate, CloneCertificate, InstallExistingCertificate, ObtainLetsEncrypt,
};
use forgekit_api::{CertificateId, ServerId, SiteId};

use crate::error::CoreError;
use crate::reconciler::{Reconciler, absent_on_404};
use crate::resources::job::INSTALLED;
use crate::wait::{WaitPhase, wait_until};

/// How the certificate is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum CertificateSource {
    LetsEncrypt(ObtainLetsEncrypt),
    Clone(CloneCertificate),
    Existing(InstallExistingCertificate),
}

impl CertificateSource {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::LetsEncrypt(_) => "letsencrypt",
            Self::Clone(_) => "clone",
            Self::Existing(_) => "existing",
        }
    }
}

impl Reconciler {
    /// Obtain a certificate, wait for installation, then optionally activate
    /// it and wait for activation.
    pub async fn create_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        source: &CertificateSource,
        activate: bool,
    ) -> Result<Certificate, CoreError> {
        info!(%server, %site, kind = source.type_name(), activate, "creating certificate");
        let created = match source {
            CertificateSource::LetsEncrypt(req) => {
                self.client
                    .obtain_letsencrypt_certificate(server, site, req)
                    .await?
            }
            CertificateSource::Clone(req) => self.client.clone_certificate(server, site, req).await?,
            CertificateSource::Existing(req) => {
                self.client
                    .install_existing_certificate(server, site, req)
                    .await?
            }
        };
        let id = created.id;
        let client = &self.client;

        let installed = wait_until(
            self.waits.certificate_install,
            WaitPhase::CertificateInstall,
            move || client.get_certificate(server, site, id),
            |c: &Certificate| c.status.as_deref() == Some(INSTALLED),
        )
        .await?;
        info!(%server, %site, certificate = %id, "certificate installed");

        if !activate {
            debug!(certificate = %id, "activation not requested");
            return Ok(installed);
        }

        self.client.activate_certificate(server, site, id).await?;
        let active = wait_until(
            self.waits.certificate_activation,
            WaitPhase::CertificateActivation,
            move || client.get_certificate(server, site, id),
            |c: &Certificate| c.active,
        )
        .await?;
        info!(%server, %site, certificate = %id, "certificate active");
        Ok(active)
    }

    pub async fn read_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        certificate: CertificateId,
    ) -> Result<Option<Certificate>, CoreError> {
        absent_on_404(self.client.get_certificate(server, site, certificate).await)
    }

    /// Delete unless `keep_existing` asks to leave the remote certificate.
    pub async fn delete_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        certificate: CertificateId,
        keep_existing: bool,
    ) -> Result<(), CoreError> {
        if keep_existing {
            info!(%server, %site, %certificate, "keeping remote certificate");
            return Ok(());
        }
        info!(%server, %site, %certificate, "deleting certificate");
        Ok(self
            .client
            .delete_certificate(server, site, certificate)
            .await?)
    }
}
