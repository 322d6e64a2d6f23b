// SSL certificate endpoints, scoped under server + site.
//
// Three ways to obtain a certificate (Let's Encrypt, clone, install existing)
// all answer with a certificate in `installing` state. Activation is a
// separate body-less action.

use tracing::debug;

use crate::client::ForgeClient;
use crate::error::Error;
use crate::ids::{CertificateId, ServerId, SiteId};
use crate::models::{
    Certificate, CertificateEnvelope, CloneCertificate, InstallExistingCertificate,
    ObtainLetsEncrypt,
};

fn certificates_path(server: ServerId, site: SiteId) -> String {
    format!("servers/{server}/sites/{site}/certificates")
}

impl ForgeClient {
    /// `GET /servers/{server}/sites/{site}/certificates/{certificate}`
    pub async fn get_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        certificate: CertificateId,
    ) -> Result<Certificate, Error> {
        debug!(%server, %site, %certificate, "fetching certificate");
        let path = format!("{}/{certificate}", certificates_path(server, site));
        let env: CertificateEnvelope = self.get(&path).await?;
        Ok(env.certificate)
    }

    /// `POST .../certificates/letsencrypt`
    pub async fn obtain_letsencrypt_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        req: &ObtainLetsEncrypt,
    ) -> Result<Certificate, Error> {
        debug!(%server, %site, domains = ?req.domains, "requesting let's encrypt certificate");
        let path = format!("{}/letsencrypt", certificates_path(server, site));
        let env: CertificateEnvelope = self.post(&path, req).await?;
        Ok(env.certificate)
    }

    /// `POST .../certificates` with `type: clone`
    pub async fn clone_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        req: &CloneCertificate,
    ) -> Result<Certificate, Error> {
        debug!(%server, %site, source = %req.certificate_id, "cloning certificate");
        let env: CertificateEnvelope = self.post(&certificates_path(server, site), req).await?;
        Ok(env.certificate)
    }

    /// `POST .../certificates` with `type: existing`
    pub async fn install_existing_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        req: &InstallExistingCertificate,
    ) -> Result<Certificate, Error> {
        debug!(%server, %site, "installing existing certificate");
        let env: CertificateEnvelope = self.post(&certificates_path(server, site), req).await?;
        Ok(env.certificate)
    }

    /// `POST .../certificates/{certificate}/activate` (body-less)
    pub async fn activate_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        certificate: CertificateId,
    ) -> Result<(), Error> {
        debug!(%server, %site, %certificate, "activating certificate");
        let path = format!("{}/{certificate}/activate", certificates_path(server, site));
        self.post_empty(&path).await
    }

    /// `DELETE .../certificates/{certificate}`
    pub async fn delete_certificate(
        &self,
        server: ServerId,
        site: SiteId,
        certificate: CertificateId,
    ) -> Result<(), Error> {
        debug!(%server, %site, %certificate, "deleting certificate");
        let path = format!("{}/{certificate}", certificates_path(server, site));
        self.delete(&path).await
    }
}
