// Site lifecycle. Sites apply synchronously: no polling.

use tracing::info;

use forgekit_api::models::{CreateSite, Site, UpdateSite, UpdateSitePhp};
use forgekit_api::{ServerId, SiteId};

use crate::error::CoreError;
use crate::reconciler::{Reconciler, absent_on_404};

/// In-place changes to an existing site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteChanges {
    pub update: Option<UpdateSite>,
    /// New PHP version, applied through the dedicated endpoint.
    pub php_version: Option<String>,
}

impl Reconciler {
    pub async fn create_site(&self, server: ServerId, req: &CreateSite) -> Result<Site, CoreError> {
        info!(%server, domain = %req.domain, "creating site");
        Ok(self.client.create_site(server, req).await?)
    }

    pub async fn read_site(&self, server: ServerId, site: SiteId) -> Result<Option<Site>, CoreError> {
        absent_on_404(self.client.get_site(server, site).await)
    }

    /// Strict lookup: any failure, 404 included, is an error.
    pub async fn lookup_site(&self, server: ServerId, site: SiteId) -> Result<Site, CoreError> {
        Ok(self.client.get_site(server, site).await?)
    }

    /// Send only what changed, then return the refreshed site.
    pub async fn update_site(
        &self,
        server: ServerId,
        site: SiteId,
        changes: &SiteChanges,
    ) -> Result<Site, CoreError> {
        if let Some(update) = &changes.update {
            info!(%server, %site, "updating site");
            self.client.update_site(server, site, update).await?;
        }
        if let Some(version) = &changes.php_version {
            info!(%server, %site, %version, "switching php version");
            let req = UpdateSitePhp {
                version: version.clone(),
            };
            return Ok(self.client.update_site_php(server, site, &req).await?);
        }
        Ok(self.client.get_site(server, site).await?)
    }

    pub async fn delete_site(&self, server: ServerId, site: SiteId) -> Result<(), CoreError> {
        info!(%server, %site, "deleting site");
        Ok(self.client.delete_site(server, site).await?)
    }
}
