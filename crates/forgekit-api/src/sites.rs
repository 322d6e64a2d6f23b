// Site endpoints, scoped under a server.

use tracing::debug;

use crate::client::ForgeClient;
use crate::error::Error;
use crate::ids::{ServerId, SiteId};
use crate::models::{CreateSite, Site, SiteEnvelope, UpdateSite, UpdateSitePhp};

impl ForgeClient {
    /// `GET /servers/{server}/sites/{site}`
    pub async fn get_site(&self, server: ServerId, site: SiteId) -> Result<Site, Error> {
        debug!(%server, %site, "fetching site");
        let env: SiteEnvelope = self.get(&format!("servers/{server}/sites/{site}")).await?;
        Ok(env.site)
    }

    /// `POST /servers/{server}/sites`
    pub async fn create_site(&self, server: ServerId, req: &CreateSite) -> Result<Site, Error> {
        debug!(%server, domain = %req.domain, "creating site");
        let env: SiteEnvelope = self.post(&format!("servers/{server}/sites"), req).await?;
        Ok(env.site)
    }

    /// `PUT /servers/{server}/sites/{site}`
    pub async fn update_site(
        &self,
        server: ServerId,
        site: SiteId,
        req: &UpdateSite,
    ) -> Result<Site, Error> {
        debug!(%server, %site, "updating site");
        let env: SiteEnvelope = self
            .put(&format!("servers/{server}/sites/{site}"), req)
            .await?;
        Ok(env.site)
    }

    /// Switch the site's PHP version, then re-read the site.
    ///
    /// `PUT /servers/{server}/sites/{site}/php` answers without a usable
    /// body, so the fresh state comes from a follow-up `GET`.
    pub async fn update_site_php(
        &self,
        server: ServerId,
        site: SiteId,
        req: &UpdateSitePhp,
    ) -> Result<Site, Error> {
        debug!(%server, %site, version = %req.version, "switching site php version");
        self.put_empty(&format!("servers/{server}/sites/{site}/php"), req)
            .await?;
        self.get_site(server, site).await
    }

    /// `DELETE /servers/{server}/sites/{site}`
    pub async fn delete_site(&self, server: ServerId, site: SiteId) -> Result<(), Error> {
        debug!(%server, %site, "deleting site");
        self.delete(&format!("servers/{server}/sites/{site}")).await
    }
}
