// Redirect rule endpoints, scoped under server + site.

use tracing::debug;

use crate::client::ForgeClient;
use crate::error::Error;
use crate::ids::{RedirectRuleId, ServerId, SiteId};
use crate::models::{CreateRedirectRule, RedirectRule, RedirectRuleEnvelope};

impl ForgeClient {
    /// `GET /servers/{server}/sites/{site}/redirect-rules/{rule}`
    pub async fn get_redirect_rule(
        &self,
        server: ServerId,
        site: SiteId,
        rule: RedirectRuleId,
    ) -> Result<RedirectRule, Error> {
        debug!(%server, %site, %rule, "fetching redirect rule");
        let env: RedirectRuleEnvelope = self
            .get(&format!("servers/{server}/sites/{site}/redirect-rules/{rule}"))
            .await?;
        Ok(env.redirect_rule)
    }

    /// `POST /servers/{server}/sites/{site}/redirect-rules`
    pub async fn create_redirect_rule(
        &self,
        server: ServerId,
        site: SiteId,
        req: &CreateRedirectRule,
    ) -> Result<RedirectRule, Error> {
        debug!(%server, %site, from = %req.from, to = %req.to, "creating redirect rule");
        let env: RedirectRuleEnvelope = self
            .post(&format!("servers/{server}/sites/{site}/redirect-rules"), req)
            .await?;
        Ok(env.redirect_rule)
    }

    /// `DELETE /servers/{server}/sites/{site}/redirect-rules/{rule}`
    pub async fn delete_redirect_rule(
        &self,
        server: ServerId,
        site: SiteId,
        rule: RedirectRuleId,
    ) -> Result<(), Error> {
        debug!(%server, %site, %rule, "deleting redirect rule");
        self.delete(&format!("servers/{server}/sites/{site}/redirect-rules/{rule}"))
            .await
    }
}
