// Redirect rule lifecycle. Rules apply synchronously and cannot be edited;
// any change replaces the rule.

use tracing::info;

use forgekit_api::models::{CreateRedirectRule, RedirectRule};
use forgekit_api::{RedirectRuleId, ServerId, SiteId};

use crate::error::CoreError;
use crate::reconciler::{Reconciler, absent_on_404};

/// Accepted values for a rule's `type`.
pub const REDIRECT_TYPES: [&str; 2] = ["redirect", "permanent"];

impl Reconciler {
    pub async fn create_redirect_rule(
        &self,
        server: ServerId,
        site: SiteId,
        req: &CreateRedirectRule,
    ) -> Result<RedirectRule, CoreError> {
        if let Some(kind) = &req.rule_type {
            if !REDIRECT_TYPES.contains(&kind.as_str()) {
                return Err(CoreError::attribute(
                    "type",
                    format!("'{kind}' is not one of: {}", REDIRECT_TYPES.join(", ")),
                ));
            }
        }
        info!(%server, %site, from = %req.from, to = %req.to, "creating redirect rule");
        Ok(self.client.create_redirect_rule(server, site, req).await?)
    }

    pub async fn read_redirect_rule(
        &self,
        server: ServerId,
        site: SiteId,
        rule: RedirectRuleId,
    ) -> Result<Option<RedirectRule>, CoreError> {
        absent_on_404(self.client.get_redirect_rule(server, site, rule).await)
    }

    pub async fn delete_redirect_rule(
        &self,
        server: ServerId,
        site: SiteId,
        rule: RedirectRuleId,
    ) -> Result<(), CoreError> {
        info!(%server, %site, %rule, "deleting redirect rule");
        Ok(self.client.delete_redirect_rule(server, site, rule).await?)
    }
}
