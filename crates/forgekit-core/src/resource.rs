// ── Attribute-level lifecycle ──
//
// The caller-facing surface: create/read/update/delete any supported kind
// from plain attributes. Field tables per kind decide which changes can be
// applied in place and which force a replacement.

use std::collections::BTreeSet;

use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use tracing::{debug, info, warn};

use forgekit_api::{
    CertificateId, DaemonId, JobId, KeyId, RedirectRuleId, ServerId, SiteId,
};

use crate::attributes::Attributes;
use crate::convert;
use crate::error::CoreError;
use crate::reconciler::Reconciler;

/// Every resource type forgekit manages.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceKind {
    Server,
    Site,
    Key,
    ScheduledJob,
    Daemon,
    Certificate,
    RedirectRule,
}

impl ResourceKind {
    /// Fields the caller may set.
    pub fn input_fields(self) -> &'static [&'static str] {
        match self {
            Self::Server => &[
                "provider",
                "credential_id",
                "type",
                "name",
                "region",
                "ubuntu_version",
                "php_version",
                "ip_address",
                "private_ip_address",
                "network",
                "ocean2_vpc_uuid",
                "opcache",
            ],
            Self::Site => &[
                "server_id",
                "domain",
                "project_type",
                "directory",
                "username",
                "php_version",
                "aliases",
                "wildcards",
            ],
            Self::Key => &["server_id", "name", "username", "public_key", "overwrite"],
            Self::ScheduledJob => &[
                "server_id", "command", "frequency", "user", "minute", "hour", "day", "month",
                "weekday",
            ],
            Self::Daemon => &[
                "server_id",
                "command",
                "user",
                "directory",
                "processes",
                "start_secs",
                "stop_wait_secs",
                "stop_signal",
            ],
            Self::Certificate => &[
                "server_id",
                "site_id",
                "type",
                "certificate_id",
                "certificate",
                "key",
                "domains",
                "dns_provider",
                "token",
                "activate",
                "keep_existing_on_delete",
            ],
            Self::RedirectRule => &["server_id", "site_id", "from", "to", "type"],
        }
    }

    /// Fields only the remote sets.
    pub fn computed_fields(self) -> &'static [&'static str] {
        match self {
            Self::Server => &[
                "id",
                "is_ready",
                "provision_command",
                "sudo_password",
                "public_key",
            ],
            Self::Site => &["id", "name", "status"],
            Self::Key => &["id", "status"],
            Self::ScheduledJob => &["id", "cron", "status", "created_at"],
            Self::Daemon => &["id", "status", "created_at"],
            Self::Certificate => &[
                "id",
                "status",
                "request_status",
                "created_at",
                "existing",
                "active",
            ],
            Self::RedirectRule => &["id", "created_at"],
        }
    }

    /// Optional inputs the remote fills in when the caller leaves them out.
    /// Reads write them back, so they only diff when `desired` names them.
    fn remote_defaulted_fields(self) -> &'static [&'static str] {
        match self {
            Self::Server => &["ip_address", "private_ip_address", "php_version"],
            Self::Site => &["directory", "username", "aliases", "wildcards"],
            Self::Key => &["username"],
            Self::Daemon => &[
                "directory",
                "processes",
                "start_secs",
                "stop_wait_secs",
                "stop_signal",
            ],
            Self::Certificate => &["domains"],
            Self::RedirectRule => &["type"],
            Self::ScheduledJob => &[],
        }
    }

    /// Changing any of these replaces the remote entity.
    pub fn immutable_fields(self) -> &'static [&'static str] {
        match self {
            Self::Server => &["provider", "type", "region"],
            Self::Site => &["server_id"],
            Self::Certificate => &[
                "server_id",
                "site_id",
                "type",
                "certificate_id",
                "certificate",
                "key",
                "domains",
            ],
            Self::Key => &["server_id", "name", "username", "public_key"],
            Self::ScheduledJob | Self::Daemon | Self::RedirectRule => self.input_fields(),
        }
    }

    /// Inputs with no in-place update endpoint; changes are accepted
    /// locally but never reach the remote.
    fn local_only_fields(self) -> &'static [&'static str] {
        match self {
            Self::Server => &["credential_id", "ubuntu_version", "php_version", "network", "ocean2_vpc_uuid"],
            Self::Site => &["project_type", "username"],
            Self::Key => &["overwrite"],
            Self::Certificate => &["dns_provider", "token", "activate", "keep_existing_on_delete"],
            _ => &[],
        }
    }

    /// Input fields that differ between `current` and `desired`.
    pub fn diff(self, current: &Attributes, desired: &Attributes) -> BTreeSet<String> {
        let computed = self.computed_fields();
        let defaulted = self.remote_defaulted_fields();
        current
            .changed_fields(desired)
            .into_iter()
            .filter(|f| !computed.contains(&f.as_str()))
            .filter(|f| desired.contains(f) || !defaulted.contains(&f.as_str()))
            .collect()
    }

    /// Whether `changed` touches a field that forces replacement.
    pub fn requires_replacement(self, changed: &BTreeSet<String>) -> bool {
        let immutable = self.immutable_fields();
        changed.iter().any(|f| immutable.contains(&f.as_str()))
    }

    fn warn_unknown_fields(self, attrs: &Attributes) {
        let inputs = self.input_fields();
        let computed = self.computed_fields();
        for (key, _) in attrs.iter() {
            if !inputs.contains(&key.as_str()) && !computed.contains(&key.as_str()) {
                warn!(kind = %self, field = %key, "unknown attribute ignored");
            }
        }
    }
}

fn vanished(kind: ResourceKind, attrs: &Attributes) -> CoreError {
    CoreError::Vanished {
        kind: kind.to_string(),
        id: attrs
            .string(Attributes::ID)
            .ok()
            .flatten()
            .unwrap_or_default(),
    }
}

impl Reconciler {
    /// Create the remote entity and return `desired` merged with the
    /// remote-assigned id and computed fields.
    pub async fn create(
        &self,
        kind: ResourceKind,
        desired: &Attributes,
    ) -> Result<Attributes, CoreError> {
        kind.warn_unknown_fields(desired);
        let mut state = desired.clone();
        state.clear_id();

        match kind {
            ResourceKind::Server => {
                let (req, opcache) = convert::server_request(desired)?;
                let provisioned = self.create_server(&req, opcache).await?;
                convert::write_provisioned(&mut state, &provisioned);
            }
            ResourceKind::Site => {
                let server: ServerId = desired.parse_id("server_id")?;
                let site = self.create_site(server, &convert::site_request(desired)?).await?;
                convert::write_site(&mut state, &site);
            }
            ResourceKind::Key => {
                let server: ServerId = desired.parse_id("server_id")?;
                let (req, overwrite) = convert::key_request(desired)?;
                let key = self.create_key(server, &req, overwrite).await?;
                convert::write_key(&mut state, &key);
            }
            ResourceKind::ScheduledJob => {
                let server: ServerId = desired.parse_id("server_id")?;
                let job = self.create_job(server, &convert::job_request(desired)?).await?;
                convert::write_job(&mut state, &job);
            }
            ResourceKind::Daemon => {
                let server: ServerId = desired.parse_id("server_id")?;
                let daemon = self
                    .create_daemon(server, &convert::daemon_request(desired)?)
                    .await?;
                convert::write_daemon(&mut state, &daemon);
            }
            ResourceKind::Certificate => {
                let server: ServerId = desired.parse_id("server_id")?;
                let site: SiteId = desired.parse_id("site_id")?;
                let (source, activate) = convert::certificate_source(desired)?;
                let cert = self
                    .create_certificate(server, site, &source, activate)
                    .await?;
                convert::write_certificate(&mut state, &cert);
            }
            ResourceKind::RedirectRule => {
                let server: ServerId = desired.parse_id("server_id")?;
                let site: SiteId = desired.parse_id("site_id")?;
                let rule = self
                    .create_redirect_rule(server, site, &convert::redirect_rule_request(desired)?)
                    .await?;
                convert::write_redirect_rule(&mut state, &rule);
            }
        }

        info!(%kind, id = ?state.get(Attributes::ID), "created");
        self.read(kind, &state)
            .await?
            .ok_or_else(|| vanished(kind, &state))
    }

    /// Refresh `current` from the remote. `None` means the entity no longer
    /// exists and the caller should forget its id.
    pub async fn read(
        &self,
        kind: ResourceKind,
        current: &Attributes,
    ) -> Result<Option<Attributes>, CoreError> {
        let mut state = current.clone();

        match kind {
            ResourceKind::Server => {
                let Some(server) = self.read_server(current.id()?).await? else {
                    return Ok(None);
                };
                convert::write_server(&mut state, &server);
            }
            ResourceKind::Site => {
                let server: ServerId = current.parse_id("server_id")?;
                let Some(site) = self.read_site(server, current.id::<SiteId>()?).await? else {
                    return Ok(None);
                };
                convert::write_site(&mut state, &site);
            }
            ResourceKind::Key => {
                let server: ServerId = current.parse_id("server_id")?;
                let Some(key) = self.read_key(server, current.id::<KeyId>()?).await? else {
                    return Ok(None);
                };
                convert::write_key(&mut state, &key);
            }
            ResourceKind::ScheduledJob => {
                let server: ServerId = current.parse_id("server_id")?;
                let Some(job) = self.read_job(server, current.id::<JobId>()?).await? else {
                    return Ok(None);
                };
                convert::write_job(&mut state, &job);
            }
            ResourceKind::Daemon => {
                let server: ServerId = current.parse_id("server_id")?;
                let Some(daemon) = self.read_daemon(server, current.id::<DaemonId>()?).await?
                else {
                    return Ok(None);
                };
                convert::write_daemon(&mut state, &daemon);
            }
            ResourceKind::Certificate => {
                let server: ServerId = current.parse_id("server_id")?;
                let site: SiteId = current.parse_id("site_id")?;
                let Some(cert) = self
                    .read_certificate(server, site, current.id::<CertificateId>()?)
                    .await?
                else {
                    return Ok(None);
                };
                convert::write_certificate(&mut state, &cert);
            }
            ResourceKind::RedirectRule => {
                let server: ServerId = current.parse_id("server_id")?;
                let site: SiteId = current.parse_id("site_id")?;
                let Some(rule) = self
                    .read_redirect_rule(server, site, current.id::<RedirectRuleId>()?)
                    .await?
                else {
                    return Ok(None);
                };
                convert::write_redirect_rule(&mut state, &rule);
            }
        }

        Ok(Some(state))
    }

    /// Move `current` to `desired`, replacing the entity when an immutable
    /// field changed and sending only changed fields otherwise.
    pub async fn update(
        &self,
        kind: ResourceKind,
        current: &Attributes,
        desired: &Attributes,
    ) -> Result<Attributes, CoreError> {
        kind.warn_unknown_fields(desired);
        let changed = kind.diff(current, desired);
        debug!(%kind, ?changed, "computed changes");

        if kind.requires_replacement(&changed) {
            info!(%kind, ?changed, "immutable field changed, replacing");
            self.delete(kind, current).await?;
            return self.create(kind, desired).await;
        }

        let mut state = current.clone();
        for field in &changed {
            if !desired.contains(field) {
                state.remove(field);
            }
        }
        state.merge(desired.clone());
        if let Some(id) = current.get(Attributes::ID) {
            state.set(Attributes::ID, id.clone());
        }

        let local_only = kind.local_only_fields();
        for field in changed.iter().filter(|f| local_only.contains(&f.as_str())) {
            warn!(%kind, %field, "field cannot be changed in place; remote keeps its value");
        }

        match kind {
            ResourceKind::Server if !changed.is_empty() => {
                let changes = convert::server_changes(desired, &changed)?;
                let server = self.update_server(current.id()?, &changes).await?;
                convert::write_server(&mut state, &server);
                Ok(state)
            }
            ResourceKind::Site if !changed.is_empty() => {
                let server: ServerId = current.parse_id("server_id")?;
                let changes = convert::site_changes(desired, &changed)?;
                let site = self
                    .update_site(server, current.id::<SiteId>()?, &changes)
                    .await?;
                convert::write_site(&mut state, &site);
                Ok(state)
            }
            _ => self
                .read(kind, &state)
                .await?
                .ok_or_else(|| vanished(kind, &state)),
        }
    }

    /// Remove the remote entity described by `current`.
    pub async fn delete(&self, kind: ResourceKind, current: &Attributes) -> Result<(), CoreError> {
        match kind {
            ResourceKind::Server => self.delete_server(current.id()?).await,
            ResourceKind::Site => {
                let server: ServerId = current.parse_id("server_id")?;
                self.delete_site(server, current.id()?).await
            }
            ResourceKind::Key => {
                let server: ServerId = current.parse_id("server_id")?;
                self.delete_key(server, current.id()?).await
            }
            ResourceKind::ScheduledJob => {
                let server: ServerId = current.parse_id("server_id")?;
                self.delete_job(server, current.id()?).await
            }
            ResourceKind::Daemon => {
                let server: ServerId = current.parse_id("server_id")?;
                self.delete_daemon(server, current.id()?).await
            }
            ResourceKind::Certificate => {
                let server: ServerId = current.parse_id("server_id")?;
                let site: SiteId = current.parse_id("site_id")?;
                let keep = current.bool_or("keep_existing_on_delete", false)?;
                self.delete_certificate(server, site, current.id()?, keep)
                    .await
            }
            ResourceKind::RedirectRule => {
                let server: ServerId = current.parse_id("server_id")?;
                let site: SiteId = current.parse_id("site_id")?;
                self.delete_redirect_rule(server, site, current.id()?).await
            }
        }
    }

    /// Read-only lookup by id for servers and sites. Unlike [`read`](Self::read),
    /// a missing entity is an error.
    pub async fn lookup(
        &self,
        kind: ResourceKind,
        query: &Attributes,
    ) -> Result<Attributes, CoreError> {
        match kind {
            ResourceKind::Server => {
                let server = self.lookup_server(query.id()?).await?;
                Ok(convert::server_lookup_attributes(&server))
            }
            ResourceKind::Site => {
                let server: ServerId = query.parse_id("server_id")?;
                let site = self.lookup_site(server, query.id()?).await?;
                let mut state = Attributes::new();
                state.set("server_id", server.get());
                convert::write_site(&mut state, &site);
                Ok(state)
            }
            other => Err(CoreError::attribute(
                "kind",
                format!("lookup is not available for {other}"),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn attrs(value: serde_json::Value) -> Attributes {
        Attributes::from_json(value).unwrap()
    }

    #[test]
    fn kinds_parse_from_kebab_case() {
        assert_eq!("scheduled-job".parse::<ResourceKind>().ok(), Some(ResourceKind::ScheduledJob));
        assert_eq!(ResourceKind::RedirectRule.to_string(), "redirect-rule");
        assert!("user".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn region_change_forces_server_replacement() {
        let current = attrs(json!({ "id": 1, "name": "web", "region": "ams3", "is_ready": true }));
        let desired = attrs(json!({ "name": "web", "region": "nyc1" }));
        let changed = ResourceKind::Server.diff(&current, &desired);
        assert_eq!(changed.iter().collect::<Vec<_>>(), ["region"]);
        assert!(ResourceKind::Server.requires_replacement(&changed));
    }

    #[test]
    fn name_change_is_in_place() {
        let current = attrs(json!({ "id": 1, "name": "web", "region": "ams3" }));
        let desired = attrs(json!({ "name": "api", "region": "ams3" }));
        let changed = ResourceKind::Server.diff(&current, &desired);
        assert!(!ResourceKind::Server.requires_replacement(&changed));
    }

    #[test]
    fn remote_defaulted_fields_do_not_diff_when_unset() {
        let current = attrs(json!({ "id": 1, "type": "clone", "certificate_id": 3, "domains": ["a.test"] }));
        let desired = attrs(json!({ "type": "clone", "certificate_id": 3 }));
        assert!(ResourceKind::Certificate.diff(&current, &desired).is_empty());
    }

    #[test]
    fn any_key_change_replaces() {
        let current = attrs(json!({ "id": 2, "server_id": 1, "name": "a", "public_key": "k" }));
        let desired = attrs(json!({ "server_id": 1, "name": "a", "public_key": "k2" }));
        let changed = ResourceKind::Key.diff(&current, &desired);
        assert!(ResourceKind::Key.requires_replacement(&changed));
    }

    #[test]
    fn key_overwrite_flag_is_local() {
        let current = attrs(json!({ "id": 2, "server_id": 1, "name": "a", "public_key": "k" }));
        let desired = attrs(json!({ "server_id": 1, "name": "a", "public_key": "k", "overwrite": true }));
        let changed = ResourceKind::Key.diff(&current, &desired);
        assert_eq!(changed.iter().collect::<Vec<_>>(), ["overwrite"]);
        assert!(!ResourceKind::Key.requires_replacement(&changed));
    }

    #[test]
    fn daemon_defaults_read_back_do_not_diff() {
        let current = attrs(json!({
            "id": 9, "server_id": 1, "command": "php artisan queue:work", "user": "forge",
            "processes": 1, "start_secs": 1, "stop_wait_secs": 5, "stop_signal": "SIGTERM",
            "status": "installed",
        }));
        let desired = attrs(json!({ "server_id": 1, "command": "php artisan queue:work", "user": "forge" }));
        assert!(ResourceKind::Daemon.diff(&current, &desired).is_empty());
    }

    #[test]
    fn numeric_strings_match_ints() {
        let current = attrs(json!({ "id": 2, "server_id": 1, "name": "a", "public_key": "k" }));
        let desired = attrs(json!({ "server_id": "1", "name": "a", "public_key": "k" }));
        assert!(ResourceKind::Key.diff(&current, &desired).is_empty());
    }

    #[test]
    fn explicit_daemon_setting_still_replaces() {
        let current = attrs(json!({ "id": 9, "server_id": 1, "command": "c", "user": "forge", "processes": 1 }));
        let desired = attrs(json!({ "server_id": 1, "command": "c", "user": "forge", "processes": 3 }));
        let changed = ResourceKind::Daemon.diff(&current, &desired);
        assert!(ResourceKind::Daemon.requires_replacement(&changed));
    }

    #[test]
    fn certificate_activation_flag_is_local() {
        let current = attrs(json!({ "id": 2, "type": "letsencrypt", "activate": true }));
        let desired = attrs(json!({ "type": "letsencrypt", "activate": false }));
        let changed = ResourceKind::Certificate.diff(&current, &desired);
        assert!(!ResourceKind::Certificate.requires_replacement(&changed));
    }
}
