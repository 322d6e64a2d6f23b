// Forge API wire types
//
// Every single-entity response is wrapped in an envelope keyed by a fixed
// name (`{"server": {...}}`, `{"key": {...}}`); list responses use the plural
// (`{"keys": [...]}`). Envelope structs below own those key names so endpoint
// methods can unwrap exactly one level. Entity fields use `#[serde(default)]`
// liberally because Forge omits or nulls fields depending on provider and
// provisioning stage.

use serde::{Deserialize, Serialize};

use crate::ids::{CertificateId, DaemonId, JobId, KeyId, RedirectRuleId, ServerId, SiteId};

// ── Server ───────────────────────────────────────────────────────────

/// Server as returned by `GET /servers/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: ServerId,
    #[serde(default)]
    pub credential_id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub server_type: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub ubuntu_version: Option<String>,
    #[serde(default)]
    pub db_status: Option<String>,
    #[serde(default)]
    pub redis_status: Option<String>,
    #[serde(default)]
    pub php_version: Option<String>,
    #[serde(default)]
    pub php_cli_version: Option<String>,
    #[serde(default)]
    pub database_type: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub ssh_port: Option<u16>,
    #[serde(default)]
    pub private_ip_address: Option<String>,
    #[serde(default)]
    pub local_public_key: Option<String>,
    #[serde(default)]
    pub blackfire_status: Option<String>,
    #[serde(default)]
    pub papertrail_status: Option<String>,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Flips `false → true` once provisioning completes.
    #[serde(default)]
    pub is_ready: bool,
    /// Ids of servers this one may connect to.
    #[serde(default)]
    pub network: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ServerEnvelope {
    pub server: Server,
}

/// `POST /servers` response: the server plus one-time provisioning secrets.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerCreated {
    pub server: Server,
    #[serde(default)]
    pub provision_command: Option<String>,
    #[serde(default)]
    pub sudo_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateServer {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<u64>,
    #[serde(rename = "type")]
    pub server_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubuntu_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocean2_vpc_uuid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateServer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
}

// ── Site ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub wildcards: bool,
    /// Informational only; sites are usable as soon as they are created.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub php_version: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SiteEnvelope {
    pub site: Site,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateSite {
    pub domain: String,
    pub project_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php_version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub wildcards: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateSite {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    pub aliases: Vec<String>,
    pub wildcards: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateSitePhp {
    pub version: String,
}

// ── SSH key ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub id: KeyId,
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeyEnvelope {
    pub key: Key,
}

#[derive(Debug, Deserialize)]
pub struct KeyList {
    #[serde(default)]
    pub keys: Vec<Key>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateKey {
    pub name: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

// ── Scheduled job ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub cron: Option<String>,
    /// `installing` until the crontab entry lands, then `installed`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobEnvelope {
    pub job: Job,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateJob {
    pub command: String,
    pub frequency: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
}

// ── Daemon ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Daemon {
    pub id: DaemonId,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub processes: Option<u32>,
    #[serde(default, rename = "startsecs")]
    pub start_secs: Option<u32>,
    #[serde(default, rename = "stopwaitsecs")]
    pub stop_wait_secs: Option<u32>,
    #[serde(default, rename = "stopsignal")]
    pub stop_signal: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DaemonEnvelope {
    pub daemon: Daemon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateDaemon {
    pub command: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    pub processes: u32,
    #[serde(rename = "startsecs")]
    pub start_secs: u32,
    #[serde(rename = "stopwaitsecs")]
    pub stop_wait_secs: u32,
    #[serde(rename = "stopsignal")]
    pub stop_signal: String,
}

// ── SSL certificate ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    /// Comma-separated domain list.
    #[serde(default)]
    pub domain: String,
    #[serde(default, rename = "type")]
    pub certificate_type: Option<String>,
    #[serde(default)]
    pub request_status: Option<String>,
    /// `installing` until issued, then `installed`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub existing: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub activation_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Certificate {
    /// Split the comma-separated `domain` field.
    pub fn domains(&self) -> Vec<String> {
        self.domain
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct CertificateEnvelope {
    pub certificate: Certificate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsProvider {
    #[serde(rename = "type")]
    pub provider_type: String,
    #[serde(rename = "digitalocean_token")]
    pub token: String,
}

/// `POST .../certificates/letsencrypt`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObtainLetsEncrypt {
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_provider: Option<DnsProvider>,
}

/// `POST .../certificates` with `type: clone`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloneCertificate {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub certificate_id: CertificateId,
}

impl CloneCertificate {
    pub fn new(certificate_id: CertificateId) -> Self {
        Self {
            kind: "clone",
            certificate_id,
        }
    }
}

/// `POST .../certificates` with `type: existing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallExistingCertificate {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub certificate: String,
    pub key: String,
}

impl InstallExistingCertificate {
    pub fn new(certificate: String, key: String) -> Self {
        Self {
            kind: "existing",
            certificate,
            key,
        }
    }
}

// ── Redirect rule ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub id: RedirectRuleId,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default, rename = "type")]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedirectRuleEnvelope {
    pub redirect_rule: RedirectRule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRedirectRule {
    pub from: String,
    pub to: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn key_envelope_unwraps_one_level() {
        let env: KeyEnvelope =
            serde_json::from_str(r#"{"key":{"id":7,"name":"x","status":"installing"}}"#).unwrap();
        assert_eq!(env.key.id.get(), 7);
        assert_eq!(env.key.name, "x");
    }

    #[test]
    fn server_created_carries_provisioning_secrets() {
        let body = r#"{
            "server": {"id": 3, "name": "web", "is_ready": false},
            "provision_command": "curl …",
            "sudo_password": "hunter2"
        }"#;
        let created: ServerCreated = serde_json::from_str(body).unwrap();
        assert_eq!(created.server.id.get(), 3);
        assert!(!created.server.is_ready);
        assert_eq!(created.sudo_password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn server_tolerates_nulls() {
        let body = r#"{"id":1,"name":"a","ip_address":null,"network":[],"revoked":false}"#;
        let server: Server = serde_json::from_str(body).unwrap();
        assert_eq!(server.ip_address, None);
    }

    #[test]
    fn daemon_uses_supervisor_field_names() {
        let req = CreateDaemon {
            command: "php artisan queue:work".into(),
            user: "forge".into(),
            directory: None,
            processes: 1,
            start_secs: 1,
            stop_wait_secs: 10,
            stop_signal: "SIGTERM".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["startsecs"], 1);
        assert_eq!(json["stopwaitsecs"], 10);
        assert_eq!(json["stopsignal"], "SIGTERM");
        assert!(json.get("directory").is_none());
    }

    #[test]
    fn certificate_domains_split_on_commas() {
        let cert: Certificate =
            serde_json::from_str(r#"{"id":4,"domain":"a.test, b.test","active":true}"#).unwrap();
        assert_eq!(cert.domains(), ["a.test", "b.test"]);
        assert!(cert.active);
    }

    #[test]
    fn clone_request_is_tagged() {
        let req = CloneCertificate::new(CertificateId::new(12).unwrap());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"type": "clone", "certificate_id": 12}));
    }
}
