// ── Attribute mapping ──
//
// Attributes → request structs on the way out, entities → attributes on the
// way back. Field names here are the caller-facing names; wire names live on
// the serde attributes in `forgekit_api::models`.

use std::collections::BTreeSet;

use forgekit_api::CertificateId;
use forgekit_api::models::{
    Certificate, CloneCertificate, CreateDaemon, CreateJob, CreateKey, CreateRedirectRule,
    CreateServer, CreateSite, Daemon, DnsProvider, InstallExistingCertificate, Job, Key,
    ObtainLetsEncrypt, RedirectRule, Server, Site, UpdateServer, UpdateSite,
};

use crate::attributes::Attributes;
use crate::error::CoreError;
use crate::resources::daemon::{
    DEFAULT_PROCESSES, DEFAULT_START_SECS, DEFAULT_STOP_SIGNAL, DEFAULT_STOP_WAIT_SECS,
};
use crate::resources::{CertificateSource, ProvisionedServer, ServerChanges, SiteChanges};

/// DNS providers Forge can use for Let's Encrypt DNS-01 challenges.
const DNS_PROVIDERS: [&str; 1] = ["digitalocean"];

fn network_ids(a: &Attributes) -> Result<Vec<u64>, CoreError> {
    a.strings("network")?
        .iter()
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| CoreError::attribute("network", format!("'{raw}' is not a server id")))
        })
        .collect()
}

fn any_changed(changed: &BTreeSet<String>, fields: &[&str]) -> bool {
    fields.iter().any(|f| changed.contains(*f))
}

// ── Server ───────────────────────────────────────────────────────────

/// Build the create request; the flag is whether to enable OPcache.
pub fn server_request(a: &Attributes) -> Result<(CreateServer, bool), CoreError> {
    let credential_id = a
        .int("credential_id")?
        .map(|i| {
            u64::try_from(i)
                .map_err(|_| CoreError::attribute("credential_id", format!("{i} is not a valid id")))
        })
        .transpose()?;
    let req = CreateServer {
        provider: a.require_string("provider")?,
        credential_id,
        server_type: a.require_string("type")?,
        name: a.require_string("name")?,
        region: a.string("region")?,
        ubuntu_version: a.string("ubuntu_version")?,
        php_version: a.string("php_version")?,
        ip_address: a.string("ip_address")?,
        private_ip_address: a.string("private_ip_address")?,
        network: network_ids(a)?,
        ocean2_vpc_uuid: a.string("ocean2_vpc_uuid")?,
    };
    Ok((req, a.bool_or("opcache", false)?))
}

pub fn server_changes(
    desired: &Attributes,
    changed: &BTreeSet<String>,
) -> Result<ServerChanges, CoreError> {
    let update = if any_changed(changed, &["name", "ip_address", "private_ip_address"]) {
        Some(UpdateServer {
            name: desired.string("name")?,
            ip_address: desired.string("ip_address")?,
            private_ip_address: desired.string("private_ip_address")?,
        })
    } else {
        None
    };
    let opcache = if changed.contains("opcache") {
        Some(desired.bool_or("opcache", false)?)
    } else {
        None
    };
    Ok(ServerChanges { update, opcache })
}

pub fn write_server(a: &mut Attributes, s: &Server) {
    a.set_id(s.id);
    a.set("name", s.name.as_str());
    a.set_opt("type", s.server_type.clone());
    a.set_opt("php_version", s.php_version.clone());
    a.set_opt("ip_address", s.ip_address.clone());
    a.set_opt("private_ip_address", s.private_ip_address.clone());
    a.set("is_ready", s.is_ready);
    a.set_opt("public_key", s.local_public_key.clone());
}

pub fn write_provisioned(a: &mut Attributes, p: &ProvisionedServer) {
    write_server(a, &p.server);
    a.set_opt("provision_command", p.provision_command.clone());
    a.set_opt("sudo_password", p.sudo_password.clone());
}

/// Every field Forge reports for a server, for read-only lookups.
pub fn server_lookup_attributes(s: &Server) -> Attributes {
    let mut a = Attributes::new();
    a.set_id(s.id);
    a.set("name", s.name.as_str());
    a.set_opt("credential_id", s.credential_id);
    a.set_opt("type", s.server_type.clone());
    a.set_opt("provider", s.provider.clone());
    a.set_opt("provider_id", s.provider_id.clone());
    a.set_opt("region", s.region.clone());
    a.set_opt("ubuntu_version", s.ubuntu_version.clone());
    a.set_opt("db_status", s.db_status.clone());
    a.set_opt("redis_status", s.redis_status.clone());
    a.set_opt("php_version", s.php_version.clone());
    a.set_opt("php_cli_version", s.php_cli_version.clone());
    a.set_opt("database_type", s.database_type.clone());
    a.set_opt("ip_address", s.ip_address.clone());
    a.set_opt("ssh_port", s.ssh_port);
    a.set_opt("private_ip_address", s.private_ip_address.clone());
    a.set_opt("local_public_key", s.local_public_key.clone());
    a.set_opt("blackfire_status", s.blackfire_status.clone());
    a.set_opt("papertrail_status", s.papertrail_status.clone());
    a.set("revoked", s.revoked);
    a.set_opt("created_at", s.created_at.clone());
    a.set("is_ready", s.is_ready);
    a.set("network", s.network.clone());
    a
}

// ── Site ─────────────────────────────────────────────────────────────

pub fn site_request(a: &Attributes) -> Result<CreateSite, CoreError> {
    Ok(CreateSite {
        domain: a.require_string("domain")?,
        project_type: a.require_string("project_type")?,
        directory: a.string("directory")?,
        username: a.string("username")?,
        php_version: a.string("php_version")?,
        aliases: a.strings("aliases")?,
        wildcards: a.bool_or("wildcards", false)?,
    })
}

pub fn site_changes(
    desired: &Attributes,
    changed: &BTreeSet<String>,
) -> Result<SiteChanges, CoreError> {
    let update = if any_changed(changed, &["domain", "directory", "aliases", "wildcards"]) {
        Some(UpdateSite {
            name: desired.require_string("domain")?,
            directory: desired.string("directory")?,
            aliases: desired.strings("aliases")?,
            wildcards: desired.bool_or("wildcards", false)?,
        })
    } else {
        None
    };
    let php_version = if changed.contains("php_version") {
        Some(desired.require_string("php_version")?)
    } else {
        None
    };
    Ok(SiteChanges {
        update,
        php_version,
    })
}

pub fn write_site(a: &mut Attributes, s: &Site) {
    a.set_id(s.id);
    a.set("name", s.name.as_str());
    a.set_opt("username", s.username.clone());
    a.set_opt("directory", s.directory.clone());
    a.set_opt("status", s.status.clone());
    a.set("wildcards", s.wildcards);
    if !s.aliases.is_empty() {
        a.set("aliases", s.aliases.clone());
    }
}

// ── SSH key ──────────────────────────────────────────────────────────

/// Build the create request; the flag is the overwrite opt-in.
pub fn key_request(a: &Attributes) -> Result<(CreateKey, bool), CoreError> {
    let req = CreateKey {
        name: a.require_string("name")?,
        key: a.require_string("public_key")?,
        username: a.string("username")?,
    };
    Ok((req, a.bool_or("overwrite", false)?))
}

pub fn write_key(a: &mut Attributes, k: &Key) {
    a.set_id(k.id);
    a.set("name", k.name.as_str());
    a.set_opt("username", k.username.clone());
    a.set_opt("status", k.status.clone());
}

// ── Scheduled job ────────────────────────────────────────────────────

pub fn job_request(a: &Attributes) -> Result<CreateJob, CoreError> {
    Ok(CreateJob {
        command: a.require_string("command")?,
        frequency: a.require_string("frequency")?,
        user: a.require_string("user")?,
        minute: a.string("minute")?,
        hour: a.string("hour")?,
        day: a.string("day")?,
        month: a.string("month")?,
        weekday: a.string("weekday")?,
    })
}

pub fn write_job(a: &mut Attributes, j: &Job) {
    a.set_id(j.id);
    a.set("command", j.command.as_str());
    // Forge capitalizes frequencies ("Nightly"); callers submit lowercase.
    a.set_opt("frequency", j.frequency.as_deref().map(str::to_lowercase));
    a.set_opt("user", j.user.clone());
    a.set_opt("cron", j.cron.clone());
    a.set_opt("status", j.status.clone());
    a.set_opt("created_at", j.created_at.clone());
}

// ── Daemon ───────────────────────────────────────────────────────────

pub fn daemon_request(a: &Attributes) -> Result<CreateDaemon, CoreError> {
    Ok(CreateDaemon {
        command: a.require_string("command")?,
        user: a.require_string("user")?,
        directory: a.string("directory")?,
        processes: a.u32_or("processes", DEFAULT_PROCESSES)?,
        start_secs: a.u32_or("start_secs", DEFAULT_START_SECS)?,
        stop_wait_secs: a.u32_or("stop_wait_secs", DEFAULT_STOP_WAIT_SECS)?,
        stop_signal: a
            .string("stop_signal")?
            .unwrap_or_else(|| DEFAULT_STOP_SIGNAL.to_owned()),
    })
}

pub fn write_daemon(a: &mut Attributes, d: &Daemon) {
    a.set_id(d.id);
    a.set("command", d.command.as_str());
    a.set_opt("user", d.user.clone());
    a.set_opt("directory", d.directory.clone());
    a.set_opt("processes", d.processes);
    a.set_opt("start_secs", d.start_secs);
    a.set_opt("stop_wait_secs", d.stop_wait_secs);
    a.set_opt("stop_signal", d.stop_signal.clone());
    a.set_opt("status", d.status.clone());
    a.set_opt("created_at", d.created_at.clone());
}

// ── SSL certificate ──────────────────────────────────────────────────

/// Build the certificate source; the flag is whether to activate it.
pub fn certificate_source(a: &Attributes) -> Result<(CertificateSource, bool), CoreError> {
    let kind = a.require_string("type")?.to_lowercase();
    let source = match kind.as_str() {
        "letsencrypt" => {
            let dns_provider = match (a.string("dns_provider")?, a.string("token")?) {
                (Some(provider), Some(token)) => {
                    let provider = provider.to_lowercase();
                    if !DNS_PROVIDERS.contains(&provider.as_str()) {
                        return Err(CoreError::attribute(
                            "dns_provider",
                            format!("'{provider}' is not one of: {}", DNS_PROVIDERS.join(", ")),
                        ));
                    }
                    Some(DnsProvider {
                        provider_type: provider,
                        token,
                    })
                }
                (None, None) => None,
                (Some(_), None) => {
                    return Err(CoreError::attribute("token", "is required with dns_provider"));
                }
                (None, Some(_)) => {
                    return Err(CoreError::attribute("dns_provider", "is required with token"));
                }
            };
            CertificateSource::LetsEncrypt(ObtainLetsEncrypt {
                domains: a.strings("domains")?,
                dns_provider,
            })
        }
        "clone" => CertificateSource::Clone(CloneCertificate::new(
            a.parse_id::<CertificateId>("certificate_id")?,
        )),
        "existing" => CertificateSource::Existing(InstallExistingCertificate::new(
            a.require_string("certificate")?,
            a.require_string("key")?,
        )),
        other => {
            return Err(CoreError::attribute(
                "type",
                format!("'{other}' is not one of: letsencrypt, clone, existing"),
            ));
        }
    };
    Ok((source, a.bool_or("activate", true)?))
}

pub fn write_certificate(a: &mut Attributes, c: &Certificate) {
    a.set_id(c.id);
    a.set("domains", c.domains());
    a.set_opt("status", c.status.clone());
    a.set_opt("request_status", c.request_status.clone());
    a.set_opt("created_at", c.created_at.clone());
    a.set("existing", c.existing);
    a.set("active", c.active);
}

// ── Redirect rule ────────────────────────────────────────────────────

pub fn redirect_rule_request(a: &Attributes) -> Result<CreateRedirectRule, CoreError> {
    Ok(CreateRedirectRule {
        from: a.require_string("from")?,
        to: a.require_string("to")?,
        rule_type: a.string("type")?,
    })
}

pub fn write_redirect_rule(a: &mut Attributes, r: &RedirectRule) {
    a.set_id(r.id);
    a.set("from", r.from.as_str());
    a.set("to", r.to.as_str());
    a.set_opt("type", r.rule_type.clone());
    a.set_opt("created_at", r.created_at.clone());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn attrs(value: serde_json::Value) -> Attributes {
        Attributes::from_json(value).unwrap()
    }

    #[test]
    fn daemon_defaults_fill_unset_fields() {
        let req = daemon_request(&attrs(json!({
            "command": "php artisan horizon",
            "user": "forge",
        })))
        .unwrap();
        assert_eq!(req.processes, 1);
        assert_eq!(req.start_secs, 1);
        assert_eq!(req.stop_wait_secs, 10);
        assert_eq!(req.stop_signal, "SIGTERM");
    }

    #[test]
    fn letsencrypt_requires_dns_provider_and_token_together() {
        let only_provider = attrs(json!({
            "type": "letsencrypt",
            "domains": ["a.test"],
            "dns_provider": "digitalocean",
        }));
        assert!(certificate_source(&only_provider).is_err());

        let both = attrs(json!({
            "type": "letsencrypt",
            "domains": ["a.test"],
            "dns_provider": "digitalocean",
            "token": "do-token",
        }));
        let (source, activate) = certificate_source(&both).unwrap();
        assert!(activate);
        match source {
            CertificateSource::LetsEncrypt(req) => {
                assert_eq!(req.domains, ["a.test"]);
                assert_eq!(req.dns_provider.unwrap().token, "do-token");
            }
            other => panic!("expected letsencrypt, got {other:?}"),
        }
    }

    #[test]
    fn clone_needs_a_certificate_id() {
        let err = certificate_source(&attrs(json!({ "type": "clone" }))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid attribute 'certificate_id': is required"
        );
    }

    #[test]
    fn unknown_certificate_type_is_rejected() {
        assert!(certificate_source(&attrs(json!({ "type": "selfsigned" }))).is_err());
    }

    #[test]
    fn site_update_only_when_relevant_fields_change() {
        let desired = attrs(json!({ "domain": "b.test", "php_version": "php83" }));
        let changed: BTreeSet<String> = ["php_version".to_owned()].into();
        let changes = site_changes(&desired, &changed).unwrap();
        assert_eq!(changes.update, None);
        assert_eq!(changes.php_version.as_deref(), Some("php83"));

        let changed: BTreeSet<String> = ["domain".to_owned()].into();
        let changes = site_changes(&desired, &changed).unwrap();
        assert_eq!(changes.update.unwrap().name, "b.test");
        assert_eq!(changes.php_version, None);
    }

    #[test]
    fn server_network_must_be_ids() {
        let bad = attrs(json!({
            "provider": "ocean2", "type": "app", "name": "web", "network": ["abc"],
        }));
        assert!(server_request(&bad).is_err());

        let good = attrs(json!({
            "provider": "ocean2", "type": "app", "name": "web", "network": [3, "4"], "opcache": true,
        }));
        let (req, opcache) = server_request(&good).unwrap();
        assert_eq!(req.network, [3, 4]);
        assert!(opcache);
    }

    #[test]
    fn job_frequency_reads_back_lowercase() {
        let job: Job = serde_json::from_value(json!({
            "id": 5, "command": "php artisan schedule:run", "frequency": "Nightly", "status": "installed",
        }))
        .unwrap();
        let mut a = Attributes::new();
        write_job(&mut a, &job);
        assert_eq!(a.string("frequency").unwrap().as_deref(), Some("nightly"));
    }
}
