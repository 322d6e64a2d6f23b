#![allow(clippy::unwrap_used)]
// Config file loading and saving.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::{NamedTempFile, TempDir};

use forgekit_config::{Config, Profile, load_config_from, save_config_to};

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_profiles_load_from_toml() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
default_profile = "work"

[defaults]
output = "yaml"
timeout = 20

[profiles.work]
api_url = "https://forge.example.test/api/v1"
api_token_env = "WORK_FORGE_TOKEN"
rate_limit_backoff = 2
"#
    )
    .unwrap();

    let cfg = load_config_from(file.path()).unwrap();
    assert_eq!(cfg.defaults.output, "yaml");
    assert_eq!(cfg.defaults.timeout, 20);

    let (name, profile) = cfg.profile(None).unwrap();
    assert_eq!(name, "work");
    assert_eq!(
        profile,
        &Profile {
            api_url: Some("https://forge.example.test/api/v1".into()),
            api_token_env: Some("WORK_FORGE_TOKEN".into()),
            rate_limit_backoff: Some(2),
            ..Profile::default()
        }
    );
}

#[test]
fn test_save_then_load_keeps_profiles() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.profiles.insert(
        "default".into(),
        Profile {
            api_token: Some("plain".into()),
            timeout: Some(30),
            ..Profile::default()
        },
    );
    save_config_to(&cfg, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, cfg);
}

#[test]
fn test_malformed_toml_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[profiles.work\napi_url = 1").unwrap();
    assert!(load_config_from(file.path()).is_err());
}
