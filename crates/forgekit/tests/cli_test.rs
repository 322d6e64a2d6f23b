//! Integration tests for the `forgekit` CLI binary.
//!
//! Argument parsing, help output, config handling, and a few end-to-end
//! runs against a wiremock Forge.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// The `forgekit` binary with env isolation: no `FORGEKIT_*` variables and
/// a config path that never exists.
fn forgekit_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("forgekit");
    cmd.env("HOME", "/tmp/forgekit-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/forgekit-cli-test-nonexistent")
        .env("FORGEKIT_CONFIG", "/tmp/forgekit-cli-test-nonexistent/config.toml")
        .env_remove("FORGEKIT_PROFILE")
        .env_remove("FORGEKIT_API_URL")
        .env_remove("FORGEKIT_API_TOKEN")
        .env_remove("FORGEKIT_OUTPUT")
        .env_remove("FORGEKIT_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same, pointed at a mock Forge with a token.
fn forgekit_against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = forgekit_cmd();
    cmd.args([
        "--api-url",
        &format!("{}/api/v1", server.uri()),
        "--api-token",
        "test-token",
    ]);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn site_body() -> Value {
    json!({
        "site": {
            "id": 20, "name": "example.com", "username": "forge", "directory": "/public",
            "status": "installed", "project_type": "php",
        }
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = forgekit_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_lifecycle_commands() {
    forgekit_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("create")
            .and(predicate::str::contains("read"))
            .and(predicate::str::contains("update"))
            .and(predicate::str::contains("delete")),
    );
}

#[test]
fn test_version_flag() {
    forgekit_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("forgekit"));
}

#[test]
fn test_completions_zsh() {
    forgekit_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_unknown_kind_is_a_usage_error() {
    forgekit_cmd()
        .args(["read", "database", "-a", "id=1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("scheduled-job"));
}

#[test]
fn test_malformed_attribute_is_a_usage_error() {
    forgekit_cmd()
        .args(["--api-token", "t", "read", "site", "-a", "server_id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_fields_shows_replacement_columns() {
    forgekit_cmd()
        .args(["-o", "table", "fields", "key"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("public_key").and(predicate::str::contains("Change replaces")),
        );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    forgekit_cmd()
        .args(["--config", "/tmp/somewhere/forgekit.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/somewhere/forgekit.toml"));
}

#[test]
fn test_config_show_masks_tokens() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[profiles.default]\napi_token = \"super-secret\"\napi_token_env = \"FORGE_TOKEN\""
    )
    .unwrap();

    forgekit_cmd()
        .env("FORGEKIT_CONFIG", file.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("****")
                .and(predicate::str::contains("FORGE_TOKEN"))
                .and(predicate::str::contains("super-secret").not()),
        );
}

#[test]
fn test_unknown_profile_is_reported() {
    forgekit_cmd()
        .args(["--profile", "staging", "--api-token", "t", "read", "site", "-a", "id=1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("staging"));
}

// ── Against a mock Forge ────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_read_prints_refreshed_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/servers/1/sites/20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(site_body()))
        .expect(1)
        .mount(&server)
        .await;

    let output = forgekit_against(&server)
        .args(["-o", "json-compact", "read", "site", "-a", "id=20", "-a", "server_id=1"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let attrs: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(attrs["name"], "example.com");
    assert_eq!(attrs["directory"], "/public");
    assert_eq!(attrs["id"], 20);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_of_deleted_resource_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/servers/1/sites/20"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    forgekit_against(&server)
        .args(["read", "site", "-a", "id=20", "-a", "server_id=1"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("no longer exists"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_from_toml_file() {
    let server = MockServer::start().await;
    let rule = json!({ "redirect_rule": { "id": 8, "from": "/old", "to": "/new", "type": "permanent" } });
    Mock::given(method("POST"))
        .and(path("/api/v1/servers/1/sites/2/redirect-rules"))
        .and(body_json(json!({ "from": "/old", "to": "/new", "type": "permanent" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(rule.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/servers/1/sites/2/redirect-rules/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rule))
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "server_id = 1\nsite_id = 2\nfrom = \"/old\"\nto = \"/new\"").unwrap();

    forgekit_against(&server)
        .args(["-o", "plain", "create", "redirect-rule", "-a", "type=permanent", "-f"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("8\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_requires_yes_when_not_interactive() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    forgekit_against(&server)
        .args(["delete", "site", "-a", "id=20", "-a", "server_id=1"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/servers/1/sites/20"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    forgekit_against(&server)
        .args(["--yes", "delete", "site", "-a", "id=20", "-a", "server_id=1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted site 20"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_body_is_shown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/servers/1/sites/20"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    forgekit_against(&server)
        .args(["read", "site", "-a", "id=20", "-a", "server_id=1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("status: 500, body: upstream exploded"));
}
