//! Integration tests for the `lorasim` CLI binary.
//!
//! Argument parsing, help output and completions run without a backend;
//! the rest talk to a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `lorasim` binary with env isolation.
///
/// Clears all `LORASIM_*` env vars, points config directories at a
/// nonexistent path and gives the process a non-terminal stdin.
fn lorasim_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lorasim");
    cmd.env("HOME", "/tmp/lorasim-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/lorasim-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("LORASIM_PROFILE")
        .env_remove("LORASIM_BACKEND")
        .env_remove("LORASIM_OUTPUT")
        .env_remove("LORASIM_TIMEOUT")
        .env_remove("RUST_LOG")
        .write_stdin("");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/network-servers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "s1", "config": { "type": "generic" } },
            { "name": "cs", "config": { "type": "chirpstack", "url": "http://cs:8080", "apiKey": "secret-key" } }
        ])))
        .mount(&server)
        .await;
    for name in ["s1", "cs"] {
        Mock::given(method("GET"))
            .and(path(format!("/network-servers/{name}/gateways")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "eui": "0102030405060708", "discoveryState": "connected", "dataState": "connected" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/network-servers/{name}/devices")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
    }
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = lorasim_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    lorasim_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("LoRaWAN")
            .and(predicate::str::contains("servers"))
            .and(predicate::str::contains("gateways"))
            .and(predicate::str::contains("devices")),
    );
}

#[test]
fn test_version_flag() {
    lorasim_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lorasim"));
}

#[test]
fn test_completions_zsh() {
    lorasim_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_unreachable_backend_exit_code() {
    let output = lorasim_cmd()
        .args(["--backend", "http://127.0.0.1:9", "servers", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    let text = combined_output(&output);
    assert!(text.contains("127.0.0.1:9"), "{text}");
}

#[test]
fn test_unknown_profile_is_reported() {
    let output = lorasim_cmd()
        .args(["--profile", "nope", "servers", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Profile 'nope' not found"));
}

#[test]
fn test_invalid_gateway_eui_is_usage_error() {
    let output = lorasim_cmd()
        .args([
            "--backend",
            "http://127.0.0.1:9",
            "gateways",
            "create",
            "s1",
            "not-hex",
            "--discovery-uri",
            "ws://localhost:3001",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_delete_without_yes_refuses_non_interactive() {
    let output = lorasim_cmd()
        .args(["--backend", "http://127.0.0.1:9", "servers", "delete", "s1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

// ── Against a mocked backend ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_servers_list_json_hides_credentials() {
    let server = backend().await;
    let output = lorasim_cmd()
        .args(["--backend", &server.uri(), "-o", "json", "servers", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let list: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(list[0]["name"], "s1");
    assert_eq!(list[1]["kind"], "chirpstack");
    assert_eq!(list[1]["gateways"], 1);
    assert!(!stdout.contains("secret-key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tree_plain_lists_servers() {
    let server = backend().await;
    lorasim_cmd()
        .args(["--backend", &server.uri(), "-o", "plain", "tree"])
        .assert()
        .success()
        .stdout("s1\ncs\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expanded_tree_shows_gateway_action() {
    let server = backend().await;
    lorasim_cmd()
        .args(["--backend", &server.uri(), "tree", "--expand"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("0102030405060708  connected  [disconnect]")
                .and(predicate::str::contains("No devices")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_join_shows_backend_message() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/network-servers/s1/devices/0102030405060708/join"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "join already in progress" })),
        )
        .mount(&server)
        .await;

    let output = lorasim_cmd()
        .args([
            "--backend",
            &server.uri(),
            "devices",
            "join",
            "s1",
            "0102030405060708",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert!(
        combined_output(&output).contains("Error sending join: join already in progress"),
        "{}",
        combined_output(&output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_command_also_reports_failed_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/network-servers/s1/devices/0102030405060708/uplink"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "device not joined" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/network-servers"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let output = lorasim_cmd()
        .args([
            "--backend",
            &server.uri(),
            "devices",
            "uplink",
            "s1",
            "0102030405060708",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("Error sending uplink: device not joined"), "{text}");
    assert!(text.contains("Warning: refresh failed"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_reports_success() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/network-servers/cs/sync"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    lorasim_cmd()
        .args(["--backend", &server.uri(), "servers", "sync", "cs"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Successfully synced cs"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_then_profiles() {
    let home = tempfile::tempdir().unwrap();
    let run = |args: &[&str]| {
        let mut cmd = lorasim_cmd();
        cmd.env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path().join(".config"))
            .args(args);
        cmd
    };

    run(&["config", "init", "--name", "lab", "--backend", "http://lab:2208"])
        .assert()
        .success();
    run(&["-o", "plain", "config", "profiles"])
        .assert()
        .success()
        .stdout("lab\n");
    run(&["config", "set-default", "missing"]).assert().code(4);
}

#[test]
fn test_config_init_refuses_to_overwrite_malformed_file() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".config").join("lorasim");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    let original = "[profiles.prod]\nbackend = \"http://prod:2208\"\n[profiles.broken\n";
    std::fs::write(&path, original).unwrap();

    lorasim_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["config", "init", "--name", "ci", "--backend", "http://ci:2208"])
        .assert()
        .failure();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}
