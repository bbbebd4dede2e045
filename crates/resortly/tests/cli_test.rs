//! Integration tests for the `resortly` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a server; catalog reads run against a wiremock backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NOWHERE: &str = "/tmp/resortly-cli-test-nonexistent";

/// Build a [`Command`] for the `resortly` binary with env isolation.
///
/// Clears all `RESORTLY_*` env vars and points config and data directories
/// at a nonexistent path so tests never see a real session or config.
fn resortly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("resortly");
    cmd.env("HOME", NOWHERE)
        .env("XDG_CONFIG_HOME", NOWHERE)
        .env("XDG_DATA_HOME", NOWHERE)
        .env_remove("RESORTLY_PROFILE")
        .env_remove("RESORTLY_API_URL")
        .env_remove("RESORTLY_OUTPUT")
        .env_remove("RESORTLY_TIMEOUT")
        .env_remove("RESORTLY_EMAIL")
        .env_remove("RESORTLY_PASSWORD")
        .env_remove("RESORTLY_MIDTRANS_CLIENT_KEY");
    cmd
}

/// A data directory holding a live session for the default profile.
fn signed_in_data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let sessions = dir.path().join("resortly").join("sessions");
    std::fs::create_dir_all(&sessions).unwrap();
    std::fs::write(
        sessions.join("default.toml"),
        "token = \"tok-cli\"\nexpires_at = \"2099-01-01T00:00:00Z\"\n",
    )
    .unwrap();
    dir
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = resortly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    resortly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("rooms")
            .and(predicate::str::contains("bookings"))
            .and(predicate::str::contains("cart"))
            .and(predicate::str::contains("pay")),
    );
}

#[test]
fn test_version_flag() {
    resortly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("resortly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    resortly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    resortly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = resortly_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = resortly_cmd()
        .args(["--output", "xml", "rooms", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cart_show_requires_login() {
    resortly_cmd()
        .args(["--api-url", "http://127.0.0.1:9", "cart", "show"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("login"));
}

#[test]
fn test_pay_without_session_requires_login() {
    resortly_cmd()
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "pay",
            "start",
            "room",
            "b-1",
        ])
        .assert()
        .code(3);
}

#[test]
fn test_unknown_profile_is_not_found() {
    resortly_cmd()
        .args(["--profile", "staging", "rooms", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_book_room_rejects_bad_date() {
    resortly_cmd()
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "bookings",
            "book-room",
            "--room",
            "r-1",
            "--check-in",
            "18/10/2026",
            "--check-out",
            "2026-10-20",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("check-in"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // Falls back to the default profile when no config file exists.
    resortly_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_url"));
}

#[test]
fn test_config_path_points_at_toml() {
    resortly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_and_show_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap();

    resortly_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args(["config", "set", "api-url", "https://resort.example.com"])
        .assert()
        .success();

    resortly_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://resort.example.com"));
}

// ── Catalog against a mock backend ──────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_rooms_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [
                { "id": "r-1", "jenis_kamar_id": "t-1", "no_kamar": "101", "tersedia": true },
                { "id": "r-2", "jenis_kamar_id": "t-1", "no_kamar": "102", "tersedia": false }
            ]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        resortly_cmd()
            .args(["--api-url", &uri, "-o", "json", "rooms", "list", "--available"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let rooms: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["no_kamar"], "101");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_rejection_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/facilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": false,
            "message": "Layanan sedang dalam perawatan"
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        resortly_cmd()
            .args(["--api-url", &uri, "facilities", "list"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("perawatan"));
}

// ── Status gates ────────────────────────────────────────────────────

/// A paid booking: payment and cancellation are refused locally.
async fn paid_booking_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/room-bookings/b-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": {
                "id": "b-1",
                "kamar_id": "r-1",
                "tanggal_check_in": "2025-07-01",
                "tanggal_check_out": "2025-07-03",
                "total_harga": 900_000,
                "status": "dikonfirmasi",
                "status_pembayaran": "dibayar"
            }
        })))
        .mount(&server)
        .await;
    Mock::given(path_regex("^/api/(payments|room-bookings/b-1/)"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_paid_booking_is_not_paid_again() {
    let server = paid_booking_server().await;
    let data = signed_in_data_dir();

    let uri = server.uri();
    let data_home = data.path().to_str().unwrap().to_owned();
    let output = tokio::task::spawn_blocking(move || {
        resortly_cmd()
            .env("XDG_DATA_HOME", &data_home)
            .args(["--api-url", &uri, "pay", "start", "room", "b-1"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("dibayar"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_paid_booking_refuses_cancel_and_settle() {
    let server = paid_booking_server().await;
    let data = signed_in_data_dir();

    let uri = server.uri();
    let data_home = data.path().to_str().unwrap().to_owned();
    let outputs = tokio::task::spawn_blocking(move || {
        let cancel = resortly_cmd()
            .env("XDG_DATA_HOME", &data_home)
            .args(["--api-url", &uri, "--yes", "bookings", "cancel", "room", "b-1"])
            .output()
            .unwrap();
        let settle = resortly_cmd()
            .env("XDG_DATA_HOME", &data_home)
            .args([
                "--api-url", &uri, "bookings", "settle", "room", "b-1", "--method", "transfer",
            ])
            .output()
            .unwrap();
        [cancel, settle]
    })
    .await
    .unwrap();

    for output in outputs {
        assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
        assert!(combined_output(&output).contains("status"));
    }
}
