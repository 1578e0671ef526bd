//! Integration tests for CLI behavior.
//!
//! Covers flags, subcommand help, offline rendering, and submissions against
//! a local test server.

#![allow(deprecated)] // cargo_bin is deprecated upstream; cargo_bin! needs a newer MSRV

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{Reply, TestServer};

/// Helper: get a Command for the `docform` binary.
fn docform() -> Command {
    let mut cmd = Command::cargo_bin("docform").expect("binary 'docform' should be built");
    // Keep user config out of the tests.
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("docform-tests-no-config"));
    cmd
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    docform()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: docform"))
        .stdout(predicate::str::contains("forms"))
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("features"));
}

#[test]
fn version_flag_shows_semver() {
    docform()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^docform \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn invalid_subcommand_fails() {
    docform()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn submit_help() {
    docform()
        .args(["submit", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[URL]"))
        .stdout(predicate::str::contains("--feature"))
        .stdout(predicate::str::contains("--action"))
        .stdout(predicate::str::contains("--save-images"));
}

#[test]
fn submit_requires_feature() {
    docform()
        .args(["submit", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--feature"));
}

// ─── Offline commands ────────────────────────────────────────────────────────

#[test]
fn features_lists_catalog() {
    docform()
        .arg("features")
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/docx-to-md"))
        .stdout(predicate::str::contains("search_text, replace_text"))
        .stdout(predicate::str::contains("(9 features)"));
}

#[test]
fn render_markdown_escapes() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("result.json");
    std::fs::write(&file, r#"{"markdown":"<b>x</b>"}"#).unwrap();

    docform()
        .arg("render")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("&lt;b&gt;x&lt;/b&gt;"));
}

#[test]
fn render_tables_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("result.json");
    std::fs::write(&file, r#"{"tables":[[["a","b"]]]}"#).unwrap();

    docform()
        .args(["render", "--format", "json"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tables""#));
}

#[test]
fn render_rejects_non_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("result.json");
    std::fs::write(&file, "PK\u{3}\u{4}").unwrap();

    docform()
        .arg("render")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a result body"));
}

// ─── Submissions (local server) ──────────────────────────────────────────────

#[test]
fn submit_renders_metadata_text() {
    let server = TestServer::start(vec![Reply::json(
        "200 OK",
        r#"{"metadata":{"Author":"Ada","Title":"Notes"}}"#,
    )]);

    docform()
        .args(["submit", &server.base_url, "--feature", "metadata", "--no-page"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Author"))
        .stdout(predicate::str::contains("Ada"));

    let request = server.next_request();
    assert_eq!(request.path, "/api/metadata");
}

#[test]
fn submit_reports_server_error() {
    let server = TestServer::start(vec![Reply::json("400 BAD REQUEST", r#"{"error":"No file part"}"#)]);

    docform()
        .args(["submit", &server.base_url, "--feature", "text", "--no-page"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("❌ No file part"));
}

#[test]
fn submit_downloads_attachment() {
    let server = TestServer::start(vec![Reply::attachment("modified_a.docx", b"PK")]);
    let out = tempfile::tempdir().unwrap();

    docform()
        .args([
            "submit",
            &server.base_url,
            "--feature",
            "replace",
            "--no-page",
            "--field",
            "search_text=foo",
            "--field",
            "replace_text=bar",
        ])
        .arg("--out")
        .arg(out.path())
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved modified_a.docx"));

    assert_eq!(std::fs::read(out.path().join("modified_a.docx")).unwrap(), b"PK");
    let body = server.next_request().body_text();
    assert!(body.contains("search_text"));
    assert!(body.contains("bar"));
}

#[test]
fn forms_lists_endpoints() {
    let server = TestServer::start(vec![Reply::html(
        r#"<form id="t"><input type="hidden" name="feature" value="text"><button>Extract</button></form>
           <form id="x"><input name="q"></form>"#,
    )]);

    docform()
        .args(["forms", &server.base_url])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("t → POST /api/text"))
        .stdout(predicate::str::contains("x → (no endpoint"))
        .stdout(predicate::str::contains("(2 forms)"));
}
