// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot fetch of recent validation results.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod support;

use predicates::prelude::*;
use support::*;
use tempfile::TempDir;

const RECORDS: &str = r#"[
    {"id":"1","account_id":"acc-1","account_name":"db-admin","success":true,"validated_at":"2026-03-01T09:00:00Z"},
    {"id":"2","account_id":"acc-2","success":false,"error_message":"password expired","validated_at":"2026-03-01T09:30:00Z"}
]"#;

fn records_server() -> Server {
    Server::start(|path| {
        if path.starts_with(RECENT_PATH) {
            Reply::json(RECORDS)
        } else {
            Reply::status(404)
        }
    })
}

#[test]
fn recent_prints_newest_first() {
    let temp = TempDir::new().unwrap();
    let server = records_server();

    let output = vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "recent"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "2026-03-01 09:30:00  FAIL  acc-2  password expired",
            "2026-03-01 09:00:00  ok    db-admin",
        ]
    );
    assert_eq!(
        server.request_lines()[0],
        format!("GET {}?limit=10 HTTP/1.1", RECENT_PATH)
    );
}

#[test]
fn recent_json_output() {
    let temp = TempDir::new().unwrap();
    let server = records_server();

    let output = vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "recent", "--json", "-n", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "2");
    assert_eq!(records[0]["success"], false);
    assert!(server.request_lines()[0].contains("limit=5"));
}

#[test]
fn recent_accepts_wrapped_results() {
    let temp = TempDir::new().unwrap();
    let body = format!(r#"{{"results":{}}}"#, RECORDS);
    let server = Server::start(move |_| Reply::json(&body));

    vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "recent", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("db-admin"))
        .stdout(predicate::str::contains("acc-2").not());
}

#[test]
fn recent_empty() {
    let temp = TempDir::new().unwrap();
    let server = Server::start(|_| Reply::json("[]"));

    vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "recent"])
        .assert()
        .success()
        .stdout("No recent validation results.\n");
}

#[test]
fn recent_sends_token_from_flag() {
    let temp = TempDir::new().unwrap();
    let server = records_server();

    vaultwatch(temp.path())
        .env("VAULTWATCH_TOKEN", "from-env")
        .args(["--url", &server.base_url(), "--token", "from-flag", "recent"])
        .assert()
        .success();

    let head = server.requests()[0].to_ascii_lowercase();
    assert!(head.contains("authorization: bearer from-flag"));
}

#[test]
fn recent_sends_token_from_env() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "token = \"from-file\"\n");
    let server = records_server();

    vaultwatch(temp.path())
        .env("VAULTWATCH_TOKEN", "from-env")
        .args(["--url", &server.base_url(), "recent"])
        .assert()
        .success();

    let head = server.requests()[0].to_ascii_lowercase();
    assert!(head.contains("authorization: bearer from-env"));
}

#[test]
fn recent_reports_http_errors() {
    let temp = TempDir::new().unwrap();
    let server = Server::start(|_| Reply::status(500));

    vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "recent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("HTTP 500"));
}

#[test]
fn recent_reports_unreachable_server() {
    let temp = TempDir::new().unwrap();
    let url = closed_port_url();

    vaultwatch(temp.path())
        .args(["--url", &url, "recent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not reach"));
}
