// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live tailing: streaming, reconnect and the polling fallback.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod support;

use predicates::prelude::*;
use support::*;
use tempfile::TempDir;

const STREAM_BODY: &str = "\
: connected\n\n\
event: heartbeat\ndata: {}\n\n\
id: e1\nevent: validation_started\ndata: {\"account_id\":\"acc-1\"}\n\n\
id: e2\nevent: validation_failed\ndata: {\"account_id\":\"acc-1\",\"error_message\":\"expired\",\"severity\":\"high\"}\n\n";

const ONE_RECORD: &str = r#"[{"id":"41","account_id":"acc-41","account_name":"backup-svc","success":true,"validated_at":"2026-03-01T10:00:00Z"}]"#;

/// Fast reconnects so fallback paths finish quickly.
const FAST_BACKOFF: &str = "[realtime]\nbase_delay_ms = 10\nmax_delay_ms = 50\nmax_attempts = 2\n";

fn stream_then_recent(stream: Reply) -> Server {
    Server::start(move |path| {
        if path.starts_with(STREAM_PATH) {
            stream.clone()
        } else if path.starts_with(RECENT_PATH) {
            Reply::json(ONE_RECORD)
        } else {
            Reply::status(404)
        }
    })
}

#[test]
fn watch_streams_json_events() {
    let temp = TempDir::new().unwrap();
    let server = stream_then_recent(Reply::events(STREAM_BODY));

    let output = vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "--token", "tok"])
        .args(["watch", "--json", "--max-events", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["id"], "e1");
    assert_eq!(events[0]["type"], "validation_started");
    assert_eq!(events[1]["id"], "e2");
    assert_eq!(events[1]["data"]["severity"], "high");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("status: connected"));

    let head = server.requests()[0].to_ascii_lowercase();
    assert!(head.starts_with(&format!("get {}", STREAM_PATH)));
    assert!(head.contains("accept: text/event-stream"));
    assert!(head.contains("authorization: bearer tok"));
}

#[test]
fn watch_prints_text_lines() {
    let temp = TempDir::new().unwrap();
    let server = stream_then_recent(Reply::events(STREAM_BODY));

    vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "watch", "-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("validation_started"))
        .stdout(predicate::str::contains("acc-1  [high]  expired"))
        .stdout(predicate::str::contains("heartbeat").not());
}

#[test]
fn missing_stream_falls_back_to_polling() {
    let temp = TempDir::new().unwrap();
    let server = stream_then_recent(Reply::status(404));

    let output = vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "watch", "--json", "-n", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let event: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(event["id"], "validation-41");
    assert_eq!(event["type"], "validation_completed");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("status: disconnected (polling)"));
    assert_eq!(stderr.matches("notice:").count(), 1);
    assert!(stderr.contains("polling every 30s"));

    // One stream attempt, no retries for a missing endpoint
    let lines = server.request_lines();
    assert_eq!(
        lines.iter().filter(|l| l.contains(STREAM_PATH)).count(),
        1
    );
    assert!(!stderr.contains("retrying in"));
}

#[test]
fn server_errors_are_retried_before_polling() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, FAST_BACKOFF);
    let server = stream_then_recent(Reply::status(503));

    let output = vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "watch", "-n", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation_completed"));
    assert!(stdout.contains("backup-svc"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("retrying in"));
    assert!(stderr.contains("(attempt 1/2)"));
    assert!(stderr.contains("status: disconnected (polling)"));

    let lines = server.request_lines();
    assert_eq!(
        lines.iter().filter(|l| l.contains(STREAM_PATH)).count(),
        2
    );
}

#[test]
fn no_poll_fails_when_stream_is_unavailable() {
    let temp = TempDir::new().unwrap();
    let server = stream_then_recent(Reply::status(404));

    vaultwatch(temp.path())
        .args(["--url", &server.base_url(), "watch", "--no-poll"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("event stream unavailable"))
        .stderr(predicate::str::contains("--no-poll"));

    assert!(server
        .request_lines()
        .iter()
        .all(|line| !line.contains(RECENT_PATH)));
}

#[test]
fn watch_rejects_zero_max_events() {
    let temp = TempDir::new().unwrap();

    vaultwatch(temp.path())
        .args(["watch", "--max-events", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-events"));
}
