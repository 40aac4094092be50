// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: helpers are shared across spec files,
// and not every spec file uses every helper.
#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tempfile::TempDir;

pub const STREAM_PATH: &str = "/api/v1/validation/stream";
pub const RECENT_PATH: &str = "/api/v1/validation/recent";

/// `vaultwatch` isolated from the caller's environment and config.
pub fn vaultwatch(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("vaultwatch");
    cmd.env("VAULTWATCH_CONFIG", config_dir.join("config.toml"))
        .env_remove("VAULTWATCH_TOKEN")
        .env_remove("VAULTWATCH_LOG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .timeout(Duration::from_secs(30));
    cmd
}

/// Write `content` as the config file in `dir`.
pub fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

/// One canned HTTP reply.
#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Keep the connection open after the body (live event streams).
    pub hold_open: bool,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Reply {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
            hold_open: false,
        }
    }

    pub fn events(body: &str) -> Self {
        Reply {
            status: 200,
            content_type: "text/event-stream",
            body: body.to_string(),
            hold_open: true,
        }
    }

    pub fn status(status: u16) -> Self {
        Reply {
            status,
            content_type: "text/plain",
            body: "stub".to_string(),
            hold_open: false,
        }
    }
}

type Route = Box<dyn Fn(&str) -> Reply + Send + Sync>;

/// Blocking HTTP stub answering by request path.
pub struct Server {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Server {
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let route: Arc<Route> = Arc::new(Box::new(route));

        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { return };
                let seen = Arc::clone(&seen);
                let route = Arc::clone(&route);
                thread::spawn(move || serve(stream, &route, &seen));
            }
        });

        Server { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request lines (`GET /path?query HTTP/1.1`) received so far.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|head| head.lines().next().map(String::from))
            .collect()
    }

    /// Full request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(mut stream: TcpStream, route: &Route, seen: &Mutex<Vec<String>>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let head = String::from_utf8_lossy(&head).into_owned();
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    seen.lock().unwrap().push(head);

    let reply = route(&path);
    let response = format!(
        "HTTP/1.1 {} STUB\r\nContent-Type: {}\r\nConnection: close\r\n\r\n{}",
        reply.status, reply.content_type, reply.body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    let _ = stream.flush();
    if reply.hold_open {
        // Until the client goes away.
        let _ = stream.read(&mut buf);
    }
}

/// A port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
