// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for realtime module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use vw_core::{SseFrame, ValidationRecord};

/// Create a validation record validated `minute` minutes past 09:00.
pub fn make_record(id: &str, success: bool, minute: u32) -> ValidationRecord {
    ValidationRecord {
        id: id.to_string(),
        account_id: format!("acc-{}", id),
        account_name: None,
        success,
        status: None,
        error_message: None,
        error_category: None,
        severity: None,
        validated_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap(),
    }
}

/// Create a named stream frame carrying a minimal data payload.
pub fn make_frame(event: &str, id: &str) -> SseFrame {
    SseFrame {
        event: Some(event.to_string()),
        data: format!(r#"{{"account_id":"acc-{}"}}"#, id),
        id: Some(id.to_string()),
        retry: None,
    }
}

/// One scripted HTTP response.
#[derive(Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub chunks: Vec<String>,
    /// Keep the connection open after the last chunk.
    pub hold_open: bool,
}

impl StubResponse {
    pub fn event_stream(chunks: &[&str]) -> Self {
        StubResponse {
            status: 200,
            content_type: "text/event-stream",
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            hold_open: false,
        }
    }

    pub fn json(body: &str) -> Self {
        StubResponse {
            status: 200,
            content_type: "application/json",
            chunks: vec![body.to_string()],
            hold_open: false,
        }
    }

    pub fn status(status: u16) -> Self {
        StubResponse {
            status,
            content_type: "text/plain",
            chunks: vec!["stub error".to_string()],
            hold_open: false,
        }
    }

    pub fn held_open(mut self) -> Self {
        self.hold_open = true;
        self
    }
}

/// Minimal HTTP/1.1 server answering each connection with the next
/// scripted response (the last one repeats).
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            let mut index = 0usize;
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let response = responses[index.min(responses.len() - 1)].clone();
                index += 1;
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    serve(stream, response, seen).await;
                });
            }
        });

        StubServer {
            addr,
            requests,
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Raw request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut stream: TcpStream, response: StubResponse, seen: Arc<Mutex<Vec<String>>>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    seen.lock()
        .unwrap()
        .push(String::from_utf8_lossy(&head).into_owned());

    let status_line = format!(
        "HTTP/1.1 {} STUB\r\nContent-Type: {}\r\nConnection: close\r\n\r\n",
        response.status, response.content_type
    );
    if stream.write_all(status_line.as_bytes()).await.is_err() {
        return;
    }
    for chunk in &response.chunks {
        if stream.write_all(chunk.as_bytes()).await.is_err() {
            return;
        }
        let _ = stream.flush().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    if response.hold_open {
        std::future::pending::<()>().await;
    }
    let _ = stream.shutdown().await;
}
