// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental decoder for `text/event-stream` bodies.
//!
//! Network chunks do not line up with event boundaries, so the decoder
//! buffers partial lines and only yields a frame once its terminating
//! blank line has arrived. Line endings may be `\n`, `\r\n` or `\r`.

use tracing::trace;

/// Event name used when a frame carries no `event:` field.
pub const DEFAULT_EVENT: &str = "message";

/// One dispatched Server-Sent Event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    /// Value of the `event:` field, if present.
    pub event: Option<String>,
    /// Concatenated `data:` lines joined by `\n`.
    pub data: String,
    /// Value of an `id:` field that appeared in this frame.
    pub id: Option<String>,
    /// Reconnection time hint in milliseconds.
    pub retry: Option<u64>,
}

impl SseFrame {
    /// The event name, defaulting to `message`.
    pub fn event_name(&self) -> &str {
        self.event.as_deref().unwrap_or(DEFAULT_EVENT)
    }
}

/// Streaming SSE parser.
#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    skip_lf: bool,
    event: Option<String>,
    data: String,
    id: Option<String>,
    retry: Option<u64>,
    last_event_id: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent event id seen on this stream, for `Last-Event-ID`.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Feed a chunk of bytes, returning every frame it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        for &byte in chunk {
            if self.skip_lf {
                self.skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => self.end_line(&mut frames),
                b'\r' => {
                    self.skip_lf = true;
                    self.end_line(&mut frames);
                }
                _ => self.line.push(byte),
            }
        }
        frames
    }

    /// Drop any partially received frame, keeping the last event id.
    pub fn reset(&mut self) {
        self.line.clear();
        self.skip_lf = false;
        self.event = None;
        self.data.clear();
        self.id = None;
        self.retry = None;
    }

    fn end_line(&mut self, frames: &mut Vec<SseFrame>) {
        let raw = std::mem::take(&mut self.line);
        if raw.is_empty() {
            if let Some(frame) = self.dispatch() {
                frames.push(frame);
            }
            return;
        }
        let line = String::from_utf8_lossy(&raw);
        self.process_line(&line);
    }

    fn process_line(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" => {
                if value.is_empty() {
                    // An empty id resets the last event id.
                    self.id = None;
                    self.last_event_id = None;
                } else if !value.contains('\0') {
                    self.id = Some(value.to_string());
                    self.last_event_id = Some(value.to_string());
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    self.retry = value.parse().ok();
                }
            }
            other => trace!("ignoring unknown SSE field: {}", other),
        }
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let id = self.id.take();
        let retry = self.retry.take();

        if self.data.is_empty() {
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }

        Some(SseFrame {
            event,
            data,
            id,
            retry,
        })
    }
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
