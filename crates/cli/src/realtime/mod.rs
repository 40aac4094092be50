// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Real-time validation updates.
//!
//! Streams validation events from the vault API and keeps a bounded buffer
//! of the most recent ones.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌───────────────┐     ┌─────────────┐
//! │     Client     │────►│   Transport   │────►│  /validation│
//! │(RealtimeClient)│◄────│    (trait)    │◄────│   /stream   │
//! └────────────────┘     └───────────────┘     └─────────────┘
//!        │    │
//!        │    └────────► Poller (trait) ─────► /validation/recent
//!        ▼                (fallback)
//! ┌────────────────┐
//! │  EventBuffer   │  (newest first, de-duplicated)
//! └────────────────┘
//! ```
//!
//! # Features
//!
//! - Server-sent events with `Last-Event-ID` resume
//! - Automatic reconnect with exponential backoff
//! - Polling fallback once retries are exhausted
//! - Injectable transport and poller traits for testing

mod client;
mod poller;
mod state;
mod transport;

pub use client::{
    ClientError, ClientEvent, ClientResult, RealtimeClient, RealtimeConfig, RealtimeHandle,
    DEFAULT_RECENT_PATH, DEFAULT_STREAM_PATH,
};
pub use poller::{HttpPoller, RecentSource};
pub use state::SharedClientState;
pub use transport::{SseTransport, StreamTransport, TransportError, TransportResult};

#[cfg(test)]
mod test_helpers;
