// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! vw-core: Shared library for the vaultwatch validation monitor
//!
//! This crate provides the data model for account validation events, the
//! Server-Sent-Events frame decoder, the bounded event buffer, and the
//! reconnect policy used by the real-time client.

pub mod backoff;
pub mod buffer;
pub mod error;
pub mod event;
pub mod protocol;
pub mod record;
pub mod session;
pub mod sse;
pub mod status;

pub use backoff::Backoff;
pub use buffer::EventBuffer;
pub use error::{Error, Result};
pub use event::{EventData, EventType, Severity, ValidationEvent, ValidationStatistics};
pub use protocol::{parse_frame, StreamMessage};
pub use record::{RecentResponse, ValidationRecord};
pub use session::Session;
pub use sse::{SseDecoder, SseFrame};
pub use status::ConnectionStatus;
