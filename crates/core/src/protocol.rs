// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Interpretation of stream frames sent by the validation backend.
//!
//! The backend names each frame after its [`EventType`]. The `data:` line
//! is either a complete event object or only the inner data payload, in
//! which case the envelope is filled in from the frame itself.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::event::{EventData, EventType, ValidationEvent};
use crate::record::optional_id_from_string_or_number;
use crate::sse::{SseFrame, DEFAULT_EVENT};

/// Event names the backend uses for liveness only.
pub const KEEPALIVE_EVENTS: [&str; 3] = ["heartbeat", "ping", "connected"];

/// What a single frame means to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    /// A validation event to buffer and deliver.
    Event(ValidationEvent),
    /// A liveness frame with nothing to deliver.
    KeepAlive,
}

/// Full event object as some backends send it.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default, deserialize_with = "optional_id_from_string_or_number")]
    id: Option<String>,
    #[serde(rename = "type")]
    event_type: EventType,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    data: EventData,
}

/// Parse a frame received at `received_at`.
///
/// Returns [`Error::UnknownEventType`] for unrecognised event names and
/// [`Error::MalformedPayload`] when the data is not usable JSON.
pub fn parse_frame(frame: &SseFrame, received_at: DateTime<Utc>) -> Result<StreamMessage> {
    let name = frame.event_name();
    if KEEPALIVE_EVENTS.contains(&name) {
        return Ok(StreamMessage::KeepAlive);
    }

    let value: serde_json::Value = serde_json::from_str(&frame.data)
        .map_err(|e| Error::MalformedPayload(format!("{} frame: {}", name, e)))?;

    if value.get("type").is_some() {
        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|e| Error::MalformedPayload(format!("{} frame: {}", name, e)))?;
        let id = envelope
            .id
            .filter(|id| !id.is_empty())
            .or_else(|| frame_id(frame))
            .unwrap_or_else(synthetic_id);
        return Ok(StreamMessage::Event(ValidationEvent {
            id,
            event_type: envelope.event_type,
            timestamp: envelope.timestamp.unwrap_or(received_at),
            data: envelope.data,
        }));
    }

    if name == DEFAULT_EVENT {
        return Err(Error::MalformedPayload(
            "untyped message frame without a type field".to_string(),
        ));
    }

    let event_type: EventType = name.parse()?;
    let data: EventData = serde_json::from_value(value)
        .map_err(|e| Error::MalformedPayload(format!("{} frame: {}", name, e)))?;

    Ok(StreamMessage::Event(ValidationEvent {
        id: frame_id(frame).unwrap_or_else(synthetic_id),
        event_type,
        timestamp: received_at,
        data,
    }))
}

fn frame_id(frame: &SseFrame) -> Option<String> {
    frame.id.clone().filter(|id| !id.is_empty())
}

fn synthetic_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
