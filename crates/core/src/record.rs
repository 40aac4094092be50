// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Validation records returned by the "recent results" endpoint.
//!
//! Records are what the polling fallback sees instead of a live stream.
//! Each one converts into an equivalent [`ValidationEvent`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::event::{EventData, EventType, Severity, ValidationEvent};

/// Prefix for event ids synthesized from polled records.
pub const SYNTHETIC_ID_PREFIX: &str = "validation-";

/// One completed validation run as reported by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub validated_at: DateTime<Utc>,
}

impl ValidationRecord {
    /// The event id used for this record. Stable across polls so repeated
    /// fetches of the same record de-duplicate.
    pub fn event_id(&self) -> String {
        format!("{}{}", SYNTHETIC_ID_PREFIX, self.id)
    }

    /// Translate into the event the stream would have sent.
    pub fn to_event(&self) -> ValidationEvent {
        let event_type = if self.success {
            EventType::ValidationCompleted
        } else {
            EventType::ValidationFailed
        };

        let severity = match (self.severity, self.success) {
            (Some(s), _) => Some(s),
            (None, false) => Some(Severity::High),
            (None, true) => None,
        };

        let status = self
            .status
            .clone()
            .unwrap_or_else(|| if self.success { "success" } else { "failed" }.to_string());

        ValidationEvent {
            id: self.event_id(),
            event_type,
            timestamp: self.validated_at,
            data: EventData {
                account_id: Some(self.account_id.clone()),
                account_name: self.account_name.clone(),
                session_id: None,
                status: Some(status),
                error_message: self.error_message.clone(),
                error_category: self.error_category.clone(),
                severity,
                statistics: None,
            },
        }
    }
}

/// Body of the recent-results endpoint. Both a bare array and a wrapped
/// `{"results": [...]}` object are accepted.
///
/// Entries are kept as raw JSON so one bad record cannot hide the rest.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecentResponse {
    Bare(Vec<serde_json::Value>),
    Wrapped { results: Vec<serde_json::Value> },
}

impl RecentResponse {
    /// Decode every entry, skipping the ones that are not valid records.
    pub fn into_records(self) -> Vec<ValidationRecord> {
        let entries = match self {
            RecentResponse::Bare(entries) => entries,
            RecentResponse::Wrapped { results } => results,
        };
        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("skipping malformed validation record: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// Ids arrive as JSON strings or integers depending on the backend.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    WireId::deserialize(deserializer).map(String::from)
}

pub(crate) fn optional_id_from_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<WireId>::deserialize(deserializer).map(|id| id.map(String::from))
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
