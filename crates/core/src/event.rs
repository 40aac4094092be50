// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Validation events delivered by the real-time stream or synthesized
//! from polled validation records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The kind of a validation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A validation run started for an account.
    ValidationStarted,
    /// A validation run finished successfully.
    ValidationCompleted,
    /// A validation run finished with a failure.
    ValidationFailed,
    /// A failure severe enough to require operator attention.
    CriticalFailure,
    /// Status update for a just-in-time access verification.
    JitVerificationStatus,
    /// Aggregate validation counters.
    StatisticsUpdate,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::ValidationStarted,
        EventType::ValidationCompleted,
        EventType::ValidationFailed,
        EventType::CriticalFailure,
        EventType::JitVerificationStatus,
        EventType::StatisticsUpdate,
    ];

    /// The wire name used as the SSE `event:` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ValidationStarted => "validation_started",
            EventType::ValidationCompleted => "validation_completed",
            EventType::ValidationFailed => "validation_failed",
            EventType::CriticalFailure => "critical_failure",
            EventType::JitVerificationStatus => "jit_verification_status",
            EventType::StatisticsUpdate => "statistics_update",
        }
    }

    /// Whether this event reports a problem with an account.
    pub fn is_failure(&self) -> bool {
        matches!(self, EventType::ValidationFailed | EventType::CriticalFailure)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownEventType(s.to_string()))
    }
}

/// Severity attached to failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate counters carried by `statistics_update` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationStatistics {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

/// Payload of a validation event. Every field is optional; which ones are
/// present depends on the event type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ValidationStatistics>,
}

/// A single validation event.
///
/// Identity is `id`. Ids are unique on a best-effort basis: the server
/// assigns them for streamed events and polled records get a synthetic id
/// derived from the record id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub data: EventData,
}

impl ValidationEvent {
    pub fn new(id: impl Into<String>, event_type: EventType, data: EventData) -> Self {
        ValidationEvent {
            id: id.into(),
            event_type,
            timestamp: Utc::now(),
            data,
        }
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Short human label for the account this event concerns, if any.
    pub fn account_label(&self) -> Option<&str> {
        self.data
            .account_name
            .as_deref()
            .or(self.data.account_id.as_deref())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
