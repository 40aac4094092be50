// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line formatting for events, records and connection status.

use vw_core::{ConnectionStatus, EventType, ValidationEvent, ValidationRecord, ValidationStatistics};

use crate::colors;

/// Width of the event type column (longest type name).
const TYPE_WIDTH: usize = 23;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an event as one line of text.
///
/// Output format:
/// ```text
/// 2026-03-01 09:14:03  validation_failed        db-admin  [high]  password expired
/// ```
pub fn format_event(event: &ValidationEvent, color: bool) -> String {
    let kind = format!("{:<width$}", event.event_type.as_str(), width = TYPE_WIDTH);
    let kind = if color {
        colors::paint(colors::event_type_code(event.event_type), &kind)
    } else {
        kind
    };

    let mut line = format!("{}  {}", event.timestamp.format(TIME_FORMAT), kind);

    if let Some(account) = event.account_label() {
        line.push_str("  ");
        line.push_str(account);
    }
    if let Some(severity) = event.data.severity {
        line.push_str(&format!("  [{}]", severity));
    }
    if let Some(detail) = event_detail(event) {
        line.push_str("  ");
        line.push_str(&detail);
    }
    line.trim_end().to_string()
}

/// The most useful free-text detail of an event.
fn event_detail(event: &ValidationEvent) -> Option<String> {
    let data = &event.data;
    if let Some(stats) = &data.statistics {
        return Some(format_statistics(stats));
    }
    if let Some(message) = &data.error_message {
        return Some(match &data.error_category {
            Some(category) => format!("{} ({})", message, category),
            None => message.clone(),
        });
    }
    match event.event_type {
        EventType::ValidationStarted | EventType::JitVerificationStatus => data
            .status
            .clone()
            .or_else(|| data.session_id.as_ref().map(|s| format!("session {}", s))),
        _ => None,
    }
}

/// `total=12 ok=10 failed=2 (83.3%)`
pub fn format_statistics(stats: &ValidationStatistics) -> String {
    let mut text = format!(
        "total={} ok={} failed={}",
        stats.total, stats.succeeded, stats.failed
    );
    if let Some(rate) = stats.success_rate {
        text.push_str(&format!(" ({:.1}%)", rate));
    }
    text
}

/// Format a polled record as one line of text.
pub fn format_record(record: &ValidationRecord, color: bool) -> String {
    let outcome = if record.success { "ok  " } else { "FAIL" };
    let outcome = match (color, record.success) {
        (false, _) => outcome.to_string(),
        (true, true) => colors::paint(colors::codes::GOOD, outcome),
        (true, false) => colors::paint(colors::codes::BAD, outcome),
    };

    let account = record
        .account_name
        .as_deref()
        .unwrap_or(record.account_id.as_str());
    let mut line = format!(
        "{}  {}  {}",
        record.validated_at.format(TIME_FORMAT),
        outcome,
        account
    );
    if let Some(message) = &record.error_message {
        line.push_str("  ");
        line.push_str(message);
    }
    line
}

/// Format a connection status line for stderr.
pub fn format_status(status: ConnectionStatus, label: &str, color: bool) -> String {
    let label = if color {
        colors::paint(colors::status_code(status), label)
    } else {
        label.to_string()
    };
    format!("status: {}", label)
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
