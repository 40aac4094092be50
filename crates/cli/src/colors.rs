// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities for help and event output.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use vw_core::{ConnectionStatus, EventType};

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers: pastel cyan/steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Default values/context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Successful validations, connected status: soft green
    pub const GOOD: u8 = 114;
    /// In-progress work, retries: amber
    pub const PENDING: u8 = 179;
    /// Failures and errors: muted red
    pub const BAD: u8 = 167;
    /// Critical failures: bright red
    pub const CRITICAL: u8 = 196;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Same as [`should_colorize`] but for stderr output.
pub fn should_colorize_stderr() -> bool {
    if env::no_color() {
        return false;
    }
    env::force_color() || std::io::stderr().is_terminal()
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

/// Wrap `text` in a 256-color foreground.
pub fn paint(code: u8, text: &str) -> String {
    format!("{}{}{}", fg256(code), text, RESET)
}

/// Apply header color (section titles) to text.
pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

/// Apply literal color (commands, options) to text.
pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

/// Apply context color (default values, hints) to text.
pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

/// Color code for an event type.
pub fn event_type_code(event_type: EventType) -> u8 {
    match event_type {
        EventType::ValidationCompleted => codes::GOOD,
        EventType::ValidationStarted | EventType::JitVerificationStatus => codes::PENDING,
        EventType::ValidationFailed => codes::BAD,
        EventType::CriticalFailure => codes::CRITICAL,
        EventType::StatisticsUpdate => codes::CONTEXT,
    }
}

/// Color code for a connection status.
pub fn status_code(status: ConnectionStatus) -> u8 {
    match status {
        ConnectionStatus::Connected => codes::GOOD,
        ConnectionStatus::Connecting => codes::PENDING,
        ConnectionStatus::Disconnected => codes::CONTEXT,
        ConnectionStatus::Error => codes::BAD,
    }
}

/// Colorize an examples help block.
///
/// Expects format like:
/// ```text
/// Examples:
///   vaultwatch watch --json    Description here
///   vaultwatch recent -n 5     Another description
/// ```
///
/// Section headers (lines ending with `:`) get the header color. On example
/// lines the command gets the literal color, with `<placeholders>` dimmed.
pub fn examples(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + 128);
    for line in text.lines() {
        if !result.is_empty() {
            result.push('\n');
        }

        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if trimmed.ends_with(':') && !trimmed.contains("  ") {
            result.push_str(indent);
            result.push_str(&header(trimmed));
        } else if let Some(cmd_end) = find_description_start(trimmed) {
            result.push_str(indent);
            result.push_str(&colorize_command(&trimmed[..cmd_end]));
            result.push_str(&trimmed[cmd_end..]);
        } else {
            result.push_str(line);
        }
    }
    result
}

/// Colorize a command: words as literals, `<placeholders>` as context.
pub fn colorize_command(cmd: &str) -> String {
    cmd.split(' ')
        .map(|word| {
            if word.is_empty() {
                String::new()
            } else if word.starts_with('<') && word.ends_with('>') {
                context(word)
            } else {
                literal(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find where the description starts (2+ spaces after the command).
pub fn find_description_start(line: &str) -> Option<usize> {
    let start = line.find("  ")?;
    let rest = &line[start..];
    let gap = rest.len() - rest.trim_start_matches(' ').len();
    if start + gap < line.len() {
        Some(start)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
