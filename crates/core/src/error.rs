// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for vw-core operations.

use thiserror::Error;

/// All possible errors that can occur in vw-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown event type: '{0}'\n  hint: valid types are: validation_started, validation_completed, validation_failed, critical_failure, jit_verification_status, statistics_update")]
    UnknownEventType(String),

    #[error("invalid connection status: '{0}'\n  hint: valid statuses are: connecting, connected, disconnected, error")]
    InvalidStatus(String),

    #[error("malformed event payload: {0}")]
    MalformedPayload(String),

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for vw-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
