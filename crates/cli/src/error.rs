// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::realtime::{ClientError, TransportError};

/// All possible errors that can occur in the vwrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("no config directory found\n  hint: pass --config <path> or set VAULTWATCH_CONFIG")]
    NoConfigDir,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("could not reach {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("event stream unavailable after {attempts} attempt(s)\n  hint: drop --no-poll to fall back to polling recent results")]
    StreamUnavailable { attempts: u32 },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized Result type for vwrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<vw_core::Error> for Error {
    fn from(e: vw_core::Error) -> Self {
        match e {
            vw_core::Error::InvalidSession(reason) => Error::InvalidConfig {
                field: "base_url",
                reason,
            },
            vw_core::Error::Json(e) => Error::Json(e),
            other => Error::InvalidInput(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
