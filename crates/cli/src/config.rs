// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration management.
//!
//! Configuration is stored in `<config_dir>/vaultwatch/config.toml` and includes:
//! - `base_url`: Root URL of the vault API (e.g., "https://vault.example.com")
//! - `token`: Optional bearer token for the API
//! - `[realtime]`: Stream and polling settings for the real-time client
//!
//! A missing file is not an error; every key has a default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use vw_core::{Backoff, Session};

use crate::error::{Error, Result};
use crate::realtime::{RealtimeConfig, DEFAULT_RECENT_PATH, DEFAULT_STREAM_PATH};

const CONFIG_DIR_NAME: &str = "vaultwatch";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Overall timeout for one-shot JSON requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// User configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the vault API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token (optional; `VAULTWATCH_TOKEN` and `--token` override it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Real-time client settings.
    #[serde(default)]
    pub realtime: RealtimeSettings,
}

/// Real-time client settings (`[realtime]` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeSettings {
    /// Path of the event stream, relative to `base_url`.
    pub stream_path: String,
    /// Path of the recent results endpoint, relative to `base_url`.
    pub recent_path: String,
    /// Delay unit for reconnect backoff in milliseconds (default: 1000).
    pub base_delay_ms: u64,
    /// Maximum delay between reconnect attempts in milliseconds (default: 30000).
    pub max_delay_ms: u64,
    /// Failed attempts before falling back to polling (default: 5).
    pub max_attempts: u32,
    /// Polling interval in seconds (default: 30).
    pub poll_interval_secs: u64,
    /// Results requested per poll (default: 10).
    pub poll_limit: usize,
    /// Events retained in memory (default: 100).
    pub buffer_capacity: usize,
    /// Max time to wait for the stream to open in seconds (default: 10).
    pub connect_timeout_secs: u64,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        RealtimeSettings {
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            recent_path: DEFAULT_RECENT_PATH.to_string(),
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_attempts: 5,
            poll_interval_secs: 30,
            poll_limit: 10,
            buffer_capacity: vw_core::buffer::DEFAULT_CAPACITY,
            connect_timeout_secs: 10,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: default_base_url(),
            token: None,
            realtime: RealtimeSettings::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, returning defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply command-line and environment overrides.
    ///
    /// `url` replaces `base_url`. The first non-blank token wins.
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        tokens: impl IntoIterator<Item = Option<String>>,
    ) -> Self {
        if let Some(url) = url {
            self.base_url = url;
        }
        if let Some(token) = tokens
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
        {
            self.token = Some(token);
        }
        self
    }

    /// Check values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.session()?;

        let rt = &self.realtime;
        for (field, path) in [
            ("realtime.stream_path", &rt.stream_path),
            ("realtime.recent_path", &rt.recent_path),
        ] {
            if !path.starts_with('/') {
                return Err(Error::InvalidConfig {
                    field,
                    reason: format!("'{}' must start with '/'", path),
                });
            }
        }

        let non_zero = [
            ("realtime.max_attempts", u64::from(rt.max_attempts)),
            ("realtime.poll_interval_secs", rt.poll_interval_secs),
            ("realtime.poll_limit", rt.poll_limit as u64),
            ("realtime.buffer_capacity", rt.buffer_capacity as u64),
            ("realtime.base_delay_ms", rt.base_delay_ms),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(Error::InvalidConfig {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if rt.max_delay_ms < rt.base_delay_ms {
            return Err(Error::InvalidConfig {
                field: "realtime.max_delay_ms",
                reason: format!("must be at least base_delay_ms ({})", rt.base_delay_ms),
            });
        }
        Ok(())
    }

    /// The session described by `base_url` and `token`.
    pub fn session(&self) -> Result<Session> {
        let mut session = Session::new(self.base_url.as_str())?;
        if let Some(token) = &self.token {
            session = session.with_token(token.as_str());
        }
        Ok(session)
    }

    /// Settings for the real-time client against `session`.
    pub fn realtime_config(&self, session: &Session) -> RealtimeConfig {
        let rt = &self.realtime;
        RealtimeConfig {
            stream_url: session.endpoint(&rt.stream_path),
            recent_url: session.endpoint(&rt.recent_path),
            backoff: Backoff {
                base_delay: Duration::from_millis(rt.base_delay_ms),
                max_delay: Duration::from_millis(rt.max_delay_ms),
                max_attempts: rt.max_attempts,
            },
            poll_interval: Duration::from_secs(rt.poll_interval_secs),
            poll_limit: rt.poll_limit,
            buffer_capacity: rt.buffer_capacity,
            polling_enabled: true,
            connect_timeout: Duration::from_secs(rt.connect_timeout_secs),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Request timeout for one-shot JSON calls.
    pub fn request_timeout(&self) -> Duration {
        REQUEST_TIMEOUT
    }

    /// Copy of this config with the token masked, for display.
    pub fn redacted(&self) -> Config {
        let mut shown = self.clone();
        if shown.token.is_some() {
            shown.token = Some("<redacted>".to_string());
        }
        shown
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }
}

/// Default config location: `<config_dir>/vaultwatch/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or(Error::NoConfigDir)?;
    Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Pick the config file: explicit path, then `from_env`, then the default.
pub fn resolve_config_path(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = from_env {
        return Ok(path);
    }
    default_config_path()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
