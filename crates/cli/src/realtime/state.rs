// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client state shared between the driver task and its handles.
//!
//! Uses atomic fields so handles can read status without waiting on the
//! driver.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use vw_core::ConnectionStatus;

/// Connection state visible to both the driver task and handles.
pub struct SharedClientState {
    /// Current status (atomic for lock-free reads).
    status: AtomicU8,
    /// Consecutive failed stream attempts.
    attempts: AtomicU32,
    /// Whether the polling fallback is active.
    polling: AtomicBool,
}

impl SharedClientState {
    /// Create a new shared state initialized to disconnected.
    pub fn new() -> Self {
        Self {
            status: AtomicU8::new(ConnectionStatus::Disconnected.to_u8()),
            attempts: AtomicU32::new(0),
            polling: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Set the status, returning the previous one.
    pub fn set_status(&self, status: ConnectionStatus) -> ConnectionStatus {
        ConnectionStatus::from_u8(self.status.swap(status.to_u8(), Ordering::AcqRel))
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Acquire)
    }

    pub fn set_attempts(&self, attempts: u32) {
        self.attempts.store(attempts, Ordering::Release);
    }

    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::Acquire)
    }

    /// Set polling mode, returning the previous value.
    pub fn set_polling(&self, polling: bool) -> bool {
        self.polling.swap(polling, Ordering::AcqRel)
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Get a human-readable status string.
    pub fn status_string(&self) -> String {
        match self.status() {
            ConnectionStatus::Connecting => {
                let attempt = self.attempts();
                if attempt > 0 {
                    format!("connecting (retry {})", attempt)
                } else {
                    "connecting".to_string()
                }
            }
            ConnectionStatus::Disconnected if self.is_polling() => {
                "disconnected (polling)".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl Default for SharedClientState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
