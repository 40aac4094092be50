// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Polling source for recent validation results.
//!
//! Used when the event stream is unavailable: the client asks for the
//! most recent results on a fixed interval instead.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::debug;
use vw_core::{RecentResponse, Session, ValidationRecord};

use super::transport::{TransportError, TransportResult};

/// Source of recent validation records.
pub trait RecentSource: Send {
    /// Fetch at most `limit` recent records from `url`.
    fn fetch_recent(
        &mut self,
        url: &str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Vec<ValidationRecord>>> + Send + '_>>;
}

/// Polls the REST API with plain JSON requests.
pub struct HttpPoller {
    client: reqwest::Client,
    session: Session,
}

impl HttpPoller {
    pub fn new(session: Session, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(HttpPoller { client, session })
    }
}

impl RecentSource for HttpPoller {
    fn fetch_recent(
        &mut self,
        url: &str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Vec<ValidationRecord>>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            let mut request = self
                .client
                .get(&url)
                .query(&[("limit", limit)])
                .header(ACCEPT, "application/json");
            if let Some(auth) = self.session.authorization() {
                request = request.header(AUTHORIZATION, auth);
            }

            let response = request
                .send()
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(TransportError::Http {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: RecentResponse = response
                .json()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))?;
            let mut records = body.into_records();
            records.truncate(limit);
            debug!("fetched {} recent validation record(s)", records.len());
            Ok(records)
        })
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
pub(crate) mod tests;
