// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the validation event stream.
//!
//! Provides a trait-based transport layer that enables:
//! - Real Server-Sent-Events connections for production
//! - Mock transports for unit testing

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL};
use reqwest::StatusCode;
use tracing::{debug, info};
use vw_core::{Session, SseDecoder, SseFrame};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The endpoint does not exist on this server.
    #[error("endpoint unavailable (HTTP {status})")]
    Unavailable { status: u16 },

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl TransportError {
    /// Whether retrying the same endpoint is pointless for this session.
    pub fn is_permanent(&self) -> bool {
        matches!(self, TransportError::Unavailable { .. })
    }

    fn from_status(status: StatusCode, message: String) -> Self {
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            TransportError::Unavailable {
                status: status.as_u16(),
            }
        } else {
            TransportError::Http {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport trait for a one-way event stream.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait StreamTransport: Send {
    /// Open the stream at `url`.
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Close the stream. Closing a closed transport is a no-op.
    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Receive the next frame.
    ///
    /// Returns `None` if the server ended the stream.
    fn recv(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<Option<SseFrame>>> + Send + '_>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type ChunkStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, reqwest::Error>> + Send>>;

/// Server-Sent-Events transport using reqwest.
pub struct SseTransport {
    client: reqwest::Client,
    session: Session,
    decoder: SseDecoder,
    pending: VecDeque<SseFrame>,
    /// The response body, if connected.
    stream: Option<ChunkStream>,
}

impl SseTransport {
    /// Create a new SSE transport for `session`.
    pub fn new(session: Session, connect_timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(1)
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        Ok(SseTransport {
            client,
            session,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            stream: None,
        })
    }

    /// The id of the last event received, sent back as `Last-Event-ID`.
    pub fn last_event_id(&self) -> Option<&str> {
        self.decoder.last_event_id()
    }
}

impl StreamTransport for SseTransport {
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            let mut request = self
                .client
                .get(&url)
                .header(ACCEPT, "text/event-stream")
                .header(CACHE_CONTROL, "no-cache");

            if let Some(auth) = self.session.authorization() {
                request = request.header(AUTHORIZATION, auth);
            }
            if let Some(last_id) = self.decoder.last_event_id() {
                request = request.header("Last-Event-ID", last_id);
            }

            let response = request
                .send()
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TransportError::from_status(status, body));
            }

            info!("Connected to event stream at {}", url);

            self.decoder.reset();
            self.pending.clear();
            self.stream = Some(Box::pin(
                response.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec())),
            ));
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            // Dropping the body closes the underlying connection.
            self.stream = None;
            self.pending.clear();
            Ok(())
        })
    }

    fn recv(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<Option<SseFrame>>> + Send + '_>> {
        Box::pin(async move {
            loop {
                if let Some(frame) = self.pending.pop_front() {
                    return Ok(Some(frame));
                }

                let stream = self.stream.as_mut().ok_or(TransportError::ConnectionClosed)?;

                match stream.next().await {
                    Some(Ok(chunk)) => {
                        let frames = self.decoder.feed(&chunk);
                        if !frames.is_empty() {
                            debug!("decoded {} frame(s) from {} bytes", frames.len(), chunk.len());
                        }
                        self.pending.extend(frames);
                    }
                    Some(Err(e)) => {
                        // Connection is broken, clear it
                        self.stream = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                    None => {
                        // Stream ended, clear connection
                        self.stream = None;
                        return Ok(None);
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
pub(crate) mod tests;
