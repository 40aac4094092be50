// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Real-time client for validation events.
//!
//! Provides a high-level interface for:
//! - Connecting to the validation event stream
//! - Automatic reconnection with exponential backoff
//! - Falling back to polling recent results once retries are exhausted
//! - Buffering recent events and notifying listeners
//!
//! The client runs as a single background task. Callers talk to it through
//! a [`RealtimeHandle`], which sends commands over a channel and reads
//! shared state without waiting on the task.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use vw_core::{
    parse_frame, Backoff, ConnectionStatus, EventBuffer, Session, SseFrame, StreamMessage,
    ValidationEvent,
};

use super::poller::{HttpPoller, RecentSource};
use super::state::SharedClientState;
use super::transport::{SseTransport, StreamTransport, TransportError};

/// Default path of the validation event stream.
pub const DEFAULT_STREAM_PATH: &str = "/api/v1/validation/stream";
/// Default path of the recent validation results endpoint.
pub const DEFAULT_RECENT_PATH: &str = "/api/v1/validation/recent";

const EVENT_CHANNEL_CAPACITY: usize = 256;
const COMMAND_CHANNEL_CAPACITY: usize = 16;

/// Configuration for the real-time client.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Full URL of the event stream.
    pub stream_url: String,
    /// Full URL of the recent results endpoint.
    pub recent_url: String,
    /// Reconnect policy.
    pub backoff: Backoff,
    /// Interval between polls while the stream is unavailable.
    pub poll_interval: Duration,
    /// Number of recent results requested per poll.
    pub poll_limit: usize,
    /// Number of events retained in memory.
    pub buffer_capacity: usize,
    /// Whether to poll once the stream is given up on.
    pub polling_enabled: bool,
    /// Connect timeout for the stream.
    pub connect_timeout: Duration,
    /// Overall timeout for a single poll request.
    pub request_timeout: Duration,
}

impl RealtimeConfig {
    /// Default configuration against the standard endpoints of `session`.
    pub fn for_session(session: &Session) -> Self {
        RealtimeConfig {
            stream_url: session.endpoint(DEFAULT_STREAM_PATH),
            recent_url: session.endpoint(DEFAULT_RECENT_PATH),
            backoff: Backoff::default(),
            poll_interval: Duration::from_secs(30),
            poll_limit: 10,
            buffer_capacity: vw_core::buffer::DEFAULT_CAPACITY,
            polling_enabled: true,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Everything observable about a running client, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The connection status label changed.
    Status(ConnectionStatus),
    /// A new event was accepted into the buffer.
    Event(ValidationEvent),
    /// A stream attempt failed and another is scheduled.
    RetryScheduled { attempt: u32, delay: Duration },
    /// Retries are exhausted (or the endpoint is gone); polling began.
    PollingStarted,
    /// Polling ended because of a reconnect or disconnect.
    PollingStopped,
    /// One-time message for the user.
    Notice(String),
}

/// Error type for real-time client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport setup failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The client task is no longer running.
    #[error("real-time client is not running")]
    Stopped,

    /// The client task panicked or was aborted.
    #[error("real-time client task failed: {0}")]
    Join(String),
}

/// Result type for real-time client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Connect,
    Reconnect,
    Disconnect,
}

/// What the driver task is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing scheduled; waiting for a command.
    Idle,
    /// About to attempt the stream.
    Connect,
    /// Reading frames from an open stream.
    Streaming,
    /// Backing off before the next attempt.
    Waiting(Duration),
    /// Stream given up on; polling recent results.
    Polling,
}

type Listener = Box<dyn Fn(&ValidationEvent) + Send + Sync>;

/// Real-time client for validation events.
pub struct RealtimeClient<T: StreamTransport = SseTransport, P: RecentSource = HttpPoller> {
    config: RealtimeConfig,
    transport: T,
    poller: P,
    buffer: Arc<Mutex<EventBuffer>>,
    listeners: Vec<Listener>,
    shared: Arc<SharedClientState>,
    events_tx: broadcast::Sender<ClientEvent>,
    /// The polling notice is shown once per client.
    fallback_announced: bool,
}

impl RealtimeClient<SseTransport, HttpPoller> {
    /// Create a client using the HTTP stream and poller for `session`.
    pub fn new(session: Session, config: RealtimeConfig) -> ClientResult<Self> {
        let transport = SseTransport::new(session.clone(), config.connect_timeout)?;
        let poller = HttpPoller::new(session, config.request_timeout)?;
        Ok(Self::with_transport(config, transport, poller))
    }
}

impl<T, P> RealtimeClient<T, P>
where
    T: StreamTransport + 'static,
    P: RecentSource + 'static,
{
    /// Create a client with custom transport and poller (for testing).
    pub fn with_transport(config: RealtimeConfig, transport: T, poller: P) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        RealtimeClient {
            buffer: Arc::new(Mutex::new(EventBuffer::new(config.buffer_capacity))),
            config,
            transport,
            poller,
            listeners: Vec::new(),
            shared: Arc::new(SharedClientState::new()),
            events_tx,
            fallback_announced: false,
        }
    }

    /// Register a callback invoked once for every accepted event, in
    /// arrival order, on the client task.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: Fn(&ValidationEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Subscribe to client events before spawning.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events_tx.subscribe()
    }

    /// Current status.
    pub fn status(&self) -> ConnectionStatus {
        self.shared.status()
    }

    /// Start the client task and connect immediately.
    pub fn spawn(self) -> RealtimeHandle {
        self.spawn_in(Phase::Connect)
    }

    /// Start the client task without connecting until
    /// [`RealtimeHandle::connect`] is called.
    pub fn spawn_idle(self) -> RealtimeHandle {
        self.spawn_in(Phase::Idle)
    }

    fn spawn_in(self, start: Phase) -> RealtimeHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let shared = Arc::clone(&self.shared);
        let buffer = Arc::clone(&self.buffer);
        let events_tx = self.events_tx.clone();

        let task = tokio::spawn(self.run(start, command_rx, cancel.clone()));

        RealtimeHandle {
            commands: command_tx,
            cancel,
            shared,
            buffer,
            events_tx,
            task: Some(task),
        }
    }

    async fn run(
        mut self,
        start: Phase,
        mut commands: mpsc::Receiver<Command>,
        cancel: CancellationToken,
    ) {
        let mut phase = start;
        loop {
            let next = match phase {
                Phase::Idle => self.idle(&mut commands, &cancel).await,
                Phase::Connect => self.connect_once(&mut commands, &cancel).await,
                Phase::Streaming => self.stream(&mut commands, &cancel).await,
                Phase::Waiting(delay) => self.wait(delay, &mut commands, &cancel).await,
                Phase::Polling => self.poll(&mut commands, &cancel).await,
            };
            match next {
                Some(next) => {
                    trace!("phase {:?} -> {:?}", phase, next);
                    phase = next;
                }
                None => break,
            }
        }

        self.close_stream().await;
        self.stop_polling();
        self.set_status(ConnectionStatus::Disconnected);
        debug!("real-time client stopped");
    }

    async fn idle(
        &mut self,
        commands: &mut mpsc::Receiver<Command>,
        cancel: &CancellationToken,
    ) -> Option<Phase> {
        tokio::select! {
            _ = cancel.cancelled() => None,
            command = commands.recv() => self.handle_command(command, Phase::Idle).await,
        }
    }

    async fn connect_once(
        &mut self,
        commands: &mut mpsc::Receiver<Command>,
        cancel: &CancellationToken,
    ) -> Option<Phase> {
        self.set_status(ConnectionStatus::Connecting);
        debug!(
            "connecting to {} (attempt {})",
            self.config.stream_url,
            self.shared.attempts() + 1
        );

        let outcome = {
            let mut connecting = self.transport.connect(&self.config.stream_url);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return None,
                    command = commands.recv() => match command {
                        // Already connecting; keep the attempt in flight.
                        Some(Command::Connect) => trace!("connect requested while connecting"),
                        other => break Err(other),
                    },
                    result = &mut connecting => break Ok(result),
                }
            }
        };

        let result = match outcome {
            Ok(result) => result,
            Err(command) => return self.handle_command(command, Phase::Connect).await,
        };

        match result {
            Ok(()) => {
                info!("real-time stream connected");
                self.shared.set_attempts(0);
                self.stop_polling();
                self.set_status(ConnectionStatus::Connected);
                Some(Phase::Streaming)
            }
            Err(e) => Some(self.on_failure(e).await),
        }
    }

    async fn stream(
        &mut self,
        commands: &mut mpsc::Receiver<Command>,
        cancel: &CancellationToken,
    ) -> Option<Phase> {
        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => return None,
                command = commands.recv() => {
                    return self.handle_command(command, Phase::Streaming).await;
                }
                received = self.transport.recv() => received,
            };

            match received {
                Ok(Some(frame)) => self.on_frame(frame),
                Ok(None) => return Some(self.on_failure(TransportError::ConnectionClosed).await),
                Err(e) => return Some(self.on_failure(e).await),
            }
        }
    }

    async fn wait(
        &mut self,
        delay: Duration,
        commands: &mut mpsc::Receiver<Command>,
        cancel: &CancellationToken,
    ) -> Option<Phase> {
        tokio::select! {
            _ = cancel.cancelled() => None,
            command = commands.recv() => {
                self.handle_command(command, Phase::Waiting(delay)).await
            }
            _ = tokio::time::sleep(delay) => Some(Phase::Connect),
        }
    }

    async fn poll(
        &mut self,
        commands: &mut mpsc::Receiver<Command>,
        cancel: &CancellationToken,
    ) -> Option<Phase> {
        let period = self.config.poll_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return None,
                command = commands.recv() => {
                    let next = self.handle_command(command, Phase::Polling).await;
                    if next != Some(Phase::Polling) {
                        return next;
                    }
                }
                _ = ticker.tick() => {
                    if !self.poll_once(cancel).await {
                        return None;
                    }
                }
            }
        }
    }

    /// Fetch and merge one batch of recent results. Returns `false` if
    /// cancelled mid-request.
    async fn poll_once(&mut self, cancel: &CancellationToken) -> bool {
        let fetched = tokio::select! {
            _ = cancel.cancelled() => return false,
            fetched = self.poller.fetch_recent(&self.config.recent_url, self.config.poll_limit) => fetched,
        };

        match fetched {
            Ok(mut records) => {
                // Oldest first, so the newest record ends up at the front.
                records.sort_by_key(|r| r.validated_at);
                let mut accepted = 0usize;
                for record in &records {
                    if self.accept(record.to_event()) {
                        accepted += 1;
                    }
                }
                debug!("poll returned {} record(s), {} new", records.len(), accepted);
            }
            Err(e) => warn!("polling recent validations failed: {}", e),
        }
        true
    }

    async fn handle_command(&mut self, command: Option<Command>, current: Phase) -> Option<Phase> {
        // All handles are gone.
        let command = command?;

        match command {
            Command::Connect => Some(match current {
                Phase::Idle | Phase::Waiting(_) => Phase::Connect,
                other => other,
            }),
            Command::Reconnect => {
                info!("manual reconnect requested");
                self.close_stream().await;
                self.stop_polling();
                self.shared.set_attempts(0);
                Some(Phase::Connect)
            }
            Command::Disconnect => {
                self.close_stream().await;
                self.stop_polling();
                self.shared.set_attempts(0);
                self.set_status(ConnectionStatus::Disconnected);
                Some(Phase::Idle)
            }
        }
    }

    /// Record a failed attempt or a dropped stream and pick what comes next.
    async fn on_failure(&mut self, error: TransportError) -> Phase {
        self.close_stream().await;
        self.set_status(ConnectionStatus::Error);

        if error.is_permanent() {
            warn!("event stream unavailable ({}), switching to polling", error);
            return self.enter_polling();
        }

        let attempts = self.shared.attempts().saturating_add(1);
        self.shared.set_attempts(attempts);

        if self.config.backoff.is_exhausted(attempts) {
            warn!(
                "event stream failed {} times ({}), switching to polling",
                attempts, error
            );
            return self.enter_polling();
        }

        let delay = self.config.backoff.delay_for(attempts);
        warn!(
            "event stream error: {}, retrying in {:?} (attempt {}/{})",
            error, delay, attempts, self.config.backoff.max_attempts
        );
        self.emit(ClientEvent::RetryScheduled {
            attempt: attempts,
            delay,
        });
        Phase::Waiting(delay)
    }

    fn enter_polling(&mut self) -> Phase {
        self.set_status(ConnectionStatus::Disconnected);

        if !self.config.polling_enabled {
            warn!("polling fallback disabled, staying disconnected");
            return Phase::Idle;
        }

        if !self.shared.set_polling(true) {
            info!(
                "polling {} every {:?}",
                self.config.recent_url, self.config.poll_interval
            );
            self.emit(ClientEvent::PollingStarted);
        }

        if !self.fallback_announced {
            self.fallback_announced = true;
            self.emit(ClientEvent::Notice(format!(
                "real-time updates unavailable, polling every {}s",
                self.config.poll_interval.as_secs()
            )));
        }

        Phase::Polling
    }

    fn stop_polling(&mut self) {
        if self.shared.set_polling(false) {
            info!("polling stopped");
            self.emit(ClientEvent::PollingStopped);
        }
    }

    async fn close_stream(&mut self) {
        if let Err(e) = self.transport.disconnect().await {
            debug!("error closing event stream: {}", e);
        }
    }

    fn on_frame(&mut self, frame: SseFrame) {
        if let Some(retry) = frame.retry {
            debug!("server suggested a retry interval of {}ms", retry);
        }

        match parse_frame(&frame, Utc::now()) {
            Ok(StreamMessage::Event(event)) => {
                self.accept(event);
            }
            Ok(StreamMessage::KeepAlive) => trace!("keep-alive frame"),
            Err(e) => warn!("dropping malformed stream message: {}", e),
        }
    }

    /// Buffer an event and notify listeners. Returns `false` for duplicates.
    fn accept(&self, event: ValidationEvent) -> bool {
        let accepted = lock_buffer(&self.buffer).push(event.clone());
        if !accepted {
            trace!("duplicate event {} ignored", event.id);
            return false;
        }

        for listener in &self.listeners {
            listener(&event);
        }
        self.emit(ClientEvent::Event(event));
        true
    }

    fn set_status(&self, status: ConnectionStatus) {
        if self.shared.set_status(status) != status {
            self.emit(ClientEvent::Status(status));
        }
    }

    fn emit(&self, event: ClientEvent) {
        // No subscribers is fine.
        let _ = self.events_tx.send(event);
    }
}

fn lock_buffer(buffer: &Mutex<EventBuffer>) -> MutexGuard<'_, EventBuffer> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to a running [`RealtimeClient`].
///
/// Dropping the handle stops the client.
pub struct RealtimeHandle {
    commands: mpsc::Sender<Command>,
    cancel: CancellationToken,
    shared: Arc<SharedClientState>,
    buffer: Arc<Mutex<EventBuffer>>,
    events_tx: broadcast::Sender<ClientEvent>,
    task: Option<JoinHandle<()>>,
}

impl RealtimeHandle {
    /// Start connecting if idle or backing off. No effect while connecting,
    /// connected or polling.
    pub async fn connect(&self) -> ClientResult<()> {
        self.send(Command::Connect).await
    }

    /// Stop polling, reset the attempt counter and try the stream again.
    pub async fn reconnect(&self) -> ClientResult<()> {
        self.send(Command::Reconnect).await
    }

    /// Close the stream and clear retry and polling timers.
    ///
    /// Safe to call any number of times, including after shutdown.
    pub async fn disconnect(&self) -> ClientResult<()> {
        match self.send(Command::Disconnect).await {
            Err(ClientError::Stopped) => Ok(()),
            other => other,
        }
    }

    /// Stop the client task and wait for it to finish.
    pub async fn shutdown(mut self) -> ClientResult<()> {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.await.map_err(|e| ClientError::Join(e.to_string()))?;
        }
        Ok(())
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.shared.status()
    }

    /// Current connection status as its wire label.
    pub fn status_string(&self) -> String {
        self.shared.status_string()
    }

    /// Whether the polling fallback is active.
    pub fn is_polling(&self) -> bool {
        self.shared.is_polling()
    }

    /// Consecutive failed stream attempts.
    pub fn attempts(&self) -> u32 {
        self.shared.attempts()
    }

    /// Buffered events, newest first.
    pub fn events(&self) -> Vec<ValidationEvent> {
        lock_buffer(&self.buffer).snapshot()
    }

    /// The newest buffered event.
    pub fn latest(&self) -> Option<ValidationEvent> {
        lock_buffer(&self.buffer).latest().cloned()
    }

    /// Subscribe to client events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events_tx.subscribe()
    }

    /// Whether the client task is still running.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    async fn send(&self, command: Command) -> ClientResult<()> {
        if self.cancel.is_cancelled() {
            return Err(ClientError::Stopped);
        }
        self.commands
            .send(command)
            .await
            .map_err(|_| ClientError::Stopped)
    }
}

impl Drop for RealtimeHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
