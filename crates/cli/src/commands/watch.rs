// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use vw_core::{ConnectionStatus, Session, ValidationEvent};

use crate::cli::GlobalArgs;
use crate::colors;
use crate::display::{format_event, format_status};
use crate::error::{Error, Result};
use crate::realtime::{ClientEvent, RealtimeClient, RealtimeConfig};

use super::{load_config, runtime};

/// Options for `vaultwatch watch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchOptions {
    pub json: bool,
    pub max_events: Option<usize>,
    pub polling: bool,
}

/// Tail validation events until interrupted.
pub fn run(global: &GlobalArgs, options: WatchOptions) -> Result<()> {
    let (config, _) = load_config(global)?;
    let session = config.session()?;
    let mut realtime = config.realtime_config(&session);
    realtime.polling_enabled = options.polling;

    runtime()?.block_on(watch(session, realtime, options))
}

async fn watch(session: Session, config: RealtimeConfig, options: WatchOptions) -> Result<()> {
    let max_attempts = config.backoff.max_attempts;
    info!("watching {}", config.stream_url);

    let client = RealtimeClient::new(session, config)?;
    let mut events = client.subscribe();
    let handle = client.spawn();

    let out_color = !options.json && colors::should_colorize();
    let err_color = colors::should_colorize_stderr();
    let mut printed = 0usize;

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    let outcome = loop {
        let received = tokio::select! {
            _ = &mut interrupted => {
                info!("interrupted");
                break Ok(());
            }
            received = events.recv() => received,
        };

        match received {
            Ok(ClientEvent::Event(event)) => {
                print_event(&event, options.json, out_color)?;
                printed += 1;
                if options.max_events.is_some_and(|max| printed >= max) {
                    break Ok(());
                }
            }
            // Followed by PollingStarted, which says more
            Ok(ClientEvent::Status(ConnectionStatus::Disconnected)) if options.polling => {}
            Ok(ClientEvent::Status(status)) => {
                eprintln!("{}", format_status(status, status.as_str(), err_color));
                if status == ConnectionStatus::Disconnected && !options.polling {
                    break Err(Error::StreamUnavailable {
                        attempts: handle.attempts(),
                    });
                }
            }
            Ok(ClientEvent::RetryScheduled { attempt, delay }) => {
                eprintln!(
                    "retrying in {}s (attempt {}/{})",
                    delay.as_secs_f64(),
                    attempt,
                    max_attempts
                );
            }
            Ok(ClientEvent::PollingStarted) => {
                eprintln!(
                    "{}",
                    format_status(
                        ConnectionStatus::Disconnected,
                        "disconnected (polling)",
                        err_color
                    )
                );
            }
            Ok(ClientEvent::PollingStopped) => {}
            Ok(ClientEvent::Notice(message)) => eprintln!("notice: {}", message),
            Err(RecvError::Lagged(skipped)) => warn!("output fell behind, skipped {} update(s)", skipped),
            Err(RecvError::Closed) => break Ok(()),
        }
    };

    handle.shutdown().await?;
    outcome
}

fn print_event(event: &ValidationEvent, json: bool, color: bool) -> Result<()> {
    if json {
        println!("{}", event.to_json()?);
    } else {
        println!("{}", format_event(event, color));
    }
    Ok(())
}
