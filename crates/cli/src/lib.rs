// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! vwrs - Real-time account validation events from a privileged access vault.
//!
//! This crate provides the functionality behind the `vaultwatch` CLI: a
//! client that streams validation events from the vault API, reconnects
//! with exponential backoff, and falls back to polling recent results.
//!
//! # Main Components
//!
//! - [`realtime::RealtimeClient`] - Stream driver with retry and polling fallback
//! - [`realtime::RealtimeHandle`] - Control and snapshot access to a running client
//! - [`Config`] - User configuration (`config.toml`)
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use vw_core::Session;
//! use vwrs::realtime::{RealtimeClient, RealtimeConfig};
//!
//! let session = Session::new("https://vault.example.com")?.with_token(token);
//! let mut client = RealtimeClient::new(session.clone(), RealtimeConfig::for_session(&session))?;
//! client.on_event(|event| println!("{} {}", event.event_type, event.id));
//! let handle = client.spawn();
//! // ...
//! handle.shutdown().await?;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
pub mod help;

pub mod config;
pub mod env;
pub mod error;
pub mod realtime;

pub use cli::{Cli, Command, ConfigCommand, GlobalArgs};
pub use config::Config;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

use commands::watch::WatchOptions;

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        global, command, ..
    } = cli;

    match command {
        Command::Watch {
            json,
            max_events,
            no_poll,
        } => commands::watch::run(
            &global,
            WatchOptions {
                json,
                max_events,
                polling: !no_poll,
            },
        ),
        Command::Recent { limit, json } => commands::recent::run(&global, limit, json),
        Command::Config(cmd) => commands::config::run(&global, cmd),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "vaultwatch", &mut std::io::stdout());
            Ok(())
        }
    }
}
