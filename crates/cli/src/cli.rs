// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use crate::colors;
use crate::help;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "vaultwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Watch account validation events from a privileged access vault")]
#[command(
    long_about = "Watch account validation events from a privileged access vault.\n\n\
    Streams events over server-sent events, retries with exponential backoff, \
    and falls back to polling recent results when the stream is unavailable."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
// Allow the unit type field pattern which is required for clap's ArgAction::Version/Help
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

/// Connection options accepted by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Read configuration from <path>
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Base URL of the vault API (overrides config)
    #[arg(long, global = true, value_name = "url")]
    pub url: Option<String>,

    /// API token (overrides config and VAULTWATCH_TOKEN)
    #[arg(long, global = true, value_name = "token")]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stream validation events until interrupted
    #[command(after_help = colors::examples("\
Examples:
  vaultwatch watch                     Tail events as text
  vaultwatch watch --json              One JSON object per line
  vaultwatch watch -n 20               Stop after 20 events
  vaultwatch watch --no-poll           Never fall back to polling"))]
    Watch {
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        /// Exit after this many events
        #[arg(long, short = 'n', value_name = "N", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        max_events: Option<usize>,

        /// Do not poll when the stream is unavailable
        #[arg(long)]
        no_poll: bool,
    },

    /// Show the most recent validation results
    #[command(after_help = colors::examples("\
Examples:
  vaultwatch recent                    Last 10 results
  vaultwatch recent -n 50 --json       Last 50 results as JSON"))]
    Recent {
        /// Number of results to fetch
        #[arg(long, short = 'n', default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        limit: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    #[command(after_help = colors::examples("\
Examples:
  vaultwatch completion bash           Bash completions
  vaultwatch completion zsh            Zsh completions"))]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (token redacted)
    Show {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Print the config file path
    Path,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
