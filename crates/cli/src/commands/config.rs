// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::{ConfigCommand, GlobalArgs};
use crate::config::resolve_config_path;
use crate::env;
use crate::error::Result;

use super::load_config_unchecked;

/// Execute a config subcommand.
pub fn run(global: &GlobalArgs, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => {
            let path = resolve_config_path(global.config.as_deref(), env::config_path())?;
            println!("{}", path.display());
        }
        ConfigCommand::Show { json } => {
            let (config, path) = load_config_unchecked(global)?;
            let shown = config.redacted();
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                let note = if path.exists() {
                    ""
                } else {
                    " (not found, showing defaults)"
                };
                println!("# {}{}", path.display(), note);
                print!("{}", shown.to_toml()?);
            }

            if let Err(e) = config.validate() {
                eprintln!("warning: {}", e);
            }
        }
    }
    Ok(())
}
