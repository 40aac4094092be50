// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod config;
pub mod recent;
pub mod watch;

use std::path::PathBuf;

use crate::cli::GlobalArgs;
use crate::config::{resolve_config_path, Config};
use crate::env;
use crate::error::{Error, Result};

/// Load the config file with flag and environment overrides applied,
/// without validating it.
pub fn load_config_unchecked(global: &GlobalArgs) -> Result<(Config, PathBuf)> {
    let path = resolve_config_path(global.config.as_deref(), env::config_path())?;
    let config = Config::load(&path)?.with_overrides(
        global.url.clone(),
        [global.token.clone(), env::token()],
    );
    Ok((config, path))
}

/// Load and validate the effective configuration.
pub fn load_config(global: &GlobalArgs) -> Result<(Config, PathBuf)> {
    let (config, path) = load_config_unchecked(global)?;
    config.validate()?;
    Ok((config, path))
}

/// Create the tokio runtime used by network commands.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))
}
