// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use vw_core::{Session, ValidationRecord};

use crate::cli::GlobalArgs;
use crate::colors;
use crate::display::format_record;
use crate::error::{Error, Result};
use crate::realtime::{HttpPoller, RecentSource, TransportError};

use super::{load_config, runtime};

/// Fetch and print the most recent validation results.
pub fn run(global: &GlobalArgs, limit: usize, json: bool) -> Result<()> {
    let (config, _) = load_config(global)?;
    let session = config.session()?;
    let url = session.endpoint(&config.realtime.recent_path);

    let mut records = runtime()?.block_on(fetch(session, &url, limit, config.request_timeout()))?;
    // Newest first, like the live event buffer
    records.sort_by(|a, b| b.validated_at.cmp(&a.validated_at));

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No recent validation results.");
        return Ok(());
    }

    let color = colors::should_colorize();
    for record in &records {
        println!("{}", format_record(record, color));
    }
    Ok(())
}

async fn fetch(
    session: Session,
    url: &str,
    limit: usize,
    timeout: Duration,
) -> Result<Vec<ValidationRecord>> {
    let mut poller = HttpPoller::new(session, timeout)?;
    poller
        .fetch_recent(url, limit)
        .await
        .map_err(|source| match source {
            TransportError::ConnectionFailed(_) => Error::Unreachable {
                url: url.to_string(),
                source,
            },
            other => Error::Transport(other),
        })
}
