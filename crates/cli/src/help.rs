// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let header = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::HEADER))));
    let literal = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::LITERAL))));
    let context = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::CONTEXT))));
    let error = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::BAD))));

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(context)
        .valid(context)
        .invalid(error)
        .error(error)
}

/// Main help template with colorized Options header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    format!(
        "\
{header_events}
  {watch}       Stream validation events as they happen
  {recent}      Show the most recent validation results

{header_setup}
  {config}      Show configuration
  {completion}  Generate shell completions
",
        header_events = colors::header("Validation Events:"),
        header_setup = colors::header("Setup:"),
        watch = colors::literal("watch"),
        recent = colors::literal("recent"),
        config = colors::literal("config"),
        completion = colors::literal("completion"),
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  vaultwatch config path                  Where settings are read from
  vaultwatch --url <url> recent           Check the API is reachable
  vaultwatch watch                        Tail events until Ctrl-C",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
