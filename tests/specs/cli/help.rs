// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use yare::parameterized;

fn vaultwatch() -> Command {
    let mut cmd = cargo_bin_cmd!("vaultwatch");
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands_and_options() {
    vaultwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Validation Events:"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("recent"))
        .stdout(predicate::str::contains("completion"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--token"));
}

#[parameterized(
    short = { "-h" },
    long = { "--help" },
)]
fn help_flags_work(flag: &str) {
    vaultwatch()
        .arg(flag)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Get started:"));
}

#[test]
fn without_arguments_shows_usage_and_fails() {
    vaultwatch()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[parameterized(
    watch = { "watch", "--max-events" },
    recent = { "recent", "--limit" },
    config = { "config", "show" },
    completion = { "completion", "<SHELL>" },
)]
fn command_help_shows_options(command: &str, expected: &str) {
    vaultwatch()
        .args([command, "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn watch_help_has_examples() {
    vaultwatch()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains("vaultwatch watch --json"));
}

#[parameterized(
    short = { "-v" },
    upper = { "-V" },
    long = { "--version" },
)]
fn version_flag(flag: &str) {
    vaultwatch()
        .arg(flag)
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_command_fails() {
    vaultwatch()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
