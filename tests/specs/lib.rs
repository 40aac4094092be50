// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for the `vaultwatch` binary.
//!
//! The spec files under `cli/` are compiled as integration tests of the
//! `vaultwatch` package (see its `[[test]]` targets). Each one drives the
//! real binary against a throwaway config directory and, where the network
//! is involved, a local HTTP stub from `cli/support.rs`.
