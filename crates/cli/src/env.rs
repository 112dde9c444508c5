// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables simfork reads outside of clap's `env`
//! bindings are defined here. Use these accessors instead of calling
//! `std::env::var()` directly.

use std::path::PathBuf;

/// `JAVA_HOME` — root of a JVM installation.
pub const JAVA_HOME: &str = "JAVA_HOME";

/// `PATH` — executable search path.
pub const PATH: &str = "PATH";

/// `JAVA_HOME` as a path, if set and non-empty.
pub fn java_home() -> Option<PathBuf> {
    std::env::var(JAVA_HOME)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Raw `PATH` value, if set.
pub fn path() -> Option<String> {
    std::env::var(PATH).ok()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
