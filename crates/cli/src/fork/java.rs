// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JVM launcher resolution.
//!
//! Search order: explicit override, then `JAVA_HOME`, then the `PATH`.
//! Failure is fatal and happens before any process is spawned.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::env;
use crate::platform::Platform;

/// A resolved JVM launcher, canonicalized for the spawn platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaExecutable {
    path: PathBuf,
}

impl JavaExecutable {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Locate the launcher. `explicit` comes from `--java` and wins outright;
    /// it must point at an existing file.
    pub fn locate(explicit: Option<&Path>, platform: Platform) -> Result<Self, JavaError> {
        let found = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(JavaError::OverrideMissing(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => Self::from_java_home(platform)
                .or_else(|| Self::from_path(platform))
                .ok_or(JavaError::NotFound)?,
        };
        Ok(Self {
            path: PathBuf::from(
                platform.short_alias_path(&found.to_string_lossy()),
            ),
        })
    }

    fn from_java_home(platform: Platform) -> Option<PathBuf> {
        let home = env::java_home()?;
        let candidate = home.join("bin").join(platform.java_binary());
        candidate.is_file().then_some(candidate)
    }

    fn from_path(platform: Platform) -> Option<PathBuf> {
        let path = env::path()?;
        for dir in path.split(platform.path_list_separator()) {
            if dir.is_empty() {
                continue;
            }
            let candidate = Path::new(dir).join(platform.java_binary());
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

#[derive(Debug, Error)]
pub enum JavaError {
    #[error("the configured java executable {0} does not exist")]
    OverrideMissing(PathBuf),

    #[error("couldn't locate java; pass --java or set the JAVA_HOME environment variable")]
    NotFound,
}

#[cfg(test)]
#[path = "java_tests.rs"]
mod tests;
