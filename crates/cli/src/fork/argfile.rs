// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Argument-file marshalling.
//!
//! Program arguments cross the process boundary through a temp file with one
//! argument per line, read back verbatim by the child bootstrap. This moves
//! the "command line too long" failure mode from the OS argv limit to a
//! file, which has no such limit. No escaping exists in the format, so
//! arguments containing line breaks are rejected up front instead of
//! silently corrupting the argument count on read-back.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

const ARG_FILE_PREFIX: &str = "simfork-";
const ARG_FILE_SUFFIX: &str = ".args";

/// A written argument file. The backing temp file is removed when this guard
/// drops, so it must outlive the child process that reads it.
#[derive(Debug)]
pub struct ArgFile {
    file: NamedTempFile,
}

impl ArgFile {
    /// Write `args` to a fresh temp file, one per line, UTF-8, no escaping.
    pub fn write(args: &[String]) -> Result<Self, ArgFileError> {
        for (index, arg) in args.iter().enumerate() {
            if arg.contains('\n') || arg.contains('\r') {
                return Err(ArgFileError::EmbeddedLineBreak {
                    index,
                    argument: arg.clone(),
                });
            }
        }

        let mut file = tempfile::Builder::new()
            .prefix(ARG_FILE_PREFIX)
            .suffix(ARG_FILE_SUFFIX)
            .tempfile()
            .map_err(ArgFileError::Io)?;
        for arg in args {
            writeln!(file, "{}", arg).map_err(ArgFileError::Io)?;
        }
        file.flush().map_err(ArgFileError::Io)?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Debug, Error)]
pub enum ArgFileError {
    #[error("failed to write argument file: {0}")]
    Io(#[source] std::io::Error),

    #[error("argument {index} contains a line break and cannot be passed through the argument file: {argument:?}")]
    EmbeddedLineBreak { index: usize, argument: String },
}

#[cfg(test)]
#[path = "argfile_tests.rs"]
mod tests;
