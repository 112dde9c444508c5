// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Classpath materialization through a booter jar.
//!
//! Operating systems cap the command line, and a real test classpath plus
//! its dependencies routinely exceeds that cap. Instead of passing the
//! classpath natively, the launcher writes a minimal jar whose manifest
//! declares the full classpath and starts the child with `-jar <booter>` —
//! a one-entry command line regardless of classpath size.
//!
//! The manifest is the wire contract: `Class-Path` holds space-separated
//! `file:` URIs (whitespace is the separator, so native paths are
//! percent-encoded), and directory entries carry a trailing `/` — without
//! it the JVM classloader silently ignores them.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::platform::Platform;

const BOOTER_PREFIX: &str = "simfork-booter";
const BOOTER_SUFFIX: &str = ".jar";

/// Manifest lines are capped at 72 bytes; longer values continue on
/// space-prefixed follow-up lines.
const MANIFEST_LINE_MAX: usize = 72;

/// An ephemeral booter jar. Deleted when the descriptor drops; never reused
/// across forks because classpath contents may differ per launch.
#[derive(Debug)]
pub struct BooterDescriptor {
    path: TempPath,
    main_class: String,
    class_path_uris: Vec<String>,
}

impl BooterDescriptor {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn main_class(&self) -> &str {
        &self.main_class
    }

    /// The declared classpath, in order.
    pub fn class_path_uris(&self) -> &[String] {
        &self.class_path_uris
    }
}

/// Write a booter jar declaring `classpath` and `main_class`.
pub fn materialize(
    classpath: &[PathBuf],
    main_class: &str,
    platform: Platform,
) -> Result<BooterDescriptor, BooterError> {
    let uris: Vec<String> = classpath
        .iter()
        .map(|entry| {
            let is_dir = entry.is_dir();
            file_uri(entry, is_dir, platform)
        })
        .collect();

    let manifest = manifest_bytes(main_class, &uris.join(" "));

    let file = tempfile::Builder::new()
        .prefix(BOOTER_PREFIX)
        .suffix(BOOTER_SUFFIX)
        .tempfile()
        .map_err(BooterError::Io)?;

    let mut jar = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    jar.start_file("META-INF/MANIFEST.MF", options)
        .map_err(BooterError::Zip)?;
    jar.write_all(&manifest).map_err(BooterError::Io)?;
    let file = jar.finish().map_err(BooterError::Zip)?;

    Ok(BooterDescriptor {
        path: file.into_temp_path(),
        main_class: main_class.to_string(),
        class_path_uris: uris,
    })
}

/// Encode a local path as a `file:` URI. Directories get the trailing `/`
/// the classloader requires; bytes outside the RFC 2396 path set are
/// percent-encoded (spaces in install paths being the common case).
fn file_uri(path: &Path, is_dir: bool, platform: Platform) -> String {
    let native = path.to_string_lossy();
    let mut slashed = if platform.is_windows() {
        native.replace('\\', "/")
    } else {
        native.into_owned()
    };
    if !slashed.starts_with('/') {
        // Windows drive-letter paths need a root slash in URI form.
        slashed.insert(0, '/');
    }
    if is_dir && !slashed.ends_with('/') {
        slashed.push('/');
    }

    let mut uri = String::with_capacity(slashed.len() + 8);
    uri.push_str("file://");
    for byte in slashed.bytes() {
        if is_uri_path_byte(byte) {
            uri.push(byte as char);
        } else {
            uri.push_str(&format!("%{:02X}", byte));
        }
    }
    uri
}

/// Bytes allowed verbatim in a URI path per RFC 2396: unreserved characters
/// plus the path-legal punctuation.
fn is_uri_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'_'
                | b'.'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
                | b'/'
        )
}

/// Render the manifest: version, classpath declaration, entry point, with
/// 72-byte line wrapping and CRLF terminators.
fn manifest_bytes(main_class: &str, class_path: &str) -> Vec<u8> {
    let mut out = Vec::new();
    write_attribute(&mut out, "Manifest-Version", "1.0");
    write_attribute(&mut out, "Class-Path", class_path);
    write_attribute(&mut out, "Main-Class", main_class);
    out.extend_from_slice(b"\r\n");
    out
}

fn write_attribute(out: &mut Vec<u8>, name: &str, value: &str) {
    let line = format!("{}: {}", name, value);
    let bytes = line.as_bytes();
    let mut pos = 0;
    let mut first = true;
    while pos < bytes.len() || first {
        let budget = if first {
            MANIFEST_LINE_MAX
        } else {
            out.push(b' ');
            MANIFEST_LINE_MAX - 1
        };
        let end = (pos + budget).min(bytes.len());
        out.extend_from_slice(&bytes[pos..end]);
        out.extend_from_slice(b"\r\n");
        pos = end;
        first = false;
    }
}

#[derive(Debug, Error)]
pub enum BooterError {
    #[error("failed to write booter jar: {0}")]
    Io(#[source] std::io::Error),

    #[error("failed to assemble booter jar: {0}")]
    Zip(#[source] zip::result::ZipError),
}

#[cfg(test)]
#[path = "booter_tests.rs"]
mod tests;
