// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use std::collections::HashMap;
use std::io::Read;
use tempfile::TempDir;

/// Read the manifest back out of the jar and fold continuation lines.
fn read_manifest(descriptor: &BooterDescriptor) -> HashMap<String, String> {
    let file = std::fs::File::open(descriptor.path()).unwrap();
    let mut jar = zip::ZipArchive::new(file).unwrap();
    let mut entry = jar.by_name("META-INF/MANIFEST.MF").unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();

    let mut attributes = HashMap::new();
    let mut current: Option<(String, String)> = None;
    for line in content.split("\r\n") {
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(rest);
            }
        } else {
            if let Some((name, value)) = current.take() {
                attributes.insert(name, value);
            }
            if let Some((name, value)) = line.split_once(": ") {
                current = Some((name.to_string(), value.to_string()));
            }
        }
    }
    if let Some((name, value)) = current.take() {
        attributes.insert(name, value);
    }
    attributes
}

fn decode_file_uri(uri: &str) -> PathBuf {
    let rest = uri.strip_prefix("file://").unwrap();
    let mut bytes = Vec::new();
    let mut chars = rest.bytes();
    while let Some(b) = chars.next() {
        if b == b'%' {
            let hi = chars.next().unwrap();
            let lo = chars.next().unwrap();
            let hex = String::from_utf8(vec![hi, lo]).unwrap();
            bytes.push(u8::from_str_radix(&hex, 16).unwrap());
        } else {
            bytes.push(b);
        }
    }
    let mut s = String::from_utf8(bytes).unwrap();
    if s.ends_with('/') && s.len() > 1 {
        s.pop();
    }
    PathBuf::from(s)
}

// =========================================================================
// URI encoding
// =========================================================================

#[test]
fn unix_file_uri() {
    assert_eq!(
        file_uri(Path::new("/opt/libs/engine.jar"), false, Platform::Unix),
        "file:///opt/libs/engine.jar"
    );
}

#[test]
fn directory_uri_gets_trailing_slash() {
    assert_eq!(
        file_uri(Path::new("/build/classes"), true, Platform::Unix),
        "file:///build/classes/"
    );
}

#[test]
fn spaces_are_percent_encoded() {
    assert_eq!(
        file_uri(Path::new("/home/jane doe/libs/a.jar"), false, Platform::Unix),
        "file:///home/jane%20doe/libs/a.jar"
    );
}

#[test]
fn percent_sign_is_encoded() {
    assert_eq!(
        file_uri(Path::new("/tmp/100%/x.jar"), false, Platform::Unix),
        "file:///tmp/100%25/x.jar"
    );
}

#[test]
fn windows_backslashes_become_slashes() {
    assert_eq!(
        file_uri(Path::new(r"C:\Users\jane\lib.jar"), false, Platform::Windows),
        "file:///C:/Users/jane/lib.jar"
    );
}

// =========================================================================
// Manifest wrapping
// =========================================================================

#[test]
fn short_attributes_are_single_lines() {
    let bytes = manifest_bytes("io.gatling.app.Gatling", "file:///a.jar");
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("Manifest-Version: 1.0\r\n"));
    assert!(text.contains("Class-Path: file:///a.jar\r\n"));
    assert!(text.contains("Main-Class: io.gatling.app.Gatling\r\n"));
    assert!(text.ends_with("\r\n\r\n"));
}

#[test]
fn long_values_wrap_at_72_bytes() {
    let long_value = "x".repeat(500);
    let bytes = manifest_bytes("Main", &long_value);
    let text = String::from_utf8(bytes).unwrap();
    for line in text.split("\r\n") {
        assert!(
            line.len() <= MANIFEST_LINE_MAX,
            "line exceeds {} bytes: {:?}",
            MANIFEST_LINE_MAX,
            line
        );
    }
    // Continuation lines start with exactly one space and the value
    // reassembles losslessly.
    let reassembled: String = text
        .split("\r\n")
        .filter_map(|l| l.strip_prefix(' '))
        .fold(
            text.split("\r\n")
                .find(|l| l.starts_with("Class-Path: "))
                .unwrap()
                .trim_start_matches("Class-Path: ")
                .to_string(),
            |mut acc, cont| {
                acc.push_str(cont);
                acc
            },
        );
    assert_eq!(reassembled, long_value);
}

// =========================================================================
// Materialization round-trip
// =========================================================================

#[test]
fn declared_classpath_round_trips_with_spaces_and_order() {
    let root = TempDir::new().unwrap();
    let dir_entry = root.path().join("build classes");
    std::fs::create_dir(&dir_entry).unwrap();
    let jar_a = root.path().join("a space.jar");
    let jar_b = root.path().join("b.jar");
    std::fs::write(&jar_a, b"jar").unwrap();
    std::fs::write(&jar_b, b"jar").unwrap();

    let classpath = vec![dir_entry.clone(), jar_b.clone(), jar_a.clone()];
    let descriptor = materialize(&classpath, "io.gatling.app.Gatling", Platform::Unix).unwrap();

    let manifest = read_manifest(&descriptor);
    assert_eq!(manifest.get("Manifest-Version").unwrap(), "1.0");
    assert_eq!(manifest.get("Main-Class").unwrap(), "io.gatling.app.Gatling");

    let decoded: Vec<PathBuf> = manifest
        .get("Class-Path")
        .unwrap()
        .split(' ')
        .map(decode_file_uri)
        .collect();
    assert_eq!(decoded, classpath);
}

#[test]
fn directory_entries_declared_with_trailing_slash() {
    let root = TempDir::new().unwrap();
    let dir_entry = root.path().join("classes");
    std::fs::create_dir(&dir_entry).unwrap();

    let descriptor = materialize(&[dir_entry], "Main", Platform::Unix).unwrap();
    assert!(descriptor.class_path_uris()[0].ends_with('/'));
}

#[test]
fn long_classpath_survives_manifest_wrapping() {
    let root = TempDir::new().unwrap();
    let mut classpath = Vec::new();
    for i in 0..40 {
        let jar = root.path().join(format!("dependency-artifact-{:02}.jar", i));
        std::fs::write(&jar, b"jar").unwrap();
        classpath.push(jar);
    }

    let descriptor = materialize(&classpath, "Main", Platform::Unix).unwrap();
    let manifest = read_manifest(&descriptor);
    let decoded: Vec<PathBuf> = manifest
        .get("Class-Path")
        .unwrap()
        .split(' ')
        .map(decode_file_uri)
        .collect();
    assert_eq!(decoded, classpath);
}

#[test]
fn booter_jar_is_removed_on_drop() {
    let root = TempDir::new().unwrap();
    let jar = root.path().join("a.jar");
    std::fs::write(&jar, b"jar").unwrap();

    let booter_path = {
        let descriptor = materialize(&[jar], "Main", Platform::Unix).unwrap();
        descriptor.path().to_path_buf()
    };
    assert!(!booter_path.exists());
}
