// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;

fn read_back(argfile: &ArgFile) -> Vec<String> {
    let content = std::fs::read_to_string(argfile.path()).unwrap();
    content.lines().map(str::to_string).collect()
}

#[test]
fn round_trips_simple_arguments() {
    let args = vec!["-s".to_string(), "com.acme.Sim".to_string(), "-nr".to_string()];
    let argfile = ArgFile::write(&args).unwrap();
    assert_eq!(read_back(&argfile), args);
}

#[test]
fn preserves_empty_arguments() {
    let args = vec!["".to_string(), "x".to_string(), "".to_string()];
    let argfile = ArgFile::write(&args).unwrap();
    assert_eq!(read_back(&argfile), args);
}

#[test]
fn preserves_whitespace_and_unicode() {
    let args = vec!["two words".to_string(), "  padded  ".to_string(), "héllo".to_string()];
    let argfile = ArgFile::write(&args).unwrap();
    assert_eq!(read_back(&argfile), args);
}

#[test]
fn empty_vector_writes_empty_file() {
    let argfile = ArgFile::write(&[]).unwrap();
    assert_eq!(read_back(&argfile), Vec::<String>::new());
}

#[test]
fn rejects_newline_in_argument() {
    let args = vec!["fine".to_string(), "bad\narg".to_string()];
    let err = ArgFile::write(&args).unwrap_err();
    assert!(matches!(
        err,
        ArgFileError::EmbeddedLineBreak { index: 1, .. }
    ));
}

#[test]
fn rejects_carriage_return_in_argument() {
    let err = ArgFile::write(&["bad\rarg".to_string()]).unwrap_err();
    assert!(matches!(
        err,
        ArgFileError::EmbeddedLineBreak { index: 0, .. }
    ));
}

#[test]
fn file_is_removed_on_drop() {
    let path = {
        let argfile = ArgFile::write(&["x".to_string()]).unwrap();
        argfile.path().to_path_buf()
    };
    assert!(!path.exists());
}

proptest! {
    /// Any line-break-free argument vector survives the write/read cycle.
    #[test]
    fn round_trip_property(args in proptest::collection::vec("[^\r\n]{0,40}", 0..20)) {
        let argfile = ArgFile::write(&args).unwrap();
        prop_assert_eq!(read_back(&argfile), args);
    }
}
