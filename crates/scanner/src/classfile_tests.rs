// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::testkit::ClassFileBuilder;

#[test]
fn parses_concrete_class() {
    let bytes = ClassFileBuilder::concrete("com.acme.LoadTest")
        .extends("io.gatling.core.scenario.Simulation")
        .build();
    let info = ClassInfo::parse(&bytes).unwrap();
    assert_eq!(info.name, "com.acme.LoadTest");
    assert_eq!(
        info.super_name.as_deref(),
        Some("io.gatling.core.scenario.Simulation")
    );
    assert!(info.interfaces.is_empty());
    assert!(info.is_concrete());
}

#[test]
fn parses_abstract_class() {
    let bytes = ClassFileBuilder::concrete("com.acme.BaseTest")
        .abstract_class()
        .build();
    let info = ClassInfo::parse(&bytes).unwrap();
    assert!(!info.is_concrete());
}

#[test]
fn parses_interface() {
    let bytes = ClassFileBuilder::concrete("com.acme.Marker").interface().build();
    let info = ClassInfo::parse(&bytes).unwrap();
    assert!(!info.is_concrete());
}

#[test]
fn parses_interface_table() {
    let bytes = ClassFileBuilder::concrete("com.acme.Both")
        .implements("com.acme.A")
        .implements("com.acme.B")
        .build();
    let info = ClassInfo::parse(&bytes).unwrap();
    assert_eq!(info.interfaces, vec!["com.acme.A", "com.acme.B"]);
}

#[test]
fn rejects_bad_magic() {
    let err = ClassInfo::parse(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05]).unwrap_err();
    assert!(matches!(err, ClassFileError::BadMagic));
}

#[test]
fn rejects_truncated_file() {
    let bytes = ClassFileBuilder::concrete("com.acme.Cut").build();
    for len in [0, 4, 9, bytes.len() / 2] {
        let err = ClassInfo::parse(&bytes[..len]).unwrap_err();
        assert!(
            matches!(err, ClassFileError::Truncated | ClassFileError::BadMagic),
            "len {} gave {:?}",
            len,
            err
        );
    }
}

#[test]
fn rejects_unknown_constant_tag() {
    // Hand-build a pool with an invalid tag.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&52u16.to_be_bytes());
    bytes.extend_from_slice(&2u16.to_be_bytes()); // pool count: one entry
    bytes.push(99); // bogus tag
    let err = ClassInfo::parse(&bytes).unwrap_err();
    assert!(matches!(err, ClassFileError::UnknownConstantTag(99)));
}

#[test]
fn handles_two_slot_constants() {
    // A Long entry occupies two pool slots; indices after it must still
    // resolve. Build the pool by hand: [Long, Utf8, Class].
    let name = "com/acme/Wide";
    let mut pool = Vec::new();
    pool.push(5u8); // Long tag
    pool.extend_from_slice(&0u64.to_be_bytes());
    pool.push(1u8); // Utf8 at index 3
    pool.extend_from_slice(&(name.len() as u16).to_be_bytes());
    pool.extend_from_slice(name.as_bytes());
    pool.push(7u8); // Class at index 4 -> Utf8 index 3
    pool.extend_from_slice(&3u16.to_be_bytes());

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&52u16.to_be_bytes());
    bytes.extend_from_slice(&5u16.to_be_bytes()); // count: slots 1..=4
    bytes.extend_from_slice(&pool);
    bytes.extend_from_slice(&0x0021u16.to_be_bytes()); // flags
    bytes.extend_from_slice(&4u16.to_be_bytes()); // this_class
    bytes.extend_from_slice(&0u16.to_be_bytes()); // super_class: none
    bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces

    let info = ClassInfo::parse(&bytes).unwrap();
    assert_eq!(info.name, "com.acme.Wide");
    assert!(info.super_name.is_none());
}
