// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test support: synthesize minimal valid classfile bytes.
//!
//! Emits only the header the parser consumes (constant pool through the
//! interface table) plus empty field/method/attribute tables, which is a
//! structurally complete classfile as far as offset arithmetic goes.

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

/// Builder for classfile bytes used across unit and integration tests.
#[derive(Clone, Debug)]
pub struct ClassFileBuilder {
    name: String,
    super_name: String,
    interfaces: Vec<String>,
    access_flags: u16,
}

impl ClassFileBuilder {
    /// A public concrete class extending `java.lang.Object`.
    pub fn concrete(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_name: "java.lang.Object".to_string(),
            interfaces: Vec::new(),
            access_flags: ACC_PUBLIC | ACC_SUPER,
        }
    }

    /// Mark the class abstract.
    pub fn abstract_class(mut self) -> Self {
        self.access_flags |= ACC_ABSTRACT;
        self
    }

    /// Turn the class into an interface.
    pub fn interface(mut self) -> Self {
        self.access_flags |= ACC_INTERFACE | ACC_ABSTRACT;
        self.access_flags &= !ACC_SUPER;
        self
    }

    /// Set the superclass (dotted name).
    pub fn extends(mut self, super_name: &str) -> Self {
        self.super_name = super_name.to_string();
        self
    }

    /// Add a directly implemented interface (dotted name).
    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    /// Emit the classfile bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::new();
        let this_idx = pool.class(&self.name);
        let super_idx = pool.class(&self.super_name);
        let iface_idxs: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // minor
        out.extend_from_slice(&52u16.to_be_bytes()); // major: Java 8
        out.extend_from_slice(&pool.count().to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&self.access_flags.to_be_bytes());
        out.extend_from_slice(&this_idx.to_be_bytes());
        out.extend_from_slice(&super_idx.to_be_bytes());
        out.extend_from_slice(&(iface_idxs.len() as u16).to_be_bytes());
        for idx in iface_idxs {
            out.extend_from_slice(&idx.to_be_bytes());
        }
        // Empty fields / methods / attributes tables.
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out
    }

    /// Relative path of the classfile inside a class directory or jar,
    /// e.g. `com/acme/BasicSimulation.class`.
    pub fn class_path(&self) -> String {
        format!("{}.class", self.name.replace('.', "/"))
    }
}

struct PoolWriter {
    bytes: Vec<u8>,
    next_index: u16,
}

impl PoolWriter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            next_index: 1,
        }
    }

    fn utf8(&mut self, s: &str) -> u16 {
        self.bytes.push(1);
        self.bytes.extend_from_slice(&(s.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(s.as_bytes());
        let idx = self.next_index;
        self.next_index += 1;
        idx
    }

    fn class(&mut self, dotted: &str) -> u16 {
        let name_idx = self.utf8(&dotted.replace('.', "/"));
        self.bytes.push(7);
        self.bytes.extend_from_slice(&name_idx.to_be_bytes());
        let idx = self.next_index;
        self.next_index += 1;
        idx
    }

    fn count(&self) -> u16 {
        self.next_index
    }
}
