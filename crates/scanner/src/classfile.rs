// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal classfile header parser.
//!
//! Reads just enough of a compiled class to answer the scanning questions:
//! what is this class called, what does it extend and implement, and is it
//! concrete. Everything after the interface table (fields, methods,
//! attributes) is never touched.
//!
//! All sizes and indices are untrusted and validated against the buffer
//! before use; a truncated or corrupt file yields an error, never a panic.

use thiserror::Error;

const MAGIC: u32 = 0xCAFE_BABE;

const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;
const ACC_ANNOTATION: u16 = 0x2000;
const ACC_MODULE: u16 = 0x8000;

/// Parsed header of a single compiled class.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    /// Fully qualified name in dotted form, e.g. `com.acme.BasicSimulation`.
    pub name: String,
    /// Dotted superclass name; `None` only for `java.lang.Object` and modules.
    pub super_name: Option<String>,
    /// Dotted names of directly implemented interfaces.
    pub interfaces: Vec<String>,
    access_flags: u16,
}

impl ClassInfo {
    /// Parse the header of a classfile.
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFileError> {
        let mut r = Reader::new(bytes);

        if r.read_u32()? != MAGIC {
            return Err(ClassFileError::BadMagic);
        }
        let _minor = r.read_u16()?;
        let _major = r.read_u16()?;

        let pool = ConstantPool::parse(&mut r)?;

        let access_flags = r.read_u16()?;
        let this_class = r.read_u16()?;
        let super_class = r.read_u16()?;

        let name = pool.class_name(this_class)?;
        let super_name = if super_class == 0 {
            None
        } else {
            Some(pool.class_name(super_class)?)
        };

        let interface_count = r.read_u16()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            let idx = r.read_u16()?;
            interfaces.push(pool.class_name(idx)?);
        }

        Ok(Self {
            name,
            super_name,
            interfaces,
            access_flags,
        })
    }

    /// A concrete class: instantiable, not an interface, annotation,
    /// abstract class, or module descriptor.
    pub fn is_concrete(&self) -> bool {
        self.access_flags & (ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION | ACC_MODULE) == 0
    }

    /// Module descriptors (`module-info.class`) carry no real type.
    pub fn is_module(&self) -> bool {
        self.access_flags & ACC_MODULE != 0
    }
}

/// The subset of the constant pool the header needs: Utf8 payloads and
/// Class name indirections. Other entry kinds only matter for their width.
struct ConstantPool {
    entries: Vec<Constant>,
}

enum Constant {
    Utf8(String),
    Class(u16),
    Other,
}

impl ConstantPool {
    fn parse(r: &mut Reader<'_>) -> Result<Self, ClassFileError> {
        let count = r.read_u16()?;
        if count == 0 {
            return Err(ClassFileError::Truncated);
        }
        // Entry 0 is unused; long/double entries occupy two slots.
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Other);
        while entries.len() < count as usize {
            let tag = r.read_u8()?;
            match tag {
                // Utf8
                1 => {
                    let len = r.read_u16()? as usize;
                    let bytes = r.read_bytes(len)?;
                    // Modified UTF-8 differs from UTF-8 only for NUL and
                    // supplementary chars, neither of which occurs in class
                    // names; lossy decoding keeps corrupt pools non-fatal.
                    entries.push(Constant::Utf8(String::from_utf8_lossy(bytes).into_owned()));
                }
                // Integer / Float
                3 | 4 => {
                    r.skip(4)?;
                    entries.push(Constant::Other);
                }
                // Long / Double: two slots
                5 | 6 => {
                    r.skip(8)?;
                    entries.push(Constant::Other);
                    entries.push(Constant::Other);
                }
                // Class
                7 => {
                    let name_idx = r.read_u16()?;
                    entries.push(Constant::Class(name_idx));
                }
                // String / MethodType / Module / Package
                8 | 16 | 19 | 20 => {
                    r.skip(2)?;
                    entries.push(Constant::Other);
                }
                // Fieldref / Methodref / InterfaceMethodref / NameAndType /
                // Dynamic / InvokeDynamic
                9 | 10 | 11 | 12 | 17 | 18 => {
                    r.skip(4)?;
                    entries.push(Constant::Other);
                }
                // MethodHandle
                15 => {
                    r.skip(3)?;
                    entries.push(Constant::Other);
                }
                other => return Err(ClassFileError::UnknownConstantTag(other)),
            }
        }
        Ok(Self { entries })
    }

    fn class_name(&self, idx: u16) -> Result<String, ClassFileError> {
        match self.entries.get(idx as usize) {
            Some(Constant::Class(name_idx)) => match self.entries.get(*name_idx as usize) {
                Some(Constant::Utf8(s)) => Ok(s.replace('/', ".")),
                _ => Err(ClassFileError::BadConstantRef(*name_idx)),
            },
            _ => Err(ClassFileError::BadConstantRef(idx)),
        }
    }
}

/// Bounds-checked big-endian cursor.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ClassFileError> {
        let end = self.pos.checked_add(n).ok_or(ClassFileError::Truncated)?;
        let slice = self.buf.get(self.pos..end).ok_or(ClassFileError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<(), ClassFileError> {
        self.read_bytes(n).map(|_| ())
    }

    fn read_u8(&mut self) -> Result<u8, ClassFileError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, ClassFileError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, ClassFileError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

#[derive(Debug, Error)]
pub enum ClassFileError {
    #[error("not a classfile (bad magic)")]
    BadMagic,

    #[error("classfile truncated")]
    Truncated,

    #[error("unknown constant pool tag {0}")]
    UnknownConstantTag(u8),

    #[error("constant pool index {0} is not the expected kind")]
    BadConstantRef(u16),
}

#[cfg(test)]
#[path = "classfile_tests.rs"]
mod tests;
