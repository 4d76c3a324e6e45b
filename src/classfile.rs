//! Decoding of the binary class-file format into a [`ClassDef`].
//!
//! Only the parts needed for classpath analysis are kept: version, access
//! flags, class hierarchy, field and method signatures, the `Deprecated` and
//! `Synthetic` attributes, and the classes named by the constant pool.
//! Method bodies and every other attribute are skipped by length.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::trace;

use crate::access::AccessFlags;
use crate::constant_pool::{ByteReader, ConstantPool};
use crate::model::{ClassDef, FieldDef, MethodDef};

pub const MAGIC: u32 = 0xCAFE_BABE;

const ATTRIBUTE_DEPRECATED: &str = "Deprecated";
const ATTRIBUTE_SYNTHETIC: &str = "Synthetic";

/// Reasons a class file cannot be decoded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClassfileError {
    #[error("bad magic {0:#010x}")]
    BadMagic(u32),

    #[error("unexpected end of data at offset {offset}")]
    Truncated { offset: usize },

    #[error("constant pool index {index} out of range (pool size {count})")]
    IndexOutOfRange { index: u16, count: usize },

    #[error("constant pool entry {index} is not a {expected} entry")]
    UnexpectedConstant { index: u16, expected: &'static str },

    #[error("invalid modified UTF-8 in constant pool entry {index}")]
    InvalidUtf8 { index: u16 },

    #[error("unknown constant pool tag {tag} at entry {index}")]
    UnknownTag { tag: u8, index: u16 },
}

/// Decode one class file.
pub fn decode_class(data: &[u8]) -> Result<ClassDef, ClassfileError> {
    let mut reader = ByteReader::new(data);

    let magic = reader.u32()?;
    if magic != MAGIC {
        return Err(ClassfileError::BadMagic(magic));
    }
    let minor_version = reader.u16()?;
    let major_version = reader.u16()?;

    let pool = ConstantPool::parse(&mut reader)?;

    let access_flags = reader.u16()?;
    let this_class = reader.u16()?;
    let super_class = reader.u16()?;
    let class_name = pool.class_name(this_class)?.to_string();
    let super_name = if super_class == 0 {
        None
    } else {
        Some(pool.class_name(super_class)?.to_string())
    };

    let interface_count = reader.u16()?;
    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        let index = reader.u16()?;
        interfaces.push(pool.class_name(index)?.to_string());
    }

    let fields = read_members(&mut reader, &pool)?
        .into_iter()
        .map(|member| FieldDef::new(member.access, member.name, member.descriptor))
        .collect();
    let methods = read_members(&mut reader, &pool)?
        .into_iter()
        .map(|member| MethodDef::new(member.access, member.name, member.descriptor))
        .collect();
    let attribute_flags = read_attribute_flags(&mut reader, &pool)?;

    let referenced_classes = collect_references(&pool, &class_name)?;

    trace!(
        class = %class_name,
        major_version,
        references = referenced_classes.len(),
        "decoded class file"
    );

    Ok(ClassDef {
        class_name,
        major_version,
        minor_version,
        access: AccessFlags::new(access_flags) | attribute_flags,
        super_name,
        interfaces,
        fields,
        methods,
        referenced_classes,
    })
}

struct Member {
    access: AccessFlags,
    name: String,
    descriptor: String,
}

/// Read a `fields` or `methods` table; both share the same layout.
fn read_members(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Member>, ClassfileError> {
    let count = reader.u16()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access_flags = reader.u16()?;
        let name = pool.utf8(reader.u16()?)?.to_string();
        let descriptor = pool.utf8(reader.u16()?)?.to_string();
        let attribute_flags = read_attribute_flags(reader, pool)?;
        members.push(Member {
            access: AccessFlags::new(access_flags) | attribute_flags,
            name,
            descriptor,
        });
    }
    Ok(members)
}

/// Walk an attribute table, returning the access bits implied by the
/// `Deprecated` and `Synthetic` attributes.
fn read_attribute_flags(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
) -> Result<AccessFlags, ClassfileError> {
    let count = reader.u16()?;
    let mut flags = AccessFlags::empty();
    for _ in 0..count {
        let name = pool.utf8(reader.u16()?)?;
        let length = reader.u32()? as usize;
        match name {
            ATTRIBUTE_DEPRECATED => flags |= AccessFlags::ACC_DEPRECATED,
            ATTRIBUTE_SYNTHETIC => flags |= AccessFlags::ACC_SYNTHETIC,
            _ => {}
        }
        reader.skip(length)?;
    }
    Ok(flags)
}

fn collect_references(
    pool: &ConstantPool,
    class_name: &str,
) -> Result<BTreeSet<String>, ClassfileError> {
    let mut referenced = BTreeSet::new();
    for name in pool.class_names() {
        if let Some(element) = element_class_name(name?)
            && element != class_name
        {
            referenced.insert(element.to_string());
        }
    }
    Ok(referenced)
}

/// Peel array dimensions off a `CONSTANT_Class_info` name. Returns `None`
/// for arrays of primitives.
fn element_class_name(name: &str) -> Option<&str> {
    if !name.starts_with('[') {
        return Some(name);
    }
    name.trim_start_matches('[')
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
}
