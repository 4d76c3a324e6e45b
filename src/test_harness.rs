//! Fixtures shared by unit tests: class-file bytes, in-memory archives and
//! ready-made classpaths.

use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Write};

use zip::{CompressionMethod, ZipWriter};
use zip::write::SimpleFileOptions;

use crate::access::AccessFlags;
use crate::classfile::MAGIC;
use crate::classpath::Classpath;
use crate::model::{ClassDef, JarFile};

const TAG_UTF8: u8 = 1;
const TAG_CLASS: u8 = 7;

struct Member {
    access: AccessFlags,
    name: String,
    descriptor: String,
    attributes: Vec<(String, Vec<u8>)>,
}

/// Assembles a minimal but well-formed class file.
pub(crate) struct ClassFileBuilder {
    class_name: String,
    major_version: u16,
    minor_version: u16,
    access: AccessFlags,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    references: Vec<String>,
    attributes: Vec<(String, Vec<u8>)>,
}

impl ClassFileBuilder {
    pub(crate) fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            major_version: 52,
            minor_version: 0,
            access: AccessFlags::ACC_PUBLIC | AccessFlags::ACC_SUPER,
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            references: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub(crate) fn version(mut self, major: u16, minor: u16) -> Self {
        self.major_version = major;
        self.minor_version = minor;
        self
    }

    pub(crate) fn access(mut self, access: AccessFlags) -> Self {
        self.access = access;
        self
    }

    pub(crate) fn super_class(mut self, super_class: &str) -> Self {
        self.super_class = Some(super_class.to_string());
        self
    }

    pub(crate) fn no_super_class(mut self) -> Self {
        self.super_class = None;
        self
    }

    pub(crate) fn interface(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub(crate) fn field(self, access: AccessFlags, name: &str, descriptor: &str) -> Self {
        self.field_with_attributes(access, name, descriptor, &[])
    }

    pub(crate) fn field_with_attributes(
        mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        attributes: &[(&str, &[u8])],
    ) -> Self {
        self.fields.push(member(access, name, descriptor, attributes));
        self
    }

    pub(crate) fn method(mut self, access: AccessFlags, name: &str, descriptor: &str) -> Self {
        self.methods.push(member(access, name, descriptor, &[]));
        self
    }

    /// Add a `CONSTANT_Class_info` entry that nothing else points at, the
    /// way a method body would reference a class.
    pub(crate) fn reference(mut self, class_name: &str) -> Self {
        self.references.push(class_name.to_string());
        self
    }

    pub(crate) fn class_attribute(mut self, name: &str, data: &[u8]) -> Self {
        self.attributes.push((name.to_string(), data.to_vec()));
        self
    }

    /// Byte offset of the `this_class` index in [`ClassFileBuilder::build`]'s output.
    pub(crate) fn this_class_offset(&self) -> usize {
        self.assemble().1
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        self.assemble().0
    }

    fn assemble(&self) -> (Vec<u8>, usize) {
        let mut pool = PoolBuilder::default();
        let this_class = pool.class(&self.class_name);
        let super_class = self
            .super_class
            .as_deref()
            .map_or(0, |name| pool.class(name));
        let interfaces: Vec<u16> = self
            .interfaces
            .iter()
            .map(|name| pool.class(name))
            .collect();
        for reference in &self.references {
            pool.class(reference);
        }
        let fields = pool.members(&self.fields);
        let methods = pool.members(&self.methods);
        let attributes = pool.attributes(&self.attributes);

        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC.to_be_bytes());
        out.extend_from_slice(&self.minor_version.to_be_bytes());
        out.extend_from_slice(&self.major_version.to_be_bytes());
        out.extend_from_slice(&pool.count().to_be_bytes());
        for entry in &pool.entries {
            out.extend_from_slice(entry);
        }
        out.extend_from_slice(&(self.access.bits() as u16).to_be_bytes());
        let this_class_offset = out.len();
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
        for interface in interfaces {
            out.extend_from_slice(&interface.to_be_bytes());
        }
        out.extend_from_slice(&fields);
        out.extend_from_slice(&methods);
        out.extend_from_slice(&attributes);
        (out, this_class_offset)
    }
}

fn member(
    access: AccessFlags,
    name: &str,
    descriptor: &str,
    attributes: &[(&str, &[u8])],
) -> Member {
    Member {
        access,
        name: name.to_string(),
        descriptor: descriptor.to_string(),
        attributes: attributes
            .iter()
            .map(|(name, data)| (name.to_string(), data.to_vec()))
            .collect(),
    }
}

#[derive(Default)]
struct PoolBuilder {
    entries: Vec<Vec<u8>>,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl PoolBuilder {
    fn count(&self) -> u16 {
        self.entries.len() as u16 + 1
    }

    fn push(&mut self, entry: Vec<u8>) -> u16 {
        self.entries.push(entry);
        self.entries.len() as u16
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8.get(value) {
            return *index;
        }
        let mut entry = vec![TAG_UTF8];
        entry.extend_from_slice(&(value.len() as u16).to_be_bytes());
        entry.extend_from_slice(value.as_bytes());
        let index = self.push(entry);
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(index) = self.classes.get(name) {
            return *index;
        }
        let name_index = self.utf8(name);
        let mut entry = vec![TAG_CLASS];
        entry.extend_from_slice(&name_index.to_be_bytes());
        let index = self.push(entry);
        self.classes.insert(name.to_string(), index);
        index
    }

    fn members(&mut self, members: &[Member]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(members.len() as u16).to_be_bytes());
        for member in members {
            out.extend_from_slice(&(member.access.bits() as u16).to_be_bytes());
            out.extend_from_slice(&self.utf8(&member.name).to_be_bytes());
            out.extend_from_slice(&self.utf8(&member.descriptor).to_be_bytes());
            out.extend_from_slice(&self.attributes(&member.attributes));
        }
        out
    }

    fn attributes(&mut self, attributes: &[(String, Vec<u8>)]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
        for (name, data) in attributes {
            out.extend_from_slice(&self.utf8(name).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            out.extend_from_slice(data);
        }
        out
    }
}

/// A ZIP archive holding the given entries in order. Names ending in `/`
/// become directory entries.
pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    write_zip(entries, CompressionMethod::Deflated)
}

/// Like [`zip_bytes`] with uncompressed entries, so entry data can be
/// found and altered in the archive bytes.
pub(crate) fn stored_zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    write_zip(entries, CompressionMethod::Stored)
}

fn write_zip(entries: &[(&str, &[u8])], compression: CompressionMethod) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        let options = SimpleFileOptions::default().compression_method(compression);
        if name.ends_with('/') {
            zip.add_directory(*name, options).expect("add directory");
        } else {
            zip.start_file(*name, options).expect("start entry");
            zip.write_all(data).expect("write entry");
        }
    }
    zip.finish().expect("finish archive").into_inner()
}

/// A public Java 8 class extending `java/lang/Object` with no members.
pub(crate) fn class_def(class_name: &str) -> ClassDef {
    ClassDef {
        class_name: class_name.to_string(),
        major_version: 52,
        minor_version: 0,
        access: AccessFlags::ACC_PUBLIC | AccessFlags::ACC_SUPER,
        super_name: Some("java/lang/Object".to_string()),
        interfaces: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        referenced_classes: BTreeSet::new(),
    }
}

/// Like [`class_def`], referencing the given classes.
pub(crate) fn class_def_referencing(class_name: &str, references: &[&str]) -> ClassDef {
    let mut class_def = class_def(class_name);
    class_def.referenced_classes = references.iter().map(|name| name.to_string()).collect();
    class_def
}

/// Builds a [`Classpath`]; classes are added to the most recent JAR file.
#[derive(Default)]
pub(crate) struct ClasspathBuilder {
    jar_files: Vec<(String, u64, Vec<ClassDef>)>,
}

impl ClasspathBuilder {
    pub(crate) fn create() -> Self {
        Self::default()
    }

    pub(crate) fn add_jar_file(self, file_name: &str) -> Self {
        self.add_jar_file_sized(file_name, 0)
    }

    pub(crate) fn add_jar_file_sized(mut self, file_name: &str, file_size: u64) -> Self {
        self.jar_files
            .push((file_name.to_string(), file_size, Vec::new()));
        self
    }

    pub(crate) fn add_class_def(self, class_name: &str) -> Self {
        self.add_class(class_def(class_name))
    }

    pub(crate) fn add_class(mut self, class_def: ClassDef) -> Self {
        self.jar_files
            .last_mut()
            .expect("add a JAR file before its classes")
            .2
            .push(class_def);
        self
    }

    pub(crate) fn build(self) -> Classpath {
        let jar_files = self
            .jar_files
            .into_iter()
            .map(|(file_name, file_size, class_defs)| {
                JarFile::new(file_name, file_size, class_defs).expect("valid JAR file")
            })
            .collect();
        Classpath::new(jar_files)
    }
}
