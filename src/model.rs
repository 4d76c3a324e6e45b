use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::access::{AccessFlags, FlagTarget};
use crate::descriptor::{field_type_name, method_type_names};
use crate::error::{Error, Result};
use crate::names::{package_of, to_dot_form};

/// A class decoded from a class file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassDef {
    /// Slash form, e.g. `java/lang/String`.
    pub class_name: String,
    pub major_version: u16,
    pub minor_version: u16,
    pub access: AccessFlags,
    /// `None` only for `java/lang/Object` and module descriptors.
    pub super_name: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    /// Classes named in the constant pool, excluding this class and
    /// primitive arrays. Array types are reduced to their element class.
    pub referenced_classes: BTreeSet<String>,
}

impl ClassDef {
    pub fn display_name(&self) -> String {
        to_dot_form(&self.class_name)
    }

    /// Package in slash form; empty for the default package.
    pub fn package_name(&self) -> &str {
        package_of(&self.class_name)
    }

    pub fn version(&self) -> ClassVersion {
        ClassVersion {
            major: self.major_version,
            minor: self.minor_version,
        }
    }

    pub fn modifiers(&self) -> String {
        self.access.modifiers(FlagTarget::Class)
    }

    /// Whether two definitions expose the same members and hierarchy.
    /// Unlike `==`, the class-file version and the constant-pool
    /// references are ignored.
    pub fn has_same_api(&self, other: &ClassDef) -> bool {
        self.class_name == other.class_name
            && self.access == other.access
            && self.super_name == other.super_name
            && self.interfaces == other.interfaces
            && self.fields == other.fields
            && self.methods == other.methods
    }
}

/// Class-file version, ordered numerically.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClassVersion {
    pub major: u16,
    pub minor: u16,
}

impl ClassVersion {
    const PREVIEW_MINOR: u16 = 0xffff;

    /// Java release that introduced this class-file version.
    pub fn java_release(&self) -> String {
        match self.major {
            0..=45 => "Java 1.1".to_string(),
            46..=48 => format!("Java 1.{}", self.major - 44),
            major => format!("Java {}", major - 44),
        }
    }

    pub fn is_preview(&self) -> bool {
        self.major >= 56 && self.minor == Self::PREVIEW_MINOR
    }
}

impl fmt::Display for ClassVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}.{})", self.java_release(), self.major, self.minor)?;
        if self.is_preview() {
            write!(f, " (preview)")?;
        }
        Ok(())
    }
}

/// A field declared by a class.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDef {
    pub access: AccessFlags,
    pub name: String,
    /// JVMS descriptor, e.g. `Ljava/lang/String;`.
    pub descriptor: String,
}

impl FieldDef {
    pub fn new(access: AccessFlags, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            access,
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn modifiers(&self) -> String {
        self.access.modifiers(FlagTarget::Field)
    }

    /// Declaration as it would read in Java source, e.g.
    /// `public static final java.lang.String NAME`.
    pub fn display_name(&self) -> String {
        let field_type = field_type_name(&self.descriptor).unwrap_or_else(|| self.descriptor.clone());
        join_declaration(&self.modifiers(), &format!("{field_type} {}", self.name))
    }
}

impl fmt::Display for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldDef[{}]", self.display_name())
    }
}

/// A method declared by a class.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MethodDef {
    pub access: AccessFlags,
    pub name: String,
    /// JVMS descriptor, e.g. `(I)Ljava/lang/String;`.
    pub descriptor: String,
}

impl MethodDef {
    pub fn new(access: AccessFlags, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            access,
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn modifiers(&self) -> String {
        self.access.modifiers(FlagTarget::Method)
    }

    pub fn display_name(&self) -> String {
        let signature = match method_type_names(&self.descriptor) {
            Some((parameters, return_type)) => {
                format!("{return_type} {}({})", self.name, parameters.join(", "))
            }
            None => format!("{}{}", self.name, self.descriptor),
        };
        join_declaration(&self.modifiers(), &signature)
    }
}

impl fmt::Display for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodDef[{}]", self.display_name())
    }
}

fn join_declaration(modifiers: &str, rest: &str) -> String {
    if modifiers.is_empty() {
        rest.to_string()
    } else {
        format!("{modifiers} {rest}")
    }
}

/// One archive on the classpath and the classes it defines.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JarFile {
    file_name: String,
    file_size: u64,
    class_defs: Vec<ClassDef>,
    release_versions: BTreeSet<u32>,
}

impl JarFile {
    /// `file_name` is a basename; `class_defs` keep their given order and
    /// must not repeat a class name.
    pub fn new(file_name: impl Into<String>, file_size: u64, class_defs: Vec<ClassDef>) -> Result<Self> {
        let file_name = file_name.into();
        if file_name.is_empty() {
            return Err(Error::ArgumentInvalid("JAR file name is empty".to_string()));
        }
        let mut seen = HashSet::with_capacity(class_defs.len());
        for class_def in &class_defs {
            if !seen.insert(class_def.class_name.as_str()) {
                return Err(Error::ArgumentInvalid(format!(
                    "class {} defined twice in {file_name}",
                    class_def.display_name()
                )));
            }
        }
        Ok(Self {
            file_name,
            file_size,
            class_defs,
            release_versions: BTreeSet::new(),
        })
    }

    /// Record the `META-INF/versions/N/` directories found in a
    /// multi-release archive.
    pub fn with_release_versions(mut self, release_versions: BTreeSet<u32>) -> Self {
        self.release_versions = release_versions;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn class_defs(&self) -> &[ClassDef] {
        &self.class_defs
    }

    pub fn class_def(&self, class_name: &str) -> Option<&ClassDef> {
        self.class_defs
            .iter()
            .find(|class_def| class_def.class_name == class_name)
    }

    pub fn release_versions(&self) -> &BTreeSet<u32> {
        &self.release_versions
    }

    pub fn is_multi_release(&self) -> bool {
        !self.release_versions.is_empty()
    }
}

impl fmt::Display for JarFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JarFile[{},{}]", self.file_name, self.class_defs.len())
    }
}
