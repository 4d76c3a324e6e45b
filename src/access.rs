use std::fmt;

use bitflags::bitflags;

/// Which kind of declaration a set of flags belongs to. Several JVMS bits
/// are shared between tables (`0x0020` is `ACC_SUPER` on a class and
/// `ACC_SYNCHRONIZED` on a method), so rendering needs the target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlagTarget {
    Class,
    Field,
    Method,
}

bitflags! {
    /// Access flags of a class, field or method.
    ///
    /// The low 16 bits are the `access_flags` item of the class file. Bit 17
    /// carries the `Deprecated` attribute, and the `Synthetic` attribute is
    /// folded into `ACC_SYNTHETIC`.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct AccessFlags: u32 {
        const ACC_PUBLIC = 0x0001;
        const ACC_PRIVATE = 0x0002;
        const ACC_PROTECTED = 0x0004;
        const ACC_STATIC = 0x0008;
        const ACC_FINAL = 0x0010;
        const ACC_SUPER = 0x0020;
        const ACC_SYNCHRONIZED = 0x0020;
        const ACC_VOLATILE = 0x0040;
        const ACC_BRIDGE = 0x0040;
        const ACC_TRANSIENT = 0x0080;
        const ACC_VARARGS = 0x0080;
        const ACC_NATIVE = 0x0100;
        const ACC_INTERFACE = 0x0200;
        const ACC_ABSTRACT = 0x0400;
        const ACC_STRICT = 0x0800;
        const ACC_SYNTHETIC = 0x1000;
        const ACC_ANNOTATION = 0x2000;
        const ACC_ENUM = 0x4000;
        const ACC_MODULE = 0x8000;
        /// Not a class-file bit: set when the `Deprecated` attribute is present.
        const ACC_DEPRECATED = 0x2_0000;
    }
}

impl AccessFlags {
    /// Flags as read from a class file; unknown bits are kept.
    pub fn new(access_flags: u16) -> Self {
        Self::from_bits_retain(u32::from(access_flags))
    }

    pub fn is_public(self) -> bool {
        self.contains(Self::ACC_PUBLIC)
    }

    pub fn is_protected(self) -> bool {
        self.contains(Self::ACC_PROTECTED)
    }

    pub fn is_private(self) -> bool {
        self.contains(Self::ACC_PRIVATE)
    }

    pub fn is_static(self) -> bool {
        self.contains(Self::ACC_STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(Self::ACC_FINAL)
    }

    pub fn is_volatile(self) -> bool {
        self.contains(Self::ACC_VOLATILE)
    }

    pub fn is_transient(self) -> bool {
        self.contains(Self::ACC_TRANSIENT)
    }

    pub fn is_synthetic(self) -> bool {
        self.contains(Self::ACC_SYNTHETIC)
    }

    pub fn is_enum(self) -> bool {
        self.contains(Self::ACC_ENUM)
    }

    pub fn is_deprecated(self) -> bool {
        self.contains(Self::ACC_DEPRECATED)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Self::ACC_ABSTRACT)
    }

    pub fn is_interface(self) -> bool {
        self.contains(Self::ACC_INTERFACE)
    }

    pub fn is_annotation(self) -> bool {
        self.contains(Self::ACC_ANNOTATION)
    }

    pub fn is_synchronized(self) -> bool {
        self.contains(Self::ACC_SYNCHRONIZED)
    }

    pub fn is_native(self) -> bool {
        self.contains(Self::ACC_NATIVE)
    }

    pub fn is_strict(self) -> bool {
        self.contains(Self::ACC_STRICT)
    }

    /// Render the modifiers that apply to `target`, in declaration order:
    /// visibility, structural modifiers, pseudo-flags, then `@Deprecated`.
    pub fn modifiers(self, target: FlagTarget) -> String {
        use FlagTarget::{Class, Field, Method};

        let mut parts = Vec::new();

        if self.is_public() {
            parts.push("public");
        }
        if self.is_protected() {
            parts.push("protected");
        }
        if self.is_private() {
            parts.push("private");
        }

        if target != Class && self.is_static() {
            parts.push("static");
        }
        if self.is_final() {
            parts.push("final");
        }
        if target != Field && self.is_abstract() {
            parts.push("abstract");
        }
        if target == Method && self.is_synchronized() {
            parts.push("synchronized");
        }
        if target == Field && self.is_volatile() {
            parts.push("volatile");
        }
        if target == Field && self.is_transient() {
            parts.push("transient");
        }
        if target == Method && self.is_native() {
            parts.push("native");
        }
        if target == Method && self.is_strict() {
            parts.push("strictfp");
        }

        if self.is_synthetic() {
            parts.push("(synthetic)");
        }
        if target != Method && self.is_enum() {
            parts.push("(enum)");
        }
        if target == Class && self.is_interface() {
            parts.push("(interface)");
        }
        if target == Class && self.is_annotation() {
            parts.push("(annotation)");
        }

        if self.is_deprecated() {
            parts.push("@Deprecated");
        }

        parts.join(" ")
    }
}

impl fmt::Display for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.bits())
    }
}
