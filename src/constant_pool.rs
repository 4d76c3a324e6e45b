use crate::classfile::ClassfileError;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

/// Big-endian cursor over class-file bytes.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn u8(&mut self) -> Result<u8, ClassfileError> {
        Ok(self.bytes(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16, ClassfileError> {
        let bytes = self.bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, ClassfileError> {
        let bytes = self.bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn bytes(&mut self, len: usize) -> Result<&'a [u8], ClassfileError> {
        let start = self.offset;
        let slice = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or(ClassfileError::Truncated { offset: start })?;
        self.offset = start + len;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<(), ClassfileError> {
        self.bytes(len).map(|_| ())
    }
}

#[derive(Clone, Debug)]
enum Constant {
    /// Index 0 and the second slot of a long or double.
    Unusable,
    Utf8(String),
    Class { name_index: u16 },
    Other,
}

/// Constant pool reduced to the entries needed to name classes and members.
#[derive(Debug)]
pub(crate) struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    /// Read `constant_pool_count` followed by the pool itself.
    pub(crate) fn parse(reader: &mut ByteReader<'_>) -> Result<Self, ClassfileError> {
        let count = reader.u16()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);
        let mut index = 1u16;
        while index < count {
            let tag = reader.u8()?;
            match tag {
                TAG_UTF8 => {
                    let len = reader.u16()? as usize;
                    let bytes = reader.bytes(len)?;
                    let value = decode_modified_utf8(bytes)
                        .ok_or(ClassfileError::InvalidUtf8 { index })?;
                    entries.push(Constant::Utf8(value));
                }
                TAG_CLASS => {
                    let name_index = reader.u16()?;
                    entries.push(Constant::Class { name_index });
                }
                TAG_LONG | TAG_DOUBLE => {
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    entries.push(Constant::Unusable);
                    index = index.saturating_add(1);
                }
                TAG_INTEGER | TAG_FLOAT => {
                    reader.skip(4)?;
                    entries.push(Constant::Other);
                }
                TAG_FIELDREF | TAG_METHODREF | TAG_INTERFACE_METHODREF | TAG_NAME_AND_TYPE
                | TAG_DYNAMIC | TAG_INVOKE_DYNAMIC => {
                    reader.skip(4)?;
                    entries.push(Constant::Other);
                }
                TAG_METHOD_HANDLE => {
                    reader.skip(3)?;
                    entries.push(Constant::Other);
                }
                TAG_STRING | TAG_METHOD_TYPE | TAG_MODULE | TAG_PACKAGE => {
                    reader.skip(2)?;
                    entries.push(Constant::Other);
                }
                _ => return Err(ClassfileError::UnknownTag { tag, index }),
            }
            index = index.saturating_add(1);
        }
        Ok(Self { entries })
    }

    fn entry(&self, index: u16) -> Result<&Constant, ClassfileError> {
        if index == 0 {
            return Err(self.out_of_range(index));
        }
        self.entries
            .get(index as usize)
            .ok_or_else(|| self.out_of_range(index))
    }

    fn out_of_range(&self, index: u16) -> ClassfileError {
        ClassfileError::IndexOutOfRange {
            index,
            count: self.entries.len(),
        }
    }

    pub(crate) fn utf8(&self, index: u16) -> Result<&str, ClassfileError> {
        match self.entry(index)? {
            Constant::Utf8(value) => Ok(value),
            _ => Err(ClassfileError::UnexpectedConstant {
                index,
                expected: "Utf8",
            }),
        }
    }

    pub(crate) fn class_name(&self, index: u16) -> Result<&str, ClassfileError> {
        match self.entry(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassfileError::UnexpectedConstant {
                index,
                expected: "Class",
            }),
        }
    }

    /// Names of all `CONSTANT_Class_info` entries, in pool order.
    pub(crate) fn class_names(&self) -> impl Iterator<Item = Result<&str, ClassfileError>> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Constant::Class { name_index } => Some(self.utf8(*name_index)),
            _ => None,
        })
    }
}

/// Decode the JVM's modified UTF-8. Returns `None` on a malformed byte
/// sequence; unpaired surrogates decode to U+FFFD.
pub(crate) fn decode_modified_utf8(bytes: &[u8]) -> Option<String> {
    if bytes.iter().all(|b| (0x01..0x80).contains(b)) {
        return std::str::from_utf8(bytes).ok().map(str::to_owned);
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        match lead {
            0x01..=0x7f => {
                units.push(lead as u16);
                i += 1;
            }
            0xc0..=0xdf => {
                let b2 = continuation(bytes, i + 1)?;
                units.push((((lead & 0x1f) as u16) << 6) | b2);
                i += 2;
            }
            0xe0..=0xef => {
                let b2 = continuation(bytes, i + 1)?;
                let b3 = continuation(bytes, i + 2)?;
                units.push((((lead & 0x0f) as u16) << 12) | (b2 << 6) | b3);
                i += 3;
            }
            // NUL is always encoded on two bytes; four-byte forms do not exist.
            _ => return None,
        }
    }

    Some(
        char::decode_utf16(units)
            .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
    )
}

fn continuation(bytes: &[u8], index: usize) -> Option<u16> {
    let byte = *bytes.get(index)?;
    ((byte & 0xc0) == 0x80).then_some((byte & 0x3f) as u16)
}
