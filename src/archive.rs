use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Error, Result};

/// Reads the entries of a ZIP container (JAR or WAR), from disk or from
/// an in-memory buffer such as a JAR nested in a WAR.
pub struct ArchiveReader<R> {
    label: String,
    size: u64,
    archive: ZipArchive<R>,
}

impl ArchiveReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let label = path.display().to_string();
        let file = File::open(path).map_err(|err| Error::corrupt(&label, err))?;
        let size = file
            .metadata()
            .map_err(|err| Error::corrupt(&label, err))?
            .len();
        Self::new(label, size, file)
    }
}

impl ArchiveReader<Cursor<Vec<u8>>> {
    pub fn from_bytes(label: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let size = data.len() as u64;
        Self::new(label.into(), size, Cursor::new(data))
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    fn new(label: String, size: u64, reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader).map_err(|err| Error::corrupt(&label, err))?;
        Ok(Self {
            label,
            size,
            archive,
        })
    }

    /// Path or name used in error messages.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Size of the container in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Entries in central-directory order.
    pub fn entries(&mut self) -> Entries<'_, R> {
        Entries {
            reader: self,
            next: 0,
        }
    }

    /// Header of the entry at `index`; its bytes are read on demand.
    pub fn entry(&mut self, index: usize) -> Result<ArchiveEntry<'_, R>> {
        let Self { label, archive, .. } = self;
        let (name, is_dir, size) = {
            let file = archive
                .by_index(index)
                .map_err(|err| Error::corrupt(format!("{label}#{index}"), err))?;
            (file.name().to_string(), file.is_dir(), file.size())
        };
        Ok(ArchiveEntry {
            label,
            archive,
            index,
            name,
            is_dir,
            size,
        })
    }
}

/// Lending cursor over the entries of an [`ArchiveReader`].
pub struct Entries<'a, R> {
    reader: &'a mut ArchiveReader<R>,
    next: usize,
}

impl<R: Read + Seek> Entries<'_, R> {
    pub fn next_entry(&mut self) -> Option<Result<ArchiveEntry<'_, R>>> {
        if self.next >= self.reader.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.reader.entry(index))
    }
}

/// One entry of an archive.
pub struct ArchiveEntry<'a, R> {
    label: &'a str,
    archive: &'a mut ZipArchive<R>,
    index: usize,
    name: String,
    is_dir: bool,
    size: u64,
}

impl<R: Read + Seek> ArchiveEntry<'_, R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Uncompressed size from the entry header.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the whole entry. A CRC or length mismatch fails with
    /// [`Error::ArchiveCorrupt`].
    pub fn read_bytes(self) -> Result<Vec<u8>> {
        let Self {
            label,
            archive,
            index,
            name,
            ..
        } = self;
        let location = format!("{label}!/{name}");
        let mut file = archive
            .by_index(index)
            .map_err(|err| Error::corrupt(&location, err))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|err| Error::corrupt(&location, err))?;
        Ok(data)
    }
}
