use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

use crate::classfile::ClassfileError;

/// Errors raised while loading archives or assembling a report.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    ArgumentInvalid(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("corrupt archive {location}: {source}")]
    ArchiveCorrupt {
        /// Archive name, or `archive!/entry` when a single entry failed.
        location: String,
        #[source]
        source: ZipError,
    },

    #[error("malformed class file {entry}: {source}")]
    ClassfileMalformed {
        entry: String,
        #[source]
        source: ClassfileError,
    },

    #[error("table row has {actual} values but the table has {expected} columns")]
    TableShapeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn corrupt(location: impl Into<String>, source: impl Into<ZipError>) -> Self {
        Error::ArchiveCorrupt {
            location: location.into(),
            source: source.into(),
        }
    }
}
