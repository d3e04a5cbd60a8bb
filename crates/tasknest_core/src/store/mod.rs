//! Folder document storage.
//!
//! # Responsibility
//! - Translate between the in-memory folder collection and one serialized
//!   JSON document.
//! - Expose whole-document `load_all`/`save_all` only; no partial patches.
//!
//! # Invariants
//! - A save replaces the document atomically; a reader never observes a
//!   truncated or half-written document.
//! - Load failures are returned, never swallowed. Callers pick the fallback.

use crate::model::folder::Folder;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod codec;
mod config;
mod json_file;
mod memory;

pub use config::{StoreConfig, StoreConfigError, DEFAULT_FILE_NAME};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while reading or writing the folder document.
#[derive(Debug)]
pub enum StoreError {
    /// Document is missing or cannot be read.
    StorageUnavailable { path: PathBuf, source: io::Error },
    /// Document content is not a valid folder collection.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Replacing the document failed; the previous document is untouched.
    Write { path: PathBuf, source: io::Error },
    /// Collection could not be serialized.
    Encode(serde_json::Error),
}

impl StoreError {
    /// Returns `true` when the document simply does not exist yet.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }

    /// Short stable label used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable { .. } if self.is_missing() => "missing",
            Self::StorageUnavailable { .. } => "unavailable",
            Self::Parse { .. } => "parse",
            Self::Write { .. } => "write",
            Self::Encode(_) => "encode",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable { path, source } => {
                write!(f, "folder document unavailable at `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "folder document at `{}` is not valid: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write folder document `{}`: {source}", path.display())
            }
            Self::Encode(source) => write!(f, "failed to encode folder document: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::Encode(source) => Some(source),
        }
    }
}

/// One decoded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub folders: Vec<Folder>,
    /// Number of folder/task ids assigned during decode. Non-zero means the
    /// stored document differs from `folders` until it is saved back.
    pub repaired_ids: usize,
}

/// Whole-document persistence contract for the folder collection.
pub trait FolderStore {
    /// Reads and parses the full collection, reporting id repairs.
    fn load_document(&self) -> StoreResult<LoadedDocument>;

    /// Reads and parses the full collection.
    fn load_all(&self) -> StoreResult<Vec<Folder>> {
        self.load_document().map(|document| document.folders)
    }

    /// Serializes and atomically replaces the full collection.
    fn save_all(&self, folders: &[Folder]) -> StoreResult<()>;
}

impl<S: FolderStore + ?Sized> FolderStore for &S {
    fn load_document(&self) -> StoreResult<LoadedDocument> {
        (**self).load_document()
    }

    fn save_all(&self, folders: &[Folder]) -> StoreResult<()> {
        (**self).save_all(folders)
    }
}
