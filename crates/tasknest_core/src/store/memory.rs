//! In-memory folder store.
//!
//! Keeps the encoded document bytes rather than live structs, so loads go
//! through the same codec and repair path as the file store.

use super::codec;
use super::{FolderStore, LoadedDocument, StoreError, StoreResult};
use crate::model::folder::Folder;
use log::debug;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

const MEMORY_PATH: &str = ":memory:";

/// Folder store backed by an in-process buffer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Creates a store with no document, as on first launch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with raw document bytes.
    pub fn with_document(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Mutex::new(Some(bytes.into())),
        }
    }

    /// Returns a copy of the current raw document, if any.
    pub fn document(&self) -> Option<Vec<u8>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Vec<u8>>> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FolderStore for MemoryStore {
    fn load_document(&self) -> StoreResult<LoadedDocument> {
        let guard = self.lock();
        let bytes = guard.as_ref().ok_or_else(|| StoreError::StorageUnavailable {
            path: PathBuf::from(MEMORY_PATH),
            source: io::Error::new(io::ErrorKind::NotFound, "no document saved yet"),
        })?;
        let decoded = codec::decode(bytes).map_err(|source| StoreError::Parse {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;
        debug!(
            "event=store_load module=store status=ok backend=memory folders={} repaired_ids={}",
            decoded.folders.len(),
            decoded.repaired_ids
        );
        Ok(decoded)
    }

    fn save_all(&self, folders: &[Folder]) -> StoreResult<()> {
        let bytes = codec::encode(folders).map_err(StoreError::Encode)?;
        debug!(
            "event=store_save module=store status=ok backend=memory folders={} bytes={}",
            folders.len(),
            bytes.len()
        );
        *self.lock() = Some(bytes);
        Ok(())
    }
}
