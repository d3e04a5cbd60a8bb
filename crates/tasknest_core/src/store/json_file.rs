//! File-backed folder store.
//!
//! # Responsibility
//! - Read the folder document from the app's private data directory.
//! - Replace it atomically: temp file in the same directory, fsync, rename.
//!
//! # Invariants
//! - The target file is only ever replaced by rename, never truncated.
//! - A failed save leaves the previous document intact.

use super::codec;
use super::config::StoreConfig;
use super::{FolderStore, LoadedDocument, StoreError, StoreResult};
use crate::model::folder::Folder;
use log::{error, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::Builder;

/// Folder store persisting one JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.document_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FolderStore for JsonFileStore {
    fn load_document(&self) -> StoreResult<LoadedDocument> {
        let started_at = Instant::now();

        let result = fs::read(&self.path)
            .map_err(|source| StoreError::StorageUnavailable {
                path: self.path.clone(),
                source,
            })
            .and_then(|bytes| {
                codec::decode(&bytes).map_err(|source| StoreError::Parse {
                    path: self.path.clone(),
                    source,
                })
            });

        match result {
            Ok(decoded) => {
                if decoded.repaired_ids > 0 {
                    warn!(
                        "event=store_repair module=store backend=file repaired_ids={}",
                        decoded.repaired_ids
                    );
                }
                info!(
                    "event=store_load module=store status=ok backend=file folders={} duration_ms={}",
                    decoded.folders.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(decoded)
            }
            Err(err) => {
                // A missing document is the normal first-launch state.
                if err.is_missing() {
                    info!("event=store_load module=store status=empty backend=file");
                } else {
                    error!(
                        "event=store_load module=store status=error backend=file duration_ms={} error_code={} error={}",
                        started_at.elapsed().as_millis(),
                        err.code(),
                        err
                    );
                }
                Err(err)
            }
        }
    }

    fn save_all(&self, folders: &[Folder]) -> StoreResult<()> {
        let started_at = Instant::now();
        let bytes = codec::encode(folders).map_err(StoreError::Encode)?;

        match atomic_write(&self.path, &bytes) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok backend=file folders={} bytes={} duration_ms={}",
                    folders.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=store_save module=store status=error backend=file duration_ms={} error_code=write error={}",
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(StoreError::Write {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

/// Writes `content` to `path` via a sibling temp file and rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = Builder::new()
        .prefix(".folders-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
