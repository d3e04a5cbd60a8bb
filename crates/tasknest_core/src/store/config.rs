//! Store location configuration.
//!
//! The host app injects its private data directory; core never falls back
//! to a process-global path.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name of the folder document inside the data directory.
pub const DEFAULT_FILE_NAME: &str = "folders.json";

/// Rejected store configuration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfigError {
    EmptyDataDir,
    RelativeDataDir(String),
    InvalidFileName(String),
}

impl Display for StoreConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataDir => write!(f, "data_dir cannot be empty"),
            Self::RelativeDataDir(value) => {
                write!(f, "data_dir must be an absolute path, got `{value}`")
            }
            Self::InvalidFileName(value) => {
                write!(f, "document file name must be a plain file name, got `{value}`")
            }
        }
    }
}

impl Error for StoreConfigError {}

/// Where the folder document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_dir: PathBuf,
    file_name: String,
}

impl StoreConfig {
    /// Builds a config for an absolute data directory and the default file name.
    pub fn new(data_dir: &str) -> Result<Self, StoreConfigError> {
        let trimmed = data_dir.trim();
        if trimmed.is_empty() {
            return Err(StoreConfigError::EmptyDataDir);
        }
        let path = Path::new(trimmed);
        if !path.is_absolute() {
            return Err(StoreConfigError::RelativeDataDir(trimmed.to_string()));
        }
        Ok(Self {
            data_dir: path.to_path_buf(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        })
    }

    /// Overrides the document file name.
    pub fn with_file_name(mut self, file_name: &str) -> Result<Self, StoreConfigError> {
        let trimmed = file_name.trim();
        let is_plain = !trimmed.is_empty()
            && Path::new(trimmed).file_name().and_then(|name| name.to_str()) == Some(trimmed);
        if !is_plain {
            return Err(StoreConfigError::InvalidFileName(file_name.to_string()));
        }
        self.file_name = trimmed.to_string();
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn document_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}
