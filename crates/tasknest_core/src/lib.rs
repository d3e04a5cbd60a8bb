//! Core domain logic for TaskNest.
//! This crate is the single source of truth for folder/task invariants.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::folder::{new_record_id, Folder, FolderId, Task, TaskId};
pub use service::confirm::{ConfirmPrompt, DestructiveAction};
pub use service::folder_service::{FolderService, FolderServiceError, ServiceResult};
pub use service::views::{FolderSummary, FolderTasks, TaskEntry};
pub use store::{
    FolderStore, JsonFileStore, LoadedDocument, MemoryStore, StoreConfig, StoreConfigError,
    StoreError, StoreResult, DEFAULT_FILE_NAME,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
