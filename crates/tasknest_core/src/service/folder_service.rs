//! Folder/task use-case service.
//!
//! # Responsibility
//! - Provide the convenience mutators screens call, each built strictly on
//!   whole-document `load_all` -> modify -> `save_all`.
//! - Own the load fallback policy shared by every caller.
//! - Serialize mutations through one FIFO queue.
//!
//! # Invariants
//! - Names are trimmed and must not be blank.
//! - A missing document reads as an empty collection. Any other load failure
//!   aborts a mutation, so unreadable data is never overwritten.
//! - A mutation that changes nothing performs no write, unless the loaded
//!   document needed id repair.
//! - Ids handed out by any read are already on disk, so they stay valid for
//!   later calls.
//! - Deleting a folder deletes its tasks with it.

use crate::model::folder::{find_folder, find_folder_mut, Folder, FolderId, Task, TaskId};
use crate::service::queue::MutationQueue;
use crate::service::views::{
    flatten_tasks, group_tasks, summarize_folders, FolderSummary, FolderTasks, TaskEntry,
};
use crate::store::{FolderStore, LoadedDocument, StoreError, StoreResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, FolderServiceError>;

/// Errors from folder/task use-cases.
#[derive(Debug)]
pub enum FolderServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// Target folder does not exist.
    FolderNotFound(FolderId),
    /// Folder exists but holds no task with this id.
    TaskNotFound { folder_id: FolderId, task_id: TaskId },
    /// Storage-level failure.
    Store(StoreError),
}

impl FolderServiceError {
    /// Returns `true` for the recoverable "referenced record is gone" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FolderNotFound(_) | Self::TaskNotFound { .. })
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidName => "invalid_name",
            Self::FolderNotFound(_) => "folder_not_found",
            Self::TaskNotFound { .. } => "task_not_found",
            Self::Store(err) => err.code(),
        }
    }
}

impl Display for FolderServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::FolderNotFound(id) => write!(f, "folder not found: {id}"),
            Self::TaskNotFound { folder_id, task_id } => {
                write!(f, "task not found: {task_id} in folder {folder_id}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FolderServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for FolderServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Whether a mutation touched the collection.
enum Outcome<T> {
    Changed(T),
    Unchanged(T),
}

/// Folder/task service over an injected store.
pub struct FolderService<S: FolderStore> {
    store: S,
    queue: MutationQueue,
}

impl<S: FolderStore> FolderService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self {
            store,
            queue: MutationQueue::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the full collection, propagating every failure.
    ///
    /// Ids assigned by legacy repair are saved back before returning.
    pub fn load_all(&self) -> StoreResult<Vec<Folder>> {
        let document = self.store.load_document()?;
        if document.repaired_ids == 0 {
            return Ok(document.folders);
        }
        self.persist_repairs()
    }

    /// Replaces the full collection. Queued behind in-flight mutations.
    pub fn save_all(&self, folders: &[Folder]) -> StoreResult<()> {
        let _turn = self.queue.enter();
        self.store.save_all(folders)
    }

    /// Loads the collection for display.
    ///
    /// Missing or unreadable documents degrade to an empty collection.
    pub fn snapshot(&self) -> Vec<Folder> {
        match self.store.load_document() {
            Ok(document) if document.repaired_ids > 0 => match self.persist_repairs() {
                Ok(folders) => folders,
                Err(err) => {
                    warn!(
                        "event=store_repair module=service status=error error_code={}",
                        err.code()
                    );
                    document.folders
                }
            },
            Ok(document) => document.folders,
            Err(err) => {
                if !err.is_missing() {
                    warn!(
                        "event=store_load_fallback module=service status=degraded reason={}",
                        err.code()
                    );
                }
                Vec::new()
            }
        }
    }

    pub fn get_folder(&self, folder_id: &str) -> Option<Folder> {
        find_folder(&self.snapshot(), folder_id).cloned()
    }

    pub fn list_folder_summaries(&self) -> Vec<FolderSummary> {
        summarize_folders(&self.snapshot())
    }

    /// Tasks grouped by folder for the "all tasks" screen.
    pub fn list_all_tasks(&self) -> Vec<FolderTasks> {
        group_tasks(&self.snapshot())
    }

    pub fn list_task_entries(&self) -> Vec<TaskEntry> {
        flatten_tasks(&self.snapshot())
    }

    /// Appends a new empty folder.
    pub fn add_folder(&self, name: impl Into<String>) -> ServiceResult<Folder> {
        let name = normalize_name(name.into())?;
        self.mutate("add_folder", |folders| {
            let folder = Folder::new(name);
            folders.push(folder.clone());
            Ok(Outcome::Changed(folder))
        })
    }

    pub fn rename_folder(
        &self,
        folder_id: &str,
        name: impl Into<String>,
    ) -> ServiceResult<Folder> {
        let name = normalize_name(name.into())?;
        self.mutate("rename_folder", |folders| {
            let folder = require_folder(folders, folder_id)?;
            if folder.name == name {
                return Ok(Outcome::Unchanged(folder.clone()));
            }
            folder.name = name;
            Ok(Outcome::Changed(folder.clone()))
        })
    }

    /// Removes a folder together with all of its tasks.
    pub fn delete_folder(&self, folder_id: &str) -> ServiceResult<()> {
        self.mutate("delete_folder", |folders| {
            let index = folders
                .iter()
                .position(|folder| folder.id == folder_id)
                .ok_or_else(|| FolderServiceError::FolderNotFound(folder_id.to_string()))?;
            folders.remove(index);
            Ok(Outcome::Changed(()))
        })
    }

    /// Appends an open task to a folder.
    pub fn add_task(&self, folder_id: &str, name: impl Into<String>) -> ServiceResult<Task> {
        let name = normalize_name(name.into())?;
        self.mutate("add_task", |folders| {
            let folder = require_folder(folders, folder_id)?;
            let task = Task::new(name);
            folder.tasks.push(task.clone());
            Ok(Outcome::Changed(task))
        })
    }

    /// Flips `completed` on one task and returns the updated task.
    pub fn toggle_task(&self, folder_id: &str, task_id: &str) -> ServiceResult<Task> {
        self.mutate("toggle_task", |folders| {
            let task = require_task(folders, folder_id, task_id)?;
            task.toggle();
            Ok(Outcome::Changed(task.clone()))
        })
    }

    pub fn rename_task(
        &self,
        folder_id: &str,
        task_id: &str,
        name: impl Into<String>,
    ) -> ServiceResult<Task> {
        let name = normalize_name(name.into())?;
        self.mutate("rename_task", |folders| {
            let task = require_task(folders, folder_id, task_id)?;
            if task.name == name {
                return Ok(Outcome::Unchanged(task.clone()));
            }
            task.name = name;
            Ok(Outcome::Changed(task.clone()))
        })
    }

    /// Removes one task from its folder.
    ///
    /// Deleting a task that is already gone is a no-op; the folder itself
    /// must still exist.
    pub fn delete_task(&self, folder_id: &str, task_id: &str) -> ServiceResult<()> {
        self.mutate("delete_task", |folders| {
            let folder = require_folder(folders, folder_id)?;
            Ok(match folder.remove_task(task_id) {
                Some(_) => Outcome::Changed(()),
                None => Outcome::Unchanged(()),
            })
        })
    }

    /// Removes completed tasks from one folder, or from all folders when
    /// `folder_id` is `None`. Returns the number of tasks removed.
    pub fn delete_completed_tasks(&self, folder_id: Option<&str>) -> ServiceResult<usize> {
        self.mutate("delete_completed_tasks", |folders| {
            let removed = match folder_id {
                Some(folder_id) => require_folder(folders, folder_id)?.remove_completed(),
                None => folders.iter_mut().map(Folder::remove_completed).sum(),
            };
            Ok(if removed > 0 {
                Outcome::Changed(removed)
            } else {
                Outcome::Unchanged(removed)
            })
        })
    }

    fn mutate<T>(
        &self,
        op: &'static str,
        apply: impl FnOnce(&mut Vec<Folder>) -> ServiceResult<Outcome<T>>,
    ) -> ServiceResult<T> {
        let _turn = self.queue.enter();
        let result = self.load_for_mutation().and_then(|document| {
            let mut folders = document.folders;
            let (value, changed) = match apply(&mut folders)? {
                Outcome::Changed(value) => (value, true),
                Outcome::Unchanged(value) => (value, false),
            };
            // Repaired ids must reach disk even when the edit is a no-op.
            let written = changed || document.repaired_ids > 0;
            if written {
                self.store.save_all(&folders)?;
            }
            Ok((value, written))
        });

        match result {
            Ok((value, written)) => {
                info!(
                    "event=store_mutation module=service op={op} status=ok written={written}"
                );
                Ok(value)
            }
            Err(err) => {
                warn!(
                    "event=store_mutation module=service op={op} status=error error_code={}",
                    err.code()
                );
                Err(err)
            }
        }
    }

    fn load_for_mutation(&self) -> ServiceResult<LoadedDocument> {
        match self.store.load_document() {
            Ok(document) => Ok(document),
            Err(err) if err.is_missing() => Ok(LoadedDocument {
                folders: Vec::new(),
                repaired_ids: 0,
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Saves a repaired document so the ids it was given become stable.
    ///
    /// Reloads under the queue: a mutation ahead of us may already have
    /// written the repairs.
    fn persist_repairs(&self) -> StoreResult<Vec<Folder>> {
        let _turn = self.queue.enter();
        let document = self.store.load_document()?;
        if document.repaired_ids > 0 {
            self.store.save_all(&document.folders)?;
            info!(
                "event=store_repair module=service status=ok repaired_ids={}",
                document.repaired_ids
            );
        }
        Ok(document.folders)
    }
}

fn require_folder<'a>(
    folders: &'a mut [Folder],
    folder_id: &str,
) -> ServiceResult<&'a mut Folder> {
    find_folder_mut(folders, folder_id)
        .ok_or_else(|| FolderServiceError::FolderNotFound(folder_id.to_string()))
}

fn require_task<'a>(
    folders: &'a mut [Folder],
    folder_id: &str,
    task_id: &str,
) -> ServiceResult<&'a mut Task> {
    require_folder(folders, folder_id)?
        .task_mut(task_id)
        .ok_or_else(|| FolderServiceError::TaskNotFound {
            folder_id: folder_id.to_string(),
            task_id: task_id.to_string(),
        })
}

fn normalize_name(value: String) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FolderServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
