//! Folder and task records.
//!
//! # Responsibility
//! - Define the canonical `Folder`/`Task` shapes written to the document.
//! - Provide lookup and in-place mutation helpers over a folder's tasks.
//!
//! # Invariants
//! - Generated ids are random UUID v4 strings, so rapid successive
//!   creations never collide.
//! - Ids are opaque strings; ids written by older app versions stay valid.
//! - `tasks` keeps insertion order, which is also display order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a folder.
pub type FolderId = String;

/// Stable identifier of a task. Unique across all folders.
pub type TaskId = String;

/// Generates a fresh collision-resistant record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// One to-do item owned by exactly one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
}

impl Task {
    /// Creates an open task with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(new_record_id(), name)
    }

    /// Creates an open task with a caller-provided id.
    pub fn with_id(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            completed: false,
        }
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Named grouping of tasks; the top-level unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub tasks: Vec<Task>,
}

impl Folder {
    /// Creates an empty folder with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(new_record_id(), name)
    }

    /// Creates an empty folder with a caller-provided id.
    pub fn with_id(id: impl Into<FolderId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    /// Removes one task, keeping sibling order. Returns the removed task.
    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == task_id)?;
        Some(self.tasks.remove(index))
    }

    /// Drops every completed task and returns how many were removed.
    pub fn remove_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        before - self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }
}

/// Finds a folder by id.
pub fn find_folder<'a>(folders: &'a [Folder], folder_id: &str) -> Option<&'a Folder> {
    folders.iter().find(|folder| folder.id == folder_id)
}

/// Finds a folder by id for in-place mutation.
pub fn find_folder_mut<'a>(folders: &'a mut [Folder], folder_id: &str) -> Option<&'a mut Folder> {
    folders.iter_mut().find(|folder| folder.id == folder_id)
}
