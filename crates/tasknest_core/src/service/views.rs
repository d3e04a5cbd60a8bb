//! Read-only projections for list screens.
//!
//! These views are rebuilt from a fresh load on every screen focus and are
//! never written back. The `folder_id` back-reference on aggregated tasks
//! exists only here, not inside a folder's persisted `tasks`.

use crate::model::folder::{Folder, FolderId, Task};

/// Home screen row: one folder with task counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub id: FolderId,
    pub name: String,
    pub task_count: usize,
    pub completed_count: usize,
}

/// One section of the "all tasks" screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTasks {
    pub folder_id: FolderId,
    pub folder_name: String,
    pub tasks: Vec<Task>,
}

/// A task paired with the folder that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    pub folder_id: FolderId,
    pub folder_name: String,
    pub task: Task,
}

pub fn summarize_folders(folders: &[Folder]) -> Vec<FolderSummary> {
    folders
        .iter()
        .map(|folder| FolderSummary {
            id: folder.id.clone(),
            name: folder.name.clone(),
            task_count: folder.tasks.len(),
            completed_count: folder.completed_count(),
        })
        .collect()
}

/// Groups tasks by folder in document order, empty folders included.
pub fn group_tasks(folders: &[Folder]) -> Vec<FolderTasks> {
    folders
        .iter()
        .map(|folder| FolderTasks {
            folder_id: folder.id.clone(),
            folder_name: folder.name.clone(),
            tasks: folder.tasks.clone(),
        })
        .collect()
}

pub fn flatten_tasks(folders: &[Folder]) -> Vec<TaskEntry> {
    folders
        .iter()
        .flat_map(|folder| {
            folder.tasks.iter().map(move |task| TaskEntry {
                folder_id: folder.id.clone(),
                folder_name: folder.name.clone(),
                task: task.clone(),
            })
        })
        .collect()
}
