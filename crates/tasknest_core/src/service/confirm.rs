//! Confirmation wording for destructive actions.
//!
//! The UI asks before calling a deleting mutator; core owns the wording so
//! every screen shows the same prompt.

/// Store mutation that discards user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveAction {
    DeleteFolder,
    DeleteTask,
    DeleteCompletedTasks,
}

/// Text of one confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
}

impl DestructiveAction {
    /// Parses the snake_case action key used across the FFI boundary.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "delete_folder" => Some(Self::DeleteFolder),
            "delete_task" => Some(Self::DeleteTask),
            "delete_completed_tasks" => Some(Self::DeleteCompletedTasks),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeleteFolder => "delete_folder",
            Self::DeleteTask => "delete_task",
            Self::DeleteCompletedTasks => "delete_completed_tasks",
        }
    }

    pub fn prompt(self) -> ConfirmPrompt {
        let (title, message) = match self {
            Self::DeleteFolder => (
                "Delete Folder",
                "Are you sure you want to delete this folder and all of its tasks?",
            ),
            Self::DeleteTask => ("Delete Task", "Are you sure you want to delete this task?"),
            Self::DeleteCompletedTasks => (
                "Delete Completed Tasks",
                "Are you sure you want to delete all completed tasks?",
            ),
        };
        ConfirmPrompt {
            title,
            message,
            confirm_label: "Delete",
            cancel_label: "Cancel",
        }
    }
}
