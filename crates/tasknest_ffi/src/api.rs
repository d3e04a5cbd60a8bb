//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose folder/task use-cases to Dart via FRB.
//! - Own the one process-wide store handle screens share.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Folders and tasks are addressed by id, never by display name.
//! - Every failure becomes a `{ ok: false, message }` envelope.

use log::warn;
use std::sync::OnceLock;
use tasknest_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DestructiveAction, FolderService, FolderServiceError, FolderSummary, FolderTasks,
    JsonFileStore, StoreConfig, Task,
};

static STORE: OnceLock<StoreHandle> = OnceLock::new();

struct StoreHandle {
    config: StoreConfig,
    service: FolderService<JsonFileStore>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Points the process-wide store at the app's private data directory.
///
/// # FFI contract
/// - `data_dir` must be absolute; the document is `<data_dir>/folders.json`.
/// - Safe to call repeatedly with the same directory.
/// - Switching to another directory is rejected.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(data_dir: String) -> String {
    let config = match StoreConfig::new(data_dir.as_str()) {
        Ok(config) => config,
        Err(err) => return err.to_string(),
    };
    let handle = STORE.get_or_init(|| StoreHandle {
        service: FolderService::new(JsonFileStore::from_config(&config)),
        config: config.clone(),
    });
    if handle.config != config {
        return format!(
            "store already initialized at `{}`; refusing to switch to `{}`",
            handle.config.data_dir().display(),
            config.data_dir().display()
        );
    }
    String::new()
}

/// Home screen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderItem {
    pub id: String,
    pub name: String,
    pub task_count: u32,
    pub completed_count: u32,
}

/// Task row shared by folder and all-tasks screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub name: String,
    pub completed: bool,
}

/// Folder list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderListResponse {
    pub ok: bool,
    pub items: Vec<FolderItem>,
    pub message: String,
}

/// Task list envelope for one folder screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub folder_id: String,
    /// Header text for the folder screen.
    pub folder_name: String,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// One folder section of the all-tasks screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllTasksSection {
    pub folder_id: String,
    pub folder_name: String,
    pub items: Vec<TaskItem>,
}

/// All-tasks envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllTasksResponse {
    pub ok: bool,
    pub sections: Vec<AllTasksSection>,
    pub message: String,
}

/// Generic mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or updated record, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// `true` when the failure means the record is gone; UI should reload.
    pub not_found: bool,
}

impl StoreActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
            not_found: false,
        }
    }

    fn failure(op: &'static str, err: &StoreCallError) -> Self {
        Self {
            ok: false,
            id: None,
            message: format!("{op} failed: {err}"),
            not_found: err.is_not_found(),
        }
    }
}

/// Confirmation dialog text for a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPromptItem {
    pub action: String,
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// Lists folders with task counters.
#[flutter_rust_bridge::frb(sync)]
pub fn folders_list() -> FolderListResponse {
    match with_service(|service| Ok(service.list_folder_summaries())) {
        Ok(summaries) => {
            let items = summaries.into_iter().map(to_folder_item).collect::<Vec<_>>();
            FolderListResponse {
                message: format!("{} folder(s).", items.len()),
                ok: true,
                items,
            }
        }
        Err(err) => FolderListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("folders_list failed: {err}"),
        },
    }
}

/// Creates an empty folder.
#[flutter_rust_bridge::frb(sync)]
pub fn folder_create(name: String) -> StoreActionResponse {
    action("folder_create", "Folder created.", |service| {
        service.add_folder(name).map(|folder| Some(folder.id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn folder_rename(folder_id: String, name: String) -> StoreActionResponse {
    action("folder_rename", "Folder renamed.", |service| {
        service
            .rename_folder(folder_id.as_str(), name)
            .map(|folder| Some(folder.id))
    })
}

/// Deletes a folder and every task in it.
///
/// Callers confirm first; see [`confirm_prompt`].
#[flutter_rust_bridge::frb(sync)]
pub fn folder_delete(folder_id: String) -> StoreActionResponse {
    action("folder_delete", "Folder deleted.", |service| {
        service.delete_folder(folder_id.as_str()).map(|()| None)
    })
}

/// Lists one folder's tasks in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(folder_id: String) -> TaskListResponse {
    let found = with_service(|service| {
        service
            .get_folder(folder_id.as_str())
            .ok_or_else(|| FolderServiceError::FolderNotFound(folder_id.clone()).into())
    });
    match found {
        Ok(folder) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", folder.tasks.len()),
            folder_id: folder.id,
            folder_name: folder.name,
            items: folder.tasks.into_iter().map(to_task_item).collect(),
        },
        Err(err) => TaskListResponse {
            ok: false,
            folder_id,
            folder_name: String::new(),
            items: Vec::new(),
            message: format!("tasks_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_create(folder_id: String, name: String) -> StoreActionResponse {
    action("task_create", "Task created.", |service| {
        service
            .add_task(folder_id.as_str(), name)
            .map(|task| Some(task.id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(folder_id: String, task_id: String) -> StoreActionResponse {
    action("task_toggle", "Task updated.", |service| {
        service
            .toggle_task(folder_id.as_str(), task_id.as_str())
            .map(|task| Some(task.id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_rename(folder_id: String, task_id: String, name: String) -> StoreActionResponse {
    action("task_rename", "Task renamed.", |service| {
        service
            .rename_task(folder_id.as_str(), task_id.as_str(), name)
            .map(|task| Some(task.id))
    })
}

/// Deletes one task. Deleting an already-deleted task succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(folder_id: String, task_id: String) -> StoreActionResponse {
    action("task_delete", "Task deleted.", |service| {
        service
            .delete_task(folder_id.as_str(), task_id.as_str())
            .map(|()| None)
    })
}

/// Deletes completed tasks in one folder, or everywhere when `folder_id`
/// is `None`. The change is persisted.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_delete_completed(folder_id: Option<String>) -> StoreActionResponse {
    let result = with_service(|service| {
        service
            .delete_completed_tasks(folder_id.as_deref())
            .map_err(Into::into)
    });
    match result {
        Ok(removed) => StoreActionResponse::success(
            format!("Removed {removed} completed task(s)."),
            None,
        ),
        Err(err) => log_failure("tasks_delete_completed", &err),
    }
}

/// Lists every task grouped under its folder.
#[flutter_rust_bridge::frb(sync)]
pub fn all_tasks_list() -> AllTasksResponse {
    match with_service(|service| Ok(service.list_all_tasks())) {
        Ok(groups) => {
            let sections = groups.into_iter().map(to_section).collect::<Vec<_>>();
            let total = sections.iter().map(|section| section.items.len()).sum::<usize>();
            AllTasksResponse {
                ok: true,
                message: format!("{total} task(s) in {} folder(s).", sections.len()),
                sections,
            }
        }
        Err(err) => AllTasksResponse {
            ok: false,
            sections: Vec::new(),
            message: format!("all_tasks_list failed: {err}"),
        },
    }
}

/// Returns dialog text for `delete_folder|delete_task|delete_completed_tasks`.
#[flutter_rust_bridge::frb(sync)]
pub fn confirm_prompt(action: String) -> Option<ConfirmPromptItem> {
    let action = DestructiveAction::parse(action.as_str())?;
    let prompt = action.prompt();
    Some(ConfirmPromptItem {
        action: action.as_str().to_string(),
        title: prompt.title.to_string(),
        message: prompt.message.to_string(),
        confirm_label: prompt.confirm_label.to_string(),
        cancel_label: prompt.cancel_label.to_string(),
    })
}

/// Failure reaching or using the shared store.
#[derive(Debug)]
enum StoreCallError {
    Uninitialized,
    Service(FolderServiceError),
}

impl StoreCallError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::Service(err) if err.is_not_found())
    }
}

impl std::fmt::Display for StoreCallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "store not initialized; call init_store first"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl From<FolderServiceError> for StoreCallError {
    fn from(value: FolderServiceError) -> Self {
        Self::Service(value)
    }
}

fn with_service<T>(
    f: impl FnOnce(&FolderService<JsonFileStore>) -> Result<T, StoreCallError>,
) -> Result<T, StoreCallError> {
    let handle = STORE.get().ok_or(StoreCallError::Uninitialized)?;
    f(&handle.service)
}

fn action(
    op: &'static str,
    message: &'static str,
    f: impl FnOnce(&FolderService<JsonFileStore>) -> Result<Option<String>, FolderServiceError>,
) -> StoreActionResponse {
    match with_service(|service| f(service).map_err(Into::into)) {
        Ok(id) => StoreActionResponse::success(message, id),
        Err(err) => log_failure(op, &err),
    }
}

fn log_failure(op: &'static str, err: &StoreCallError) -> StoreActionResponse {
    warn!("event=ffi_call module=ffi op={op} status=error not_found={}", err.is_not_found());
    StoreActionResponse::failure(op, err)
}

fn to_folder_item(summary: FolderSummary) -> FolderItem {
    FolderItem {
        id: summary.id,
        name: summary.name,
        task_count: clamp_count(summary.task_count),
        completed_count: clamp_count(summary.completed_count),
    }
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        id: task.id,
        name: task.name,
        completed: task.completed,
    }
}

fn to_section(group: FolderTasks) -> AllTasksSection {
    AllTasksSection {
        folder_id: group.folder_id,
        folder_name: group.folder_name,
        items: group.tasks.into_iter().map(to_task_item).collect(),
    }
}

fn clamp_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        all_tasks_list, confirm_prompt, core_version, folder_create, folder_delete, folder_rename,
        folders_list, init_logging, init_store, ping, task_create, task_delete, task_rename,
        task_toggle, tasks_delete_completed, tasks_list,
    };
    use std::sync::OnceLock;
    use tempfile::TempDir;

    static DATA_DIR: OnceLock<TempDir> = OnceLock::new();

    fn ensure_store() {
        let dir = DATA_DIR.get_or_init(|| tempfile::tempdir().expect("create data dir"));
        let error = init_store(dir.path().to_str().expect("utf-8 temp dir").to_string());
        assert!(error.is_empty(), "{error}");
    }

    fn create_folder(name: &str) -> String {
        let created = folder_create(name.to_string());
        assert!(created.ok, "{}", created.message);
        created.id.expect("folder create should return id")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn init_store_is_idempotent_and_rejects_other_dirs() {
        ensure_store();
        ensure_store();

        assert!(!init_store("relative/dir".to_string()).is_empty());
        let other = tempfile::tempdir().expect("create other dir");
        let error = init_store(other.path().to_str().expect("utf-8").to_string());
        assert!(error.contains("refusing to switch"));
    }

    #[test]
    fn folder_and_task_flow_addresses_records_by_id() {
        ensure_store();
        let folder_id = create_folder("Work");

        let task = task_create(folder_id.clone(), "Write report".to_string());
        assert!(task.ok, "{}", task.message);
        let task_id = task.id.expect("task create should return id");

        let toggled = task_toggle(folder_id.clone(), task_id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        let renamed = task_rename(folder_id.clone(), task_id.clone(), "Send report".to_string());
        assert!(renamed.ok, "{}", renamed.message);

        let listed = tasks_list(folder_id.clone());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.folder_name, "Work");
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].name, "Send report");
        assert!(listed.items[0].completed);

        let cleared = tasks_delete_completed(Some(folder_id.clone()));
        assert!(cleared.ok, "{}", cleared.message);
        assert!(cleared.message.contains("Removed 1"));
        assert_eq!(cleared.id, None);
        assert!(tasks_list(folder_id.clone()).items.is_empty());

        let renamed_folder = folder_rename(folder_id.clone(), "Office".to_string());
        assert!(renamed_folder.ok, "{}", renamed_folder.message);
        let folders = folders_list();
        assert!(folders
            .items
            .iter()
            .any(|item| item.id == folder_id && item.name == "Office"));
    }

    #[test]
    fn task_delete_is_idempotent_over_ffi() {
        ensure_store();
        let folder_id = create_folder("Errands");
        let task_id = task_create(folder_id.clone(), "Post office".to_string())
            .id
            .expect("task id");

        assert!(task_delete(folder_id.clone(), task_id.clone()).ok);
        assert!(task_delete(folder_id.clone(), task_id).ok);
    }

    #[test]
    fn deleted_folder_reports_not_found() {
        ensure_store();
        let folder_id = create_folder("Temporary");
        task_create(folder_id.clone(), "Soon gone".to_string());

        assert!(folder_delete(folder_id.clone()).ok);

        let response = task_create(folder_id.clone(), "Orphan".to_string());
        assert!(!response.ok);
        assert!(response.not_found);
        assert!(!tasks_list(folder_id.clone()).ok);
        assert!(all_tasks_list()
            .sections
            .iter()
            .all(|section| section.folder_id != folder_id));
    }

    #[test]
    fn blank_name_is_reported_without_panicking() {
        ensure_store();
        let response = folder_create("   ".to_string());
        assert!(!response.ok);
        assert!(!response.not_found);
        assert!(response.message.contains("blank"));
    }

    #[test]
    fn confirm_prompt_resolves_known_actions_only() {
        let prompt = confirm_prompt("delete_task".to_string()).expect("known action");
        assert_eq!(prompt.title, "Delete Task");
        assert_eq!(prompt.cancel_label, "Cancel");
        assert!(confirm_prompt("archive".to_string()).is_none());
    }
}
