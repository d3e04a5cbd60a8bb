use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use tasknest_core::{
    FolderService, FolderServiceError, FolderStore, JsonFileStore, MemoryStore, StoreConfig,
};

fn setup() -> FolderService<MemoryStore> {
    FolderService::new(MemoryStore::new())
}

fn file_service(dir: &tempfile::TempDir) -> FolderService<JsonFileStore> {
    let config = StoreConfig::new(dir.path().to_str().unwrap()).unwrap();
    FolderService::new(JsonFileStore::from_config(&config))
}

#[test]
fn work_folder_scenario_ends_with_empty_task_list() {
    let service = setup();
    assert!(service.snapshot().is_empty());

    let work = service.add_folder("Work").unwrap();
    let persisted = service.load_all().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].name, "Work");
    assert!(persisted[0].tasks.is_empty());

    let task = service.add_task(&work.id, "Write report").unwrap();
    let folder = service.get_folder(&work.id).unwrap();
    assert_eq!(folder.tasks.len(), 1);
    assert!(!folder.tasks[0].completed);

    let toggled = service.toggle_task(&work.id, &task.id).unwrap();
    assert!(toggled.completed);
    assert!(service.get_folder(&work.id).unwrap().tasks[0].completed);

    let removed = service.delete_completed_tasks(None).unwrap();
    assert_eq!(removed, 1);
    assert!(service.load_all().unwrap()[0].tasks.is_empty());
}

#[test]
fn deleting_folder_a_leaves_only_b_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir);

    let a = service.add_folder("A").unwrap();
    service.add_folder("B").unwrap();
    service.delete_folder(&a.id).unwrap();

    let reopened = file_service(&dir);
    let names = reopened
        .load_all()
        .unwrap()
        .into_iter()
        .map(|folder| folder.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["B".to_string()]);
}

#[test]
fn delete_folder_cascades_to_its_tasks() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();
    let home = service.add_folder("Home").unwrap();
    let doomed = service.add_task(&work.id, "Draft").unwrap();
    let kept = service.add_task(&home.id, "Laundry").unwrap();

    service.delete_folder(&work.id).unwrap();

    let entries = service.list_task_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].task.id, kept.id);
    assert!(entries.iter().all(|entry| entry.task.id != doomed.id));
    assert!(entries.iter().all(|entry| entry.folder_id != work.id));

    let err = service.toggle_task(&work.id, &doomed.id).unwrap_err();
    assert!(matches!(err, FolderServiceError::FolderNotFound(id) if id == work.id));
}

#[test]
fn delete_task_twice_is_a_silent_no_op() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();
    let first = service.add_task(&work.id, "First").unwrap();
    service.add_task(&work.id, "Second").unwrap();

    service.delete_task(&work.id, &first.id).unwrap();
    let after_first = service.store().document();

    service.delete_task(&work.id, &first.id).unwrap();
    assert_eq!(service.store().document(), after_first);
    assert_eq!(service.get_folder(&work.id).unwrap().tasks.len(), 1);
}

#[test]
fn delete_task_keeps_siblings_in_order() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();
    let a = service.add_task(&work.id, "A").unwrap();
    let b = service.add_task(&work.id, "B").unwrap();
    let c = service.add_task(&work.id, "C").unwrap();

    service.delete_task(&work.id, &b.id).unwrap();

    let ids = service
        .get_folder(&work.id)
        .unwrap()
        .tasks
        .into_iter()
        .map(|task| task.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![a.id, c.id]);
}

#[test]
fn rapid_task_creation_yields_distinct_ids() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();

    let ids = (0..200)
        .map(|index| service.add_task(&work.id, format!("task {index}")).unwrap().id)
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 200);
    assert_eq!(service.get_folder(&work.id).unwrap().tasks.len(), 200);
}

#[test]
fn toggling_twice_restores_completion() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();
    let task = service.add_task(&work.id, "Write report").unwrap();

    service.toggle_task(&work.id, &task.id).unwrap();
    let restored = service.toggle_task(&work.id, &task.id).unwrap();
    assert_eq!(restored.completed, task.completed);
    assert!(!service.get_folder(&work.id).unwrap().tasks[0].completed);
}

#[test]
fn renames_are_trimmed_and_persisted() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();
    let task = service.add_task(&work.id, "Draft").unwrap();

    let folder = service.rename_folder(&work.id, "  Office  ").unwrap();
    assert_eq!(folder.name, "Office");
    let task = service.rename_task(&work.id, &task.id, "Final draft").unwrap();
    assert_eq!(task.name, "Final draft");

    let persisted = service.load_all().unwrap();
    assert_eq!(persisted[0].name, "Office");
    assert_eq!(persisted[0].tasks[0].name, "Final draft");
}

#[test]
fn folder_names_need_not_be_unique() {
    let service = setup();
    let first = service.add_folder("Errands").unwrap();
    let second = service.add_folder("Errands").unwrap();
    assert_ne!(first.id, second.id);

    service.add_task(&second.id, "Post office").unwrap();
    assert!(service.get_folder(&first.id).unwrap().tasks.is_empty());
    assert_eq!(service.get_folder(&second.id).unwrap().tasks.len(), 1);
}

#[test]
fn missing_references_report_not_found() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();

    let err = service.add_task("missing", "x").unwrap_err();
    assert!(err.is_not_found());
    let err = service.rename_folder("missing", "x").unwrap_err();
    assert!(matches!(err, FolderServiceError::FolderNotFound(_)));
    let err = service.delete_folder("missing").unwrap_err();
    assert!(matches!(err, FolderServiceError::FolderNotFound(_)));

    let err = service.toggle_task(&work.id, "missing").unwrap_err();
    assert!(matches!(
        err,
        FolderServiceError::TaskNotFound { ref task_id, .. } if task_id == "missing"
    ));
    let err = service.rename_task(&work.id, "missing", "x").unwrap_err();
    assert!(err.is_not_found());
    let err = service.delete_task("missing", "missing").unwrap_err();
    assert!(matches!(err, FolderServiceError::FolderNotFound(_)));
}

#[test]
fn blank_names_are_rejected() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();
    let task = service.add_task(&work.id, "Task").unwrap();

    assert!(matches!(service.add_folder(""), Err(FolderServiceError::InvalidName)));
    assert!(matches!(
        service.add_task(&work.id, "  "),
        Err(FolderServiceError::InvalidName)
    ));
    assert!(matches!(
        service.rename_task(&work.id, &task.id, "\n"),
        Err(FolderServiceError::InvalidName)
    ));
}

#[test]
fn delete_completed_tasks_can_target_one_folder() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();
    let home = service.add_folder("Home").unwrap();
    let work_task = service.add_task(&work.id, "Ship").unwrap();
    let home_task = service.add_task(&home.id, "Dishes").unwrap();
    service.add_task(&home.id, "Vacuum").unwrap();
    service.toggle_task(&work.id, &work_task.id).unwrap();
    service.toggle_task(&home.id, &home_task.id).unwrap();

    assert_eq!(service.delete_completed_tasks(Some(&home.id)).unwrap(), 1);

    let summaries = service.list_folder_summaries();
    assert_eq!(summaries[0].task_count, 1);
    assert_eq!(summaries[0].completed_count, 1);
    assert_eq!(summaries[1].task_count, 1);
    assert_eq!(summaries[1].completed_count, 0);

    assert_eq!(service.delete_completed_tasks(None).unwrap(), 1);
    assert_eq!(service.delete_completed_tasks(None).unwrap(), 0);
}

#[test]
fn delete_completed_tasks_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir);
    let work = service.add_folder("Work").unwrap();
    let task = service.add_task(&work.id, "Ship").unwrap();
    service.toggle_task(&work.id, &task.id).unwrap();

    service.delete_completed_tasks(None).unwrap();

    let reopened = file_service(&dir);
    assert!(reopened.list_all_tasks()[0].tasks.is_empty());
}

#[test]
fn all_tasks_view_groups_by_folder_in_document_order() {
    let service = setup();
    let work = service.add_folder("Work").unwrap();
    let home = service.add_folder("Home").unwrap();
    service.add_task(&home.id, "Dishes").unwrap();
    service.add_task(&work.id, "Ship").unwrap();

    let groups = service.list_all_tasks();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].folder_id, work.id);
    assert_eq!(groups[0].tasks[0].name, "Ship");
    assert_eq!(groups[1].folder_name, "Home");
    assert_eq!(groups[1].tasks[0].name, "Dishes");
}

#[test]
fn corrupt_document_reads_empty_but_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir);
    let path = service.store().path().to_path_buf();
    fs::write(&path, b"{ not json").unwrap();

    assert!(service.snapshot().is_empty());
    assert!(service.list_folder_summaries().is_empty());

    let err = service.add_folder("Work").unwrap_err();
    assert!(matches!(err, FolderServiceError::Store(_)));
    assert_eq!(fs::read(&path).unwrap(), b"{ not json");
}

#[test]
fn first_mutation_creates_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir);
    assert!(!service.store().path().exists());

    service.add_folder("Inbox").unwrap();
    assert!(service.store().path().exists());
    assert_eq!(service.store().load_all().unwrap().len(), 1);
}

#[test]
fn legacy_folder_without_id_becomes_addressable() {
    let service = FolderService::new(MemoryStore::with_document(
        r#"[{"name":"Groceries","tasks":[{"id":"1700000000000","name":"Milk","completed":false}]}]"#,
    ));

    let folder_id = service.list_folder_summaries()[0].id.clone();
    assert!(!folder_id.is_empty());
    assert_eq!(service.list_folder_summaries()[0].id, folder_id);

    let folder = service.get_folder(&folder_id).unwrap();
    assert_eq!(folder.tasks[0].id, "1700000000000");

    service.add_task(&folder_id, "Bread").unwrap();
    let groups = service.list_all_tasks();
    assert_eq!(groups[0].folder_id, folder_id);
    assert_eq!(groups[0].tasks.len(), 2);
}

#[test]
fn legacy_ids_from_grouped_view_survive_a_new_service() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir);
    fs::write(
        service.store().path(),
        br#"[{"name":"Home","tasks":[{"name":"Water plants","completed":true}]}]"#,
    )
    .unwrap();

    let groups = service.list_all_tasks();
    let folder_id = groups[0].folder_id.clone();
    let task_id = groups[0].tasks[0].id.clone();

    // Simulates the next app launch.
    let relaunched = file_service(&dir);
    let toggled = relaunched.toggle_task(&folder_id, &task_id).unwrap();
    assert!(!toggled.completed);
}

#[test]
fn no_op_mutation_still_writes_repaired_ids() {
    let dir = tempfile::tempdir().unwrap();
    let service = file_service(&dir);
    fs::write(
        service.store().path(),
        br#"[{"name":"Work","tasks":[{"id":"1700","name":"A","completed":false},{"id":"1700","name":"B","completed":false}]}]"#,
    )
    .unwrap();

    assert_eq!(service.delete_completed_tasks(None).unwrap(), 0);

    let on_disk = service.store().load_document().unwrap();
    assert_eq!(on_disk.repaired_ids, 0);
    assert_eq!(service.store().load_document().unwrap(), on_disk);

    let folder_id = on_disk.folders[0].id.clone();
    let task_id = on_disk.folders[0].tasks[1].id.clone();
    assert_ne!(task_id, "1700");
    service.rename_task(&folder_id, &task_id, "B").unwrap();
    assert_eq!(service.store().load_document().unwrap(), on_disk);
}

#[test]
fn concurrent_mutations_do_not_lose_updates() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(file_service(&dir));
    let work = service.add_folder("Work").unwrap();

    let handles = (0..8)
        .map(|worker| {
            let service = Arc::clone(&service);
            let folder_id = work.id.clone();
            thread::spawn(move || {
                for index in 0..10 {
                    service
                        .add_task(&folder_id, format!("worker {worker} task {index}"))
                        .unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let tasks = service.get_folder(&work.id).unwrap().tasks;
    assert_eq!(tasks.len(), 80);
    let ids = tasks.into_iter().map(|task| task.id).collect::<HashSet<_>>();
    assert_eq!(ids.len(), 80);
}
