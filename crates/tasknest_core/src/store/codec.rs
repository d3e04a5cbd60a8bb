//! JSON codec for the folder document.
//!
//! # Responsibility
//! - Encode the collection as a compact JSON array of folders.
//! - Decode leniently: records written by older app versions may lack ids,
//!   `tasks` or `completed`, and may carry duplicate timestamp ids.
//!
//! # Invariants
//! - Decoded collections always satisfy the id invariants: every folder and
//!   task id is non-empty and unique. Offending ids are replaced and counted.
//! - Names are taken as stored. Records written by older versions may carry
//!   blank names; they load unchanged and only names passed through the
//!   service are validated.

use super::LoadedDocument;
use crate::model::folder::{new_record_id, Folder, Task};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Deserialize)]
struct StoredFolder {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tasks: Option<Vec<StoredTask>>,
}

#[derive(Deserialize)]
struct StoredTask {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    completed: bool,
}

pub(crate) fn encode(folders: &[Folder]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(folders)
}

pub(crate) fn decode(bytes: &[u8]) -> serde_json::Result<LoadedDocument> {
    let stored: Vec<StoredFolder> = serde_json::from_slice(bytes)?;

    let mut folder_ids = HashSet::new();
    let mut task_ids = HashSet::new();
    let mut repaired_ids = 0;

    let folders = stored
        .into_iter()
        .map(|folder| {
            let id = claim_id(folder.id, &mut folder_ids, &mut repaired_ids);
            let tasks = folder
                .tasks
                .unwrap_or_default()
                .into_iter()
                .map(|task| Task {
                    id: claim_id(task.id, &mut task_ids, &mut repaired_ids),
                    name: task.name,
                    completed: task.completed,
                })
                .collect();
            Folder {
                id,
                name: folder.name,
                tasks,
            }
        })
        .collect();

    Ok(LoadedDocument {
        folders,
        repaired_ids,
    })
}

fn claim_id(
    candidate: Option<String>,
    seen: &mut HashSet<String>,
    repaired: &mut usize,
) -> String {
    if let Some(id) = candidate {
        if !id.trim().is_empty() && seen.insert(id.clone()) {
            return id;
        }
    }
    *repaired += 1;
    let id = new_record_id();
    seen.insert(id.clone());
    id
}
