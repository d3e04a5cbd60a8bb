//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tasknest_core` linkage without the Flutter runtime.
//! - Optionally summarize a folder document: `tasknest_cli [DOCUMENT_PATH]`.
//!   The document is only read, never repaired or rewritten.

use std::process::ExitCode;
use tasknest_core::{FolderStore, JsonFileStore, StoreResult};

fn main() -> ExitCode {
    println!("tasknest_core ping={}", tasknest_core::ping());
    println!("tasknest_core version={}", tasknest_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match summarize(&JsonFileStore::new(path)) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error={err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(store: &impl FolderStore) -> StoreResult<Vec<String>> {
    let document = store.load_document()?;
    let mut lines = vec![format!(
        "folders={} repaired_ids={}",
        document.folders.len(),
        document.repaired_ids
    )];
    lines.extend(document.folders.iter().map(|folder| {
        format!(
            "folder id={} tasks={} completed={}",
            folder.id,
            folder.tasks.len(),
            folder.completed_count()
        )
    }));
    Ok(lines)
}
