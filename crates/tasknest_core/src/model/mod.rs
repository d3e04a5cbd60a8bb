//! Domain model for folders and the tasks they own.
//!
//! # Responsibility
//! - Define the records persisted in the folder document.
//! - Provide in-place helpers used by read-modify-write mutations.
//!
//! # Invariants
//! - Every folder and task is identified by a stable, never-reused id.
//! - A task belongs to exactly one folder by containment.

pub mod folder;
