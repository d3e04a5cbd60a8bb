//! Core use-case services.
//!
//! # Responsibility
//! - Turn whole-document storage into folder/task use-cases.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod confirm;
pub mod folder_service;
mod queue;
pub mod views;
