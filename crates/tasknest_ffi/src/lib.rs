//! Flutter bridge for TaskNest core.
//!
//! Dart bindings are generated from the functions in [`api`].

pub mod api;
