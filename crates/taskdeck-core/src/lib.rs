//! taskdeck core: transport-agnostic task documents and the shared error type.
//!
//! This crate defines the document model and error surface shared by the
//! server, its store backends, and tests. It carries no transport or runtime
//! dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `TaskdeckError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod task;

/// Shared result type.
pub use error::{Result, TaskdeckError};
pub use task::{Task, TaskFields, TaskId, TaskPatch};
