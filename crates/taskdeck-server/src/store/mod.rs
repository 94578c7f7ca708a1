//! Task persistence.
//!
//! Handlers talk to a [`TaskStore`]; the backend is chosen once at startup
//! from the connection string by [`connect`].

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use taskdeck_core::error::{Result, TaskdeckError};
use taskdeck_core::{Task, TaskFields, TaskId, TaskPatch};

pub use memory::MemoryStore;

/// Document-store operations used by the task handlers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new document and return it as stored.
    async fn insert(&self, fields: TaskFields) -> Result<Task>;

    /// All documents in insertion order.
    async fn find_all(&self) -> Result<Vec<Task>>;

    /// Apply `patch` and return the document as it was *before* the update,
    /// or `None` if no document has that id.
    async fn find_one_and_update(&self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>>;

    /// Remove and return the document, or `None` if no document has that id.
    async fn find_by_id_and_delete(&self, id: TaskId) -> Result<Option<Task>>;
}

/// Open a store for `url`.
///
/// Supported schemes: `memory://` and `mem://` (in-process).
pub async fn connect(url: &str) -> Result<Arc<dyn TaskStore>> {
    let (scheme, _rest) = url
        .split_once("://")
        .ok_or_else(|| TaskdeckError::Store(format!("malformed connection string: {url:?}")))?;

    match scheme {
        "memory" | "mem" => {
            tracing::info!(scheme, "connected to database");
            Ok(Arc::new(MemoryStore::new()))
        }
        other => Err(TaskdeckError::Store(format!("unsupported database scheme: {other}"))),
    }
}
