//! Task documents.
//!
//! A task is a small JSON document identified by a server-generated UUID,
//! serialized under the `_id` key the way document stores expose it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TaskdeckError};

/// Document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id taken from a request path.
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TaskdeckError::InvalidId(format!("{s:?}: {e}")))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = TaskdeckError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Client-supplied fields of a new task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskFields {
    pub task: String,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.completed.is_none()
    }
}

/// A stored task document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub task: String,
    pub completed: bool,
}

impl Task {
    /// Build a new document with a fresh id.
    pub fn from_fields(fields: TaskFields) -> Self {
        Self {
            id: TaskId::new(),
            task: fields.task,
            completed: fields.completed,
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(task) = patch.task {
            self.task = task;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}
