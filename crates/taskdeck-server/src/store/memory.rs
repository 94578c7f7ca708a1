use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use taskdeck_core::error::Result;
use taskdeck_core::{Task, TaskFields, TaskId, TaskPatch};

use super::TaskStore;

struct Entry {
    seq: u64,
    task: Task,
}

/// In-process document store.
#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<TaskId, Entry>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, fields: TaskFields) -> Result<Task> {
        let task = Task::from_fields(fields);
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.docs.insert(task.id, Entry { seq, task: task.clone() });
        Ok(task)
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        let mut entries: Vec<(u64, Task)> = self
            .docs
            .iter()
            .map(|r| (r.value().seq, r.value().task.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, t)| t).collect())
    }

    async fn find_one_and_update(&self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        let Some(mut entry) = self.docs.get_mut(&id) else { return Ok(None); };
        let before = entry.task.clone();
        entry.task.apply(patch);
        Ok(Some(before))
    }

    async fn find_by_id_and_delete(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.docs.remove(&id).map(|(_, e)| e.task))
    }
}
