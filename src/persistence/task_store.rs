use super::collection::{Collection, JsonCollection, MemoryCollection, Record};
use crate::domain::{NewTask, Task, TaskId, TaskPatch};
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

impl Record for Task {
    type Key = TaskId;

    fn key(&self) -> TaskId {
        self.id
    }
}

/// Durable collection of tasks keyed by id
pub struct TaskStore {
    records: Box<dyn Collection<Task>>,
}

impl TaskStore {
    pub fn new(records: Box<dyn Collection<Task>>) -> Self {
        Self { records }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryCollection::new()))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Box::new(JsonCollection::open(path)?)))
    }

    /// Validate, assign a fresh id and `created_at = now`, persist
    pub fn create(&mut self, fields: NewTask, now: DateTime<Utc>) -> Result<Task> {
        let task = Task::new(fields, now)?;
        self.records.put(task.clone())?;
        debug!(id = %task.id, title = %task.title, "created task");
        Ok(task)
    }

    /// All tasks, in no particular order
    pub fn get_all(&self) -> Result<Vec<Task>> {
        Ok(self.records.get_all()?)
    }

    pub fn get_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.records.get(&id)?)
    }

    /// Merge `patch` over the stored task. `None` if there is no such task.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        let Some(mut task) = self.records.get(&id)? else {
            return Ok(None);
        };
        task.apply(patch)?;
        self.records.put(task.clone())?;
        debug!(id = %id, "updated task");
        Ok(Some(task))
    }

    /// Replace the full record
    pub(crate) fn put(&mut self, task: Task) -> Result<()> {
        Ok(self.records.put(task)?)
    }

    /// Deleting an id that doesn't exist is not an error
    pub fn delete(&mut self, id: TaskId) -> Result<()> {
        self.records.delete(&id)?;
        debug!(id = %id, "deleted task");
        Ok(())
    }

    /// Delete all listed tasks in one write
    pub fn delete_many(&mut self, ids: &[TaskId]) -> Result<()> {
        Ok(self.records.delete_many(ids)?)
    }
}
