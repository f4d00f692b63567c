//! In-memory working set of tasks mirrored from the store.

use crate::task::{
    domain::{RecordError, Task, TaskId},
    ports::{TaskStore, TaskStoreError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do with stored rows that fail to decode during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Log and skip the row, keep loading the rest.
    #[default]
    Skip,
    /// Fail the whole load.
    Abort,
}

/// Counts from a completed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Tasks now held in memory.
    pub loaded: usize,
    /// Malformed rows skipped.
    pub skipped: usize,
}

/// Errors returned while loading the working set.
#[derive(Debug, Error)]
pub enum TaskSetError {
    /// The store could not be read.
    #[error(transparent)]
    Store(#[from] TaskStoreError),

    /// A malformed row was found under [`MalformedRowPolicy::Abort`].
    #[error("malformed task row {}: {error}", .key.as_deref().unwrap_or("<unknown>"))]
    Malformed {
        /// Stored key of the offending row, when readable.
        key: Option<String>,
        /// Decoding failure.
        #[source]
        error: RecordError,
    },
}

/// The authoritative in-memory task collection for the running process.
///
/// Lookups are linear; the expected scale is a few hundred tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Creates an empty working set.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Replaces the whole collection with the store's contents.
    ///
    /// On error the previous collection is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSetError::Store`] when the store cannot be read, or
    /// [`TaskSetError::Malformed`] when `policy` is
    /// [`MalformedRowPolicy::Abort`] and a row fails to decode.
    pub async fn load<S>(
        &mut self,
        store: &S,
        policy: MalformedRowPolicy,
    ) -> Result<LoadReport, TaskSetError>
    where
        S: TaskStore + ?Sized,
    {
        let loaded = store.select_all().await?;

        if let (MalformedRowPolicy::Abort, Some(row)) = (policy, loaded.malformed.first()) {
            return Err(TaskSetError::Malformed {
                key: row.key.clone(),
                error: row.error.clone(),
            });
        }

        let skipped = loaded.malformed.len();
        for row in &loaded.malformed {
            tracing::warn!(
                key = row.key.as_deref().unwrap_or("<unknown>"),
                error = %row.error,
                "skipping malformed task row"
            );
        }

        self.tasks = loaded.tasks;
        Ok(LoadReport {
            loaded: self.tasks.len(),
            skipped,
        })
    }

    /// Appends a task that has already been persisted.
    pub fn append(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Replaces the task with the same identifier, returning the old value.
    ///
    /// Returns `None`, leaving the set unchanged, when no task matches.
    pub fn replace(&mut self, task: Task) -> Option<Task> {
        let slot = self.tasks.iter_mut().find(|existing| existing.id() == task.id())?;
        Some(std::mem::replace(slot, task))
    }

    /// Removes and returns the task with the given identifier.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id() == id)?;
        Some(self.tasks.remove(position))
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether the set holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates over tasks in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Returns the tasks as a slice in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }
}

impl FromIterator<Task> for TaskSet {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
