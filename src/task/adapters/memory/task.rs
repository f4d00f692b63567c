//! In-memory task store for tests and ephemeral sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::task::{
    domain::{PersistedTaskData, Status, Task, TaskId},
    ports::{LoadedTasks, TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Rows are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    rows: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(tasks.into_iter().collect())),
        }
    }

    /// Returns a copy of the stored rows.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the lock is poisoned.
    pub fn snapshot(&self) -> TaskStoreResult<Vec<Task>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.clone())
    }
}

fn poisoned<T>(err: PoisonError<T>) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn init(&self) -> TaskStoreResult<()> {
        Ok(())
    }

    async fn insert(&self, task: &Task) -> TaskStoreResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        if rows.iter().any(|row| row.id() == task.id()) {
            return Err(TaskStoreError::DuplicateId(task.id()));
        }
        rows.push(task.clone());
        Ok(())
    }

    async fn select_all(&self) -> TaskStoreResult<LoadedTasks> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(LoadedTasks::new(rows.clone()))
    }

    async fn update_status(
        &self,
        id: TaskId,
        status: Status,
        last_updated: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> TaskStoreResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(TaskStoreError::NotFound(id))?;

        *row = Task::from_persisted(PersistedTaskData {
            id,
            name: row.name().clone(),
            category: row.category().to_owned(),
            status,
            created_at: row.created_at(),
            last_updated,
            completed_at,
        });
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        rows.retain(|row| row.id() != id);
        Ok(())
    }

    async fn distinct_categories(&self) -> TaskStoreResult<BTreeSet<String>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.iter().map(|row| row.category().to_owned()).collect())
    }
}
