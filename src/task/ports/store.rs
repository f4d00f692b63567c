//! Store port for durable task persistence.

use crate::task::domain::{RecordError, Status, Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// The store is the system of record. Every operation is atomic with respect
/// to the durable medium.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Ensures the durable schema exists. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unavailable`] when the medium cannot be
    /// opened or created.
    async fn init(&self) -> TaskStoreResult<()>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateId`] when the task ID already
    /// exists.
    async fn insert(&self, task: &Task) -> TaskStoreResult<()>;

    /// Returns every stored task together with rows that failed to decode.
    ///
    /// No ordering is guaranteed.
    async fn select_all(&self) -> TaskStoreResult<LoadedTasks>;

    /// Overwrites the status, update timestamp and closing timestamp of a
    /// task, leaving every other field untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update_status(
        &self,
        id: TaskId,
        status: Status,
        last_updated: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> TaskStoreResult<()>;

    /// Removes a task. Removing an absent task succeeds.
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;

    /// Returns the distinct category labels currently stored.
    async fn distinct_categories(&self) -> TaskStoreResult<BTreeSet<String>>;
}

/// A stored row that could not be decoded into a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// Stored row key, when it could be read.
    pub key: Option<String>,
    /// Decoding failure.
    pub error: RecordError,
}

/// Outcome of reading every stored row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedTasks {
    /// Rows decoded into tasks.
    pub tasks: Vec<Task>,
    /// Rows that failed to decode.
    pub malformed: Vec<MalformedRow>,
}

impl LoadedTasks {
    /// Wraps fully decoded tasks.
    #[must_use]
    pub const fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            malformed: Vec::new(),
        }
    }
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The durable medium cannot be opened or created.
    #[error("storage unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateId(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a failure to open the durable medium.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
