//! Task entity and its status transition logic.

use super::{ClosingStatus, Status, TaskDomainError, TaskId, TaskName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked unit of work.
///
/// Tasks never touch storage; callers persist every change they make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: TaskName,
    category: String,
    status: Status,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted display name.
    pub name: TaskName,
    /// Persisted category label.
    pub category: String,
    /// Persisted lifecycle status.
    pub status: Status,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted timestamp of the latest status change.
    pub last_updated: DateTime<Utc>,
    /// Persisted closing timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyName`] when `name` trims to empty.
    pub fn create(
        name: impl Into<String>,
        category: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            name: TaskName::new(name)?,
            category: category.into().trim().to_owned(),
            status: Status::Active,
            created_at: timestamp,
            last_updated: timestamp,
            completed_at: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            category: data.category,
            status: data.status,
            created_at: data.created_at,
            last_updated: data.last_updated,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the category label, possibly empty.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the latest status change.
    #[must_use]
    pub const fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Returns the closing timestamp, if the task is closed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Moves the task to `status` at time `now`.
    ///
    /// `completed_at` is stamped with the new `last_updated` when `status`
    /// is the designated closing status and cleared otherwise.
    ///
    /// A `now` earlier than `created_at` is overridden: `last_updated` (and
    /// `completed_at`, when stamped) is set to `created_at` instead, so the
    /// stored time differs from the caller's `now` when the clock has gone
    /// backwards.
    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>, closing: ClosingStatus) {
        self.status = status;
        self.last_updated = now.max(self.created_at);
        self.completed_at = closing.closes(status).then_some(self.last_updated);
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.label(), self.name)
    }
}
