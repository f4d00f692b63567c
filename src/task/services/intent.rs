//! Closed set of user intents accepted by a [`Session`](super::Session).

use super::projection::{FilterSpec, SortKey};
use crate::task::domain::{Status, TaskId};

/// Navigation step within the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the first row.
    Up,
    /// Towards the last row.
    Down,
}

/// A user request dispatched through [`Session::handle`](super::Session::handle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Move the selection one row.
    Navigate(Direction),
    /// Create a task.
    AddTask {
        /// Display name, trimmed before validation.
        name: String,
        /// Category label, may be empty.
        category: String,
    },
    /// Move a task to a new status.
    SetStatus {
        /// Target task.
        task_id: TaskId,
        /// New status.
        status: Status,
    },
    /// Delete a task.
    DeleteTask(TaskId),
    /// Replace the active filter.
    SetFilter(FilterSpec),
    /// Replace the sort key, keeping the direction.
    SetSort(Option<SortKey>),
    /// Flip the sort direction.
    ToggleSortReverse,
    /// Leave the event loop.
    Quit,
}

/// Whether the event loop keeps running after an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep handling intents.
    Continue,
    /// Stop the event loop.
    Quit,
}
