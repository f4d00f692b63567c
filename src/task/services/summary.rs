//! Header counts over the whole working set.

use crate::task::domain::{Status, Task};
use std::collections::BTreeMap;

/// Total and per-status task counts.
///
/// Counts cover every task regardless of the active filter. Every status is
/// present, with zero when no task holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSummary {
    total: usize,
    counts: BTreeMap<Status, usize>,
}

impl HeaderSummary {
    /// Counts `tasks`.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts: BTreeMap<Status, usize> =
            Status::ALL.iter().map(|status| (*status, 0)).collect();
        let mut total = 0;
        for task in tasks {
            total += 1;
            *counts.entry(task.status()).or_default() += 1;
        }
        Self { total, counts }
    }

    /// Returns the number of tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of tasks with `status`.
    #[must_use]
    pub fn count(&self, status: Status) -> usize {
        self.counts.get(&status).copied().unwrap_or_default()
    }

    /// Iterates over `(status, count)` pairs in lifecycle order.
    pub fn iter(&self) -> impl Iterator<Item = (Status, usize)> + '_ {
        self.counts.iter().map(|(status, count)| (*status, *count))
    }
}
