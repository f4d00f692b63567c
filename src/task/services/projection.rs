//! Filtering and sorting of the working set for display.
//!
//! [`project`] is a pure function: it never mutates its input and always
//! yields the same sequence for the same arguments.

use crate::task::domain::{Status, Task};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Restricts tasks by exact category match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Category value compared case-sensitively.
    pub value: String,
    /// Keep matching tasks when `true`, non-matching tasks when `false`.
    pub include: bool,
}

impl CategoryFilter {
    /// Keeps only tasks in `value`.
    #[must_use]
    pub fn including(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            include: true,
        }
    }

    /// Keeps only tasks outside `value`.
    #[must_use]
    pub fn excluding(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            include: false,
        }
    }

    /// Returns whether `task` passes this filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        (task.category() == self.value) == self.include
    }
}

/// Active filter restrictions. An absent restriction admits every task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Keep only tasks with this status.
    pub status: Option<Status>,
    /// Keep tasks according to their category.
    pub category: Option<CategoryFilter>,
}

impl FilterSpec {
    /// Returns a filter admitting every task.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            status: None,
            category: None,
        }
    }

    /// Sets the status restriction.
    #[must_use]
    pub const fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    /// Sets the category restriction.
    #[must_use]
    pub fn with_category(mut self, category: Option<CategoryFilter>) -> Self {
        self.category = category;
        self
    }

    /// Returns whether no restriction is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.category.is_none()
    }

    /// Returns whether `task` passes both restrictions.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self
                .category
                .as_ref()
                .is_none_or(|category| category.matches(task))
    }
}

/// Field used to order the visible tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Display name, case-insensitive.
    Name,
    /// Category label, case-insensitive.
    Category,
    /// Lifecycle position.
    Status,
    /// Creation time.
    CreatedAt,
    /// Time of the latest status change.
    UpdatedAt,
}

impl SortKey {
    /// Every sort key in menu order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Category,
        Self::Status,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Category => "Category",
            Self::Status => "Status",
            Self::CreatedAt => "Created",
            Self::UpdatedAt => "Updated",
        }
    }

    /// Steps through `None`, then each key in [`SortKey::ALL`], then back to
    /// `None`.
    #[must_use]
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Name),
            Some(key) => {
                let position = Self::ALL.iter().position(|candidate| *candidate == key)?;
                Self::ALL.get(position + 1).copied()
            }
        }
    }

    fn compare(self, left: &Task, right: &Task) -> Ordering {
        match self {
            Self::Name => compare_folded(left.name().as_str(), right.name().as_str()),
            Self::Category => compare_folded(left.category(), right.category()),
            Self::Status => left.status().cmp(&right.status()),
            Self::CreatedAt => left.created_at().cmp(&right.created_at()),
            Self::UpdatedAt => left.last_updated().cmp(&right.last_updated()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Sort key, or `None` to keep working-set order.
    pub key: Option<SortKey>,
    /// Flip every comparison.
    pub reverse: bool,
}

impl SortSpec {
    /// Creates a sort order from a key and direction.
    #[must_use]
    pub const fn new(key: Option<SortKey>, reverse: bool) -> Self {
        Self { key, reverse }
    }
}

/// Filters then orders `tasks` for display.
///
/// Sorting is stable and `reverse` flips each comparison rather than the
/// resulting list, so tasks with equal keys keep their input order in both
/// directions.
#[must_use]
pub fn project<'a>(tasks: &'a [Task], filter: &FilterSpec, sort: &SortSpec) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|task| filter.matches(task)).collect();

    if let Some(key) = sort.key {
        visible.sort_by(|left, right| {
            let ordering = key.compare(left, right);
            if sort.reverse {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    visible
}

fn compare_folded(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}
