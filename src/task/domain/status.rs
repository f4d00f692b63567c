//! Task lifecycle status and its fixed ordering.

use super::ParseStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// Variants are declared in display and sort order, so the derived `Ord`
/// matches [`Status::ALL`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Task has been created and is open.
    #[default]
    Active,
    /// Task is being worked on.
    InProgress,
    /// Task is paused.
    Hold,
    /// Task has been abandoned.
    Cancelled,
    /// Task has been finished.
    Completed,
}

impl Status {
    /// Every status, in the fixed total order.
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::InProgress,
        Self::Hold,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::InProgress => "in_progress",
            Self::Hold => "hold",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::InProgress => "In Progress",
            Self::Hold => "On Hold",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }

    /// Returns the position of this status in [`Status::ALL`].
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Active => 0,
            Self::InProgress => 1,
            Self::Hold => 2,
            Self::Cancelled => 3,
            Self::Completed => 4,
        }
    }

    /// Returns the next status in order, wrapping from the last to the first.
    #[must_use]
    pub const fn successor(self) -> Self {
        match self {
            Self::Active => Self::InProgress,
            Self::InProgress => Self::Hold,
            Self::Hold => Self::Cancelled,
            Self::Cancelled => Self::Completed,
            Self::Completed => Self::Active,
        }
    }
}

impl TryFrom<&str> for Status {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "in_progress" => Ok(Self::InProgress),
            "hold" => Ok(Self::Hold),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The status whose entry stamps `completed_at`.
///
/// Deployments pick one designated closing status; every other status
/// clears `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosingStatus(Status);

impl ClosingStatus {
    /// Designates `status` as the closing status.
    #[must_use]
    pub const fn new(status: Status) -> Self {
        Self(status)
    }

    /// Returns the designated status.
    #[must_use]
    pub const fn status(self) -> Status {
        self.0
    }

    /// Returns whether entering `status` closes a task.
    #[must_use]
    pub fn closes(self, status: Status) -> bool {
        self.0 == status
    }
}

impl Default for ClosingStatus {
    fn default() -> Self {
        Self(Status::Completed)
    }
}
