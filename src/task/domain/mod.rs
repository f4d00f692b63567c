//! Domain model for the task tracker.
//!
//! The task domain models the status lifecycle, task creation and status
//! transitions, and the flat record encoding used at the persistence
//! boundary, while keeping all infrastructure concerns outside of it.

mod error;
mod ids;
mod record;
mod status;
mod task;

pub use error::{ParseStatusError, RecordError, TaskDomainError};
pub use ids::{TaskId, TaskName};
pub use record::{RECORD_FIELDS, TaskRecord, format_timestamp, parse_timestamp};
pub use status::{ClosingStatus, Status};
pub use task::{PersistedTaskData, Task};
