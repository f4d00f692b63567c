//! Application services: the working set, view projection, and session.

mod intent;
mod projection;
mod session;
mod summary;
mod task_set;

pub use intent::{Direction, Flow, Intent};
pub use projection::{CategoryFilter, FilterSpec, SortKey, SortSpec, project};
pub use session::{Session, SessionError, SessionResult, SessionSettings};
pub use summary::HeaderSummary;
pub use task_set::{LoadReport, MalformedRowPolicy, TaskSet, TaskSetError};
