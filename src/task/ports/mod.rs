//! Port contracts for task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod store;

pub use store::{LoadedTasks, MalformedRow, TaskStore, TaskStoreError, TaskStoreResult};
