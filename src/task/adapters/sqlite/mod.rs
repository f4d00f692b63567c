//! `SQLite` adapters for task persistence.

mod models;
mod schema;
mod store;

pub use store::{SqliteTaskStore, TaskSqlitePool};
