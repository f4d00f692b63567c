//! Taskdeck: a terminal task tracker.
//!
//! Users create tasks, move them through a fixed lifecycle of statuses, and
//! browse them through filtered, sorted views backed by a `SQLite` file.
//!
//! # Architecture
//!
//! Taskdeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`SQLite`, in-memory)
//!
//! # Modules
//!
//! - [`task`]: Task model, persistence, projection, and session
//! - [`config`]: Layered runtime configuration
//! - [`tui`]: Terminal front end driving a session

pub mod config;
pub mod task;
pub mod tui;
