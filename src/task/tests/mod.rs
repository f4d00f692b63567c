//! Unit tests for the task module.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

mod status_tests;
mod support;
mod task_set_tests;
