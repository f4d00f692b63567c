//! Error types for task domain validation and record decoding.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyName,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);

/// Errors returned while decoding a flat task record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record does not have the number of fields the schema expects.
    #[error("expected {expected} record fields, found {found}")]
    FieldCount {
        /// Field count of the current schema version.
        expected: usize,
        /// Field count of the offending record.
        found: usize,
    },

    /// A required field was absent.
    #[error("record field '{0}' must not be null")]
    MissingField(&'static str),

    /// The identifier is not a valid UUID.
    #[error("invalid task identifier '{0}'")]
    InvalidId(String),

    /// A stored field is not valid UTF-8 text.
    #[error("record field '{0}' is not valid UTF-8")]
    Encoding(&'static str),

    /// The stored name is empty after trimming.
    #[error("stored task name is empty")]
    EmptyName,

    /// The status string is not one of the known statuses.
    #[error(transparent)]
    Status(#[from] ParseStatusError),

    /// A timestamp field could not be parsed.
    #[error("invalid timestamp '{value}' in field '{field}'")]
    Timestamp {
        /// Name of the offending field.
        field: &'static str,
        /// Raw stored value.
        value: String,
    },

    /// The stored update timestamp precedes the creation timestamp.
    #[error("last_updated precedes created_at")]
    TimestampOrder,
}
