//! Diesel row models for task persistence.

use super::schema::tasks;
use crate::task::domain::{RecordError, TaskRecord};
use diesel::prelude::*;
use diesel::sql_types::{Binary, Nullable};

/// Reads every column as raw bytes so one undecodable row cannot fail the
/// whole query.
pub const SELECT_RAW_TASKS_SQL: &str = "SELECT \
    CAST(id AS BLOB) AS id, \
    CAST(name AS BLOB) AS name, \
    CAST(category AS BLOB) AS category, \
    CAST(status AS BLOB) AS status, \
    CAST(created_at AS BLOB) AS created_at, \
    CAST(last_updated AS BLOB) AS last_updated, \
    CAST(completed_at AS BLOB) AS completed_at \
    FROM tasks";

/// Distinct category values as raw bytes.
pub const SELECT_RAW_CATEGORIES_SQL: &str =
    "SELECT DISTINCT CAST(category AS BLOB) AS category FROM tasks";

/// Query result row holding undecoded column bytes.
#[derive(Debug, Clone, QueryableByName)]
pub struct RawTaskRow {
    /// Task identifier.
    #[diesel(sql_type = Nullable<Binary>)]
    pub id: Option<Vec<u8>>,
    /// Display name.
    #[diesel(sql_type = Nullable<Binary>)]
    pub name: Option<Vec<u8>>,
    /// Category label.
    #[diesel(sql_type = Nullable<Binary>)]
    pub category: Option<Vec<u8>>,
    /// Status string.
    #[diesel(sql_type = Nullable<Binary>)]
    pub status: Option<Vec<u8>>,
    /// Creation timestamp.
    #[diesel(sql_type = Nullable<Binary>)]
    pub created_at: Option<Vec<u8>>,
    /// Latest status change timestamp.
    #[diesel(sql_type = Nullable<Binary>)]
    pub last_updated: Option<Vec<u8>>,
    /// Closing timestamp.
    #[diesel(sql_type = Nullable<Binary>)]
    pub completed_at: Option<Vec<u8>>,
}

impl RawTaskRow {
    /// Returns the identifier as text, when it decodes, for diagnostics.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        self.id
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .map(str::to_owned)
    }
}

impl TryFrom<RawTaskRow> for TaskRecord {
    type Error = RecordError;

    fn try_from(row: RawTaskRow) -> Result<Self, Self::Error> {
        let columns = [
            ("id", row.id),
            ("name", row.name),
            ("category", row.category),
            ("status", row.status),
            ("created_at", row.created_at),
            ("last_updated", row.last_updated),
            ("completed_at", row.completed_at),
        ];
        let fields = columns
            .into_iter()
            .map(|(field, bytes)| {
                bytes
                    .map(|raw| String::from_utf8(raw).map_err(|_| RecordError::Encoding(field)))
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(fields))
    }
}

/// One distinct category value.
#[derive(Debug, Clone, QueryableByName)]
pub struct RawCategoryRow {
    /// Category bytes, `None` for a null column.
    #[diesel(sql_type = Nullable<Binary>)]
    pub category: Option<Vec<u8>>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Status string.
    pub status: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Latest status change timestamp.
    pub last_updated: String,
    /// Closing timestamp.
    pub completed_at: Option<String>,
}
