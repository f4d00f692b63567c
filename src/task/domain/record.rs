//! Flat record codec used at the persistence boundary.
//!
//! A record is the ordered field list
//! `[id, name, category, status, created_at, last_updated, completed_at]`.
//! Every field is text; only `completed_at` may be null. Timestamps use
//! RFC 3339 with nanosecond precision in UTC, which sorts lexicographically
//! and round-trips without loss. Older databases hold ISO 8601 values
//! without an offset; those are read as UTC.

use super::{PersistedTaskData, RecordError, Status, Task, TaskId, TaskName};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Layout of offset-less timestamps, as written by `isoformat()`.
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Number of fields in schema version 1.
pub const RECORD_FIELDS: usize = 7;

/// Ordered, untyped field list for one task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    fields: Vec<Option<String>>,
}

impl TaskRecord {
    /// Wraps raw fields without validating them.
    #[must_use]
    pub const fn new(fields: Vec<Option<String>>) -> Self {
        Self { fields }
    }

    /// Returns the raw fields in schema order.
    #[must_use]
    pub fn fields(&self) -> &[Option<String>] {
        &self.fields
    }

    /// Consumes the record and returns its fields.
    #[must_use]
    pub fn into_fields(self) -> Vec<Option<String>> {
        self.fields
    }

    /// Returns the identifier field, if present, for diagnostics.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.fields.first().and_then(Option::as_deref)
    }
}

impl Task {
    /// Encodes the task as a flat record.
    #[must_use]
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord::new(vec![
            Some(self.id().to_string()),
            Some(self.name().as_str().to_owned()),
            Some(self.category().to_owned()),
            Some(self.status().as_str().to_owned()),
            Some(format_timestamp(self.created_at())),
            Some(format_timestamp(self.last_updated())),
            self.completed_at().map(format_timestamp),
        ])
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        task.to_record()
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = RecordError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let fields: [Option<String>; RECORD_FIELDS] =
            record
                .into_fields()
                .try_into()
                .map_err(|fields: Vec<Option<String>>| RecordError::FieldCount {
                    expected: RECORD_FIELDS,
                    found: fields.len(),
                })?;
        let [
            raw_id,
            raw_name,
            raw_category,
            raw_status,
            raw_created,
            raw_updated,
            raw_completed,
        ] = fields;

        let id_text = required("id", raw_id)?;
        let id = Uuid::parse_str(&id_text)
            .map(TaskId::from_uuid)
            .map_err(|_| RecordError::InvalidId(id_text))?;
        let name =
            TaskName::new(required("name", raw_name)?).map_err(|_| RecordError::EmptyName)?;
        let category = required("category", raw_category)?;
        let status = Status::try_from(required("status", raw_status)?.as_str())?;
        let created_at = parse_timestamp("created_at", &required("created_at", raw_created)?)?;
        let last_updated =
            parse_timestamp("last_updated", &required("last_updated", raw_updated)?)?;
        let completed_at = raw_completed
            .filter(|value| !value.is_empty())
            .map(|value| parse_timestamp("completed_at", &value))
            .transpose()?;

        if last_updated < created_at {
            return Err(RecordError::TimestampOrder);
        }

        Ok(Self::from_persisted(PersistedTaskData {
            id,
            name,
            category,
            status,
            created_at,
            last_updated,
            completed_at,
        }))
    }
}

/// Formats a timestamp in the canonical record encoding.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parses a timestamp from the canonical record encoding.
///
/// Any RFC 3339 offset is accepted and normalised to UTC. A value with no
/// offset at all (`2025-03-01T10:15:30.123456`) is taken to be UTC.
///
/// # Errors
///
/// Returns [`RecordError::Timestamp`] when `value` matches neither form.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, RecordError> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, NAIVE_TIMESTAMP_FORMAT)
                .map(|naive| naive.and_utc())
        })
        .map_err(|_| RecordError::Timestamp {
            field,
            value: value.to_owned(),
        })
}

fn required(field: &'static str, value: Option<String>) -> Result<String, RecordError> {
    value.ok_or(RecordError::MissingField(field))
}
