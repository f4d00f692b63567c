//! `SQLite` store implementation for task persistence.

use super::{
    models::{
        NewTaskRow, RawCategoryRow, RawTaskRow, SELECT_RAW_CATEGORIES_SQL, SELECT_RAW_TASKS_SQL,
    },
    schema::tasks,
};
use crate::task::{
    domain::{Status, Task, TaskId, TaskRecord, format_timestamp},
    ports::{LoadedTasks, MalformedRow, TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Schema bootstrap applied by [`TaskStore::init`].
const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_tasks/up.sql");

/// `SQLite` connection pool type used by task adapters.
pub type TaskSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// `SQLite`-backed task store.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: TaskSqlitePool,
}

impl SqliteTaskStore {
    /// Creates a new store from a `SQLite` connection pool.
    #[must_use]
    pub const fn new(pool: TaskSqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database file at `path`.
    ///
    /// Missing parent directories are created. The pool holds a single
    /// connection because one process owns the file.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unavailable`] when the path is not valid
    /// UTF-8 or when the directory or the database file cannot be created or
    /// opened.
    pub fn open(database: impl AsRef<Path>) -> TaskStoreResult<Self> {
        let path = database.as_ref();
        let url = path.to_str().ok_or_else(|| {
            TaskStoreError::unavailable(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("database path is not valid UTF-8: {}", path.display()),
            ))
        })?;
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(TaskStoreError::unavailable)?;
        }

        let manager = ConnectionManager::<SqliteConnection>::new(url);
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)
            .map_err(TaskStoreError::unavailable)?;
        tracing::debug!(path = %path.display(), "opened task database");
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::unavailable)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    #[tracing::instrument(level = "debug", skip_all)]
    async fn init(&self) -> TaskStoreResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_TASKS_SQL)
                .map_err(TaskStoreError::unavailable)
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(task_id = %task.id()))]
    async fn insert(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStoreError::DuplicateId(task_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn select_all(&self) -> TaskStoreResult<LoadedTasks> {
        self.run_blocking(|connection| {
            let rows = diesel::sql_query(SELECT_RAW_TASKS_SQL)
                .load::<RawTaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            Ok(decode_rows(rows))
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(task_id = %id, status = %status))]
    async fn update_status(
        &self,
        id: TaskId,
        status: Status,
        last_updated: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> TaskStoreResult<()> {
        let updated_text = format_timestamp(last_updated);
        let completed_text = completed_at.map(format_timestamp);

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(id.to_string()))
                .set((
                    tasks::status.eq(status.as_str()),
                    tasks::last_updated.eq(updated_text),
                    tasks::completed_at.eq(completed_text),
                ))
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            if updated == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(task_id = %id))]
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            diesel::delete(tasks::table.find(id.to_string()))
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn distinct_categories(&self) -> TaskStoreResult<BTreeSet<String>> {
        self.run_blocking(|connection| {
            let rows = diesel::sql_query(SELECT_RAW_CATEGORIES_SQL)
                .load::<RawCategoryRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            Ok(rows
                .into_iter()
                .filter_map(|row| row.category)
                .filter_map(|bytes| String::from_utf8(bytes).ok())
                .collect())
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().to_string(),
        name: task.name().as_str().to_owned(),
        category: task.category().to_owned(),
        status: task.status().as_str().to_owned(),
        created_at: format_timestamp(task.created_at()),
        last_updated: format_timestamp(task.last_updated()),
        completed_at: task.completed_at().map(format_timestamp),
    }
}

fn decode_rows(rows: Vec<RawTaskRow>) -> LoadedTasks {
    let mut loaded = LoadedTasks::default();
    for row in rows {
        let key = row.key();
        match TaskRecord::try_from(row).and_then(Task::try_from) {
            Ok(task) => loaded.tasks.push(task),
            Err(error) => loaded.malformed.push(MalformedRow { key, error }),
        }
    }
    loaded
}
