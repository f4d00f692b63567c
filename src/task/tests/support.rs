//! Shared builders and doubles for task unit tests.

use crate::task::{
    domain::{PersistedTaskData, Status, Task, TaskId, TaskName},
    ports::{LoadedTasks, TaskStore, TaskStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::mock;
use std::collections::BTreeSet;

mock! {
    pub Store {}

    #[async_trait]
    impl TaskStore for Store {
        async fn init(&self) -> TaskStoreResult<()>;
        async fn insert(&self, task: &Task) -> TaskStoreResult<()>;
        async fn select_all(&self) -> TaskStoreResult<LoadedTasks>;
        async fn update_status(
            &self,
            id: TaskId,
            status: Status,
            last_updated: DateTime<Utc>,
            completed_at: Option<DateTime<Utc>>,
        ) -> TaskStoreResult<()>;
        async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;
        async fn distinct_categories(&self) -> TaskStoreResult<BTreeSet<String>>;
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Builds a persisted task created `minutes` after [`epoch`].
pub fn task_at(name: &str, category: &str, status: Status, minutes: i64) -> Task {
    let created_at = epoch() + Duration::minutes(minutes);
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        name: TaskName::new(name).expect("valid task name"),
        category: category.to_owned(),
        status,
        created_at,
        last_updated: created_at,
        completed_at: None,
    })
}

pub fn names<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a str> {
    tasks.into_iter().map(|task| task.name().as_str()).collect()
}
