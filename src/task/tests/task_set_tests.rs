//! Working-set loading and bookkeeping.

use super::support::{MockStore, names, task_at};
use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{ClosingStatus, RecordError, Status, TaskId},
    ports::{LoadedTasks, MalformedRow, TaskStoreError},
    services::{LoadReport, MalformedRowPolicy, TaskSet, TaskSetError},
};
use rstest::rstest;

fn malformed_rows() -> LoadedTasks {
    LoadedTasks {
        tasks: vec![task_at("Keep me", "", Status::Active, 0)],
        malformed: vec![MalformedRow {
            key: Some("row-7".to_owned()),
            error: RecordError::TimestampOrder,
        }],
    }
}

fn store_returning(loaded: LoadedTasks) -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_select_all()
        .returning(move || Ok(loaded.clone()));
    store
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_replaces_contents_with_store_rows() {
    let store = InMemoryTaskStore::with_tasks([
        task_at("One", "", Status::Active, 0),
        task_at("Two", "", Status::Hold, 1),
    ]);
    let mut set: TaskSet = [task_at("Stale", "", Status::Active, 2)].into_iter().collect();

    let report = set
        .load(&store, MalformedRowPolicy::Skip)
        .await
        .expect("load succeeds");

    assert_eq!(report, LoadReport { loaded: 2, skipped: 0 });
    assert_eq!(names(&set), ["One", "Two"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skip_policy_counts_malformed_rows() {
    let store = store_returning(malformed_rows());
    let mut set = TaskSet::new();

    let report = set
        .load(&store, MalformedRowPolicy::Skip)
        .await
        .expect("load succeeds");

    assert_eq!(report, LoadReport { loaded: 1, skipped: 1 });
    assert_eq!(names(&set), ["Keep me"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn abort_policy_fails_and_keeps_previous_contents() {
    let store = store_returning(malformed_rows());
    let mut set: TaskSet = [task_at("Previous", "", Status::Hold, 0)].into_iter().collect();

    let result = set.load(&store, MalformedRowPolicy::Abort).await;

    assert!(matches!(
        result,
        Err(TaskSetError::Malformed {
            key: Some(ref key),
            error: RecordError::TimestampOrder,
        }) if key == "row-7"
    ));
    assert_eq!(names(&set), ["Previous"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_failure_propagates_and_keeps_contents() {
    let mut store = MockStore::new();
    store.expect_select_all().returning(|| {
        Err(TaskStoreError::unavailable(std::io::Error::other(
            "disk gone",
        )))
    });
    let mut set: TaskSet = [task_at("Previous", "", Status::Hold, 0)].into_iter().collect();

    let result = set.load(&store, MalformedRowPolicy::Skip).await;

    assert!(matches!(
        result,
        Err(TaskSetError::Store(TaskStoreError::Unavailable(_)))
    ));
    assert_eq!(set.len(), 1);
}

#[rstest]
fn append_find_and_remove() {
    let first = task_at("First", "", Status::Active, 0);
    let second = task_at("Second", "", Status::Active, 1);
    let mut set = TaskSet::new();
    set.append(first.clone());
    set.append(second.clone());

    assert_eq!(set.find(second.id()), Some(&second));
    assert_eq!(set.remove(first.id()), Some(first.clone()));
    assert_eq!(set.find(first.id()), None);
    assert_eq!(set.remove(first.id()), None);
    assert_eq!(set.len(), 1);
}

#[rstest]
fn replace_swaps_matching_task_only() {
    let original = task_at("Task", "", Status::Active, 0);
    let mut set: TaskSet = [original.clone()].into_iter().collect();

    let mut changed = original.clone();
    changed.set_status(Status::Hold, original.created_at(), ClosingStatus::default());
    assert_eq!(set.replace(changed.clone()), Some(original));
    assert_eq!(set.find(changed.id()).map(|task| task.status()), Some(Status::Hold));

    let stranger = task_at("Stranger", "", Status::Active, 1);
    assert_eq!(set.replace(stranger), None);
    assert_eq!(set.len(), 1);
}

#[rstest]
fn empty_set_has_no_tasks() {
    let set = TaskSet::new();
    assert!(set.is_empty());
    assert_eq!(set.find(TaskId::new()), None);
}
