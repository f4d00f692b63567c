//! End-to-end session scenarios over a `SQLite` database file.
//!
//! Each scenario drives a [`Session`] the way the terminal front end does,
//! then reopens the file to check what was persisted.

use eyre::{Result, ensure};
use mockable::DefaultClock;
use std::path::Path;
use std::sync::Arc;
use taskdeck::task::{
    adapters::sqlite::SqliteTaskStore,
    domain::{Status, Task},
    services::{CategoryFilter, FilterSpec, Flow, Intent, Session, SessionSettings, SortKey},
};
use tempfile::TempDir;

type SqliteSession = Session<SqliteTaskStore, DefaultClock>;

async fn open_session(path: &Path) -> Result<SqliteSession> {
    let store = SqliteTaskStore::open(path)?;
    let (session, _) = Session::open(
        Arc::new(store),
        Arc::new(DefaultClock),
        SessionSettings::default(),
    )
    .await?;
    Ok(session)
}

fn visible_names(session: &SqliteSession) -> Vec<String> {
    session
        .visible()
        .into_iter()
        .map(|task| task.name().as_str().to_owned())
        .collect()
}

/// Seeds A (Active), B (On Hold) and C (Completed, category `x`).
async fn seed(session: &mut SqliteSession) -> Result<()> {
    session.add("A", "").await?;
    let b = session.add("B", "").await?;
    session.change_status(b.id(), Status::Hold).await?;
    let c = session.add("C", "x").await?;
    session.change_status(c.id(), Status::Completed).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn filtering_and_sorting_a_seeded_list() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open_session(&dir.path().join("tasks.db")).await?;
    seed(&mut session).await?;

    session.set_filter(FilterSpec::none().with_status(Some(Status::Hold)));
    ensure!(visible_names(&session) == ["B"], "status filter keeps B");

    session.set_filter(FilterSpec::none());
    session.set_sort(Some(SortKey::Status));
    ensure!(
        visible_names(&session) == ["A", "B", "C"],
        "status sort follows lifecycle order"
    );

    session.set_filter(FilterSpec::none().with_category(Some(CategoryFilter::including("x"))));
    ensure!(visible_names(&session) == ["C"], "category filter keeps C");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_the_only_visible_task_clears_selection() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open_session(&dir.path().join("tasks.db")).await?;
    seed(&mut session).await?;
    session.set_filter(FilterSpec::none().with_status(Some(Status::Hold)));
    let before = session.header();
    let target = session
        .selected_task()
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("B should be selected"))?;

    let flow = session.handle(Intent::DeleteTask(target)).await?;

    let after = session.header();
    ensure!(flow == Flow::Continue, "delete keeps the session running");
    ensure!(session.visible().is_empty(), "nothing left to show");
    ensure!(session.selection().is_none(), "selection cleared");
    ensure!(after.total() + 1 == before.total(), "total drops by one");
    ensure!(
        after.count(Status::Hold) + 1 == before.count(Status::Hold),
        "hold count drops by one"
    );
    ensure!(
        after.count(Status::Active) == before.count(Status::Active),
        "other counts unchanged"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn changes_are_visible_after_reopening() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tasks.db");
    let closed_id = {
        let mut writer = open_session(&path).await?;
        seed(&mut writer).await?;
        let doomed = writer.add("Doomed", "tmp").await?;
        writer.delete(doomed.id()).await?;
        let flipped = writer.add("Reopened", "").await?;
        writer.change_status(flipped.id(), Status::Completed).await?;
        writer.change_status(flipped.id(), Status::Active).await?;
        flipped.id()
    };

    let session = open_session(&path).await?;

    let mut names: Vec<String> = session
        .tasks()
        .iter()
        .map(|task| task.name().as_str().to_owned())
        .collect();
    names.sort();
    ensure!(names == ["A", "B", "C", "Reopened"], "persisted set: {names:?}");

    let reopened = session
        .task(closed_id)
        .ok_or_else(|| eyre::eyre!("reopened task persisted"))?;
    ensure!(reopened.status() == Status::Active, "status persisted");
    ensure!(reopened.completed_at().is_none(), "reopening clears completion");

    let completed = session
        .tasks()
        .iter()
        .find(|task| task.name().as_str() == "C")
        .ok_or_else(|| eyre::eyre!("C persisted"))?;
    ensure!(completed.completed_at().is_some(), "completion time persisted");
    ensure!(completed.category() == "x", "category persisted");

    let categories = session.categories().await?;
    ensure!(
        categories.iter().any(|category| category == "x"),
        "categories come from the store"
    );
    ensure!(
        !categories.iter().any(|category| category == "tmp"),
        "deleted task's category is gone"
    );
    Ok(())
}
