//! Session coordinating store writes, the working set, and the visible view.

use super::{
    intent::{Direction, Flow, Intent},
    projection::{FilterSpec, SortKey, SortSpec, project},
    summary::HeaderSummary,
    task_set::{LoadReport, MalformedRowPolicy, TaskSet, TaskSetError},
};
use crate::task::{
    domain::{ClosingStatus, Status, Task, TaskDomainError, TaskId},
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Startup options for a [`Session`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSettings {
    /// Status that stamps `completed_at`.
    pub closing: ClosingStatus,
    /// Handling of rows that fail to decode on load.
    pub malformed_rows: MalformedRowPolicy,
    /// Initial ordering of the visible list.
    pub sort: SortSpec,
}

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input was rejected before anything was written.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// A store call failed; in-memory state is unchanged.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// Loading the working set failed.
    #[error(transparent)]
    Load(#[from] TaskSetError),
    /// The intent referenced a task that is not in the working set.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

impl SessionError {
    /// Returns whether the error should end a running session.
    ///
    /// Only a duplicate identifier is fatal. Store failures after startup are
    /// reported and the in-memory state stays as it was; a failure inside
    /// [`Session::open`] never yields a session at all.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(TaskStoreError::DuplicateId(_)))
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Single-actor coordinator over the store and the working set.
///
/// Every mutation takes `&mut self` and awaits its store call before touching
/// the working set, so the two never diverge.
pub struct Session<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    closing: ClosingStatus,
    malformed_rows: MalformedRowPolicy,
    tasks: TaskSet,
    filter: FilterSpec,
    sort: SortSpec,
    visible: Vec<TaskId>,
    selection: Option<usize>,
}

impl<S, C> Session<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Initialises the store and loads the working set.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when the schema cannot be ensured and
    /// [`SessionError::Load`] when loading fails.
    pub async fn open(
        store: Arc<S>,
        clock: Arc<C>,
        settings: SessionSettings,
    ) -> SessionResult<(Self, LoadReport)> {
        store.init().await?;

        let mut tasks = TaskSet::new();
        let report = tasks.load(&*store, settings.malformed_rows).await?;
        tracing::debug!(
            loaded = report.loaded,
            skipped = report.skipped,
            "session opened"
        );

        let mut session = Self {
            store,
            clock,
            closing: settings.closing,
            malformed_rows: settings.malformed_rows,
            tasks,
            filter: FilterSpec::none(),
            sort: settings.sort,
            visible: Vec::new(),
            selection: None,
        };
        session.refresh(None);
        Ok((session, report))
    }

    /// Creates and persists a task, then appends it to the working set.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Domain`] for an empty name and
    /// [`SessionError::Store`] when the insert fails. Nothing is added in
    /// either case.
    pub async fn add(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> SessionResult<Task> {
        let task = Task::create(name, category, &*self.clock)?;
        self.store.insert(&task).await?;

        let follow = self.selected_id();
        self.tasks.append(task.clone());
        self.refresh(follow);
        tracing::debug!(task_id = %task.id(), "task added");
        Ok(task)
    }

    /// Moves a task to `status` and persists the change.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] when the task is not in the working
    /// set and [`SessionError::Store`] when the update fails. The in-memory
    /// task is unchanged in both cases.
    pub async fn change_status(&mut self, id: TaskId, status: Status) -> SessionResult<Task> {
        let mut updated = self
            .tasks
            .find(id)
            .cloned()
            .ok_or(SessionError::NotFound(id))?;
        updated.set_status(status, self.clock.utc(), self.closing);

        if let Err(err) = self
            .store
            .update_status(
                id,
                updated.status(),
                updated.last_updated(),
                updated.completed_at(),
            )
            .await
        {
            tracing::warn!(task_id = %id, error = %err, "status change rolled back");
            return Err(err.into());
        }

        let follow = self.selected_id();
        self.tasks.replace(updated.clone());
        self.refresh(follow);
        tracing::debug!(task_id = %id, status = %status, "task status changed");
        Ok(updated)
    }

    /// Advances a task to the next status in lifecycle order.
    ///
    /// # Errors
    ///
    /// See [`Session::change_status`].
    pub async fn cycle_status(&mut self, id: TaskId) -> SessionResult<Task> {
        let current = self
            .tasks
            .find(id)
            .map(Task::status)
            .ok_or(SessionError::NotFound(id))?;
        self.change_status(id, current.successor()).await
    }

    /// Deletes a task from the store, then from the working set.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for a task missing from the working
    /// set and [`SessionError::Store`] when the delete fails.
    pub async fn delete(&mut self, id: TaskId) -> SessionResult<Task> {
        if self.tasks.find(id).is_none() {
            return Err(SessionError::NotFound(id));
        }
        self.store.delete(id).await?;

        let removed = self.tasks.remove(id).ok_or(SessionError::NotFound(id))?;
        self.refresh(None);
        tracing::debug!(task_id = %id, "task deleted");
        Ok(removed)
    }

    /// Replaces the active filter. The selection stays on the same row index.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.refresh(None);
    }

    /// Replaces the sort key, keeping the current direction.
    pub fn set_sort(&mut self, key: Option<SortKey>) {
        self.sort.key = key;
        self.refresh(None);
    }

    /// Flips the sort direction.
    pub fn toggle_sort_reverse(&mut self) {
        self.sort.reverse = !self.sort.reverse;
        self.refresh(None);
    }

    /// Moves the selection one row up.
    pub fn move_up(&mut self) {
        self.selection = self.selection.map(|index| index.saturating_sub(1));
    }

    /// Moves the selection one row down.
    pub fn move_down(&mut self) {
        self.selection = self
            .selection
            .and_then(|index| clamp(index.saturating_add(1), self.visible.len()));
    }

    /// Reloads the working set from the store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Load`] when the store cannot be read; the
    /// working set is then left as it was.
    pub async fn reload(&mut self) -> SessionResult<LoadReport> {
        let report = self.tasks.load(&*self.store, self.malformed_rows).await?;
        let follow = self.selected_id();
        self.refresh(follow);
        tracing::debug!(
            loaded = report.loaded,
            skipped = report.skipped,
            "task list reloaded"
        );
        Ok(report)
    }

    /// Returns the distinct categories known to the store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when the query fails.
    pub async fn categories(&self) -> SessionResult<BTreeSet<String>> {
        Ok(self.store.distinct_categories().await?)
    }

    /// Dispatches one intent.
    ///
    /// # Errors
    ///
    /// Propagates the error of the operation the intent maps to.
    pub async fn handle(&mut self, intent: Intent) -> SessionResult<Flow> {
        match intent {
            Intent::Navigate(Direction::Up) => self.move_up(),
            Intent::Navigate(Direction::Down) => self.move_down(),
            Intent::AddTask { name, category } => {
                self.add(name, category).await?;
            }
            Intent::SetStatus { task_id, status } => {
                self.change_status(task_id, status).await?;
            }
            Intent::DeleteTask(task_id) => {
                self.delete(task_id).await?;
            }
            Intent::SetFilter(filter) => self.set_filter(filter),
            Intent::SetSort(key) => self.set_sort(key),
            Intent::ToggleSortReverse => self.toggle_sort_reverse(),
            Intent::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Returns the total and per-status counts over every task.
    #[must_use]
    pub fn header(&self) -> HeaderSummary {
        HeaderSummary::from_tasks(&self.tasks)
    }

    /// Returns the filtered and sorted tasks in display order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        project(self.tasks.as_slice(), &self.filter, &self.sort)
    }

    /// Returns the selected row index, or `None` when nothing is visible.
    #[must_use]
    pub const fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Returns the task on the selected row.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_id().and_then(|id| self.tasks.find(id))
    }

    /// Looks up a task in the working set.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.find(id)
    }

    /// Returns the working set.
    #[must_use]
    pub const fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    /// Returns the active filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Returns the active ordering.
    #[must_use]
    pub const fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Returns the status that closes tasks.
    #[must_use]
    pub const fn closing_status(&self) -> ClosingStatus {
        self.closing
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selection
            .and_then(|index| self.visible.get(index))
            .copied()
    }

    fn refresh(&mut self, follow: Option<TaskId>) {
        let previous = self.selection;
        self.visible = project(self.tasks.as_slice(), &self.filter, &self.sort)
            .into_iter()
            .map(Task::id)
            .collect();

        let followed = follow.and_then(|id| self.visible.iter().position(|visible| *visible == id));
        self.selection = followed.or_else(|| clamp(previous.unwrap_or(0), self.visible.len()));
    }
}

fn clamp(index: usize, len: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    Some(index.min(last))
}
