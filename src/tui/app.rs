//! Key handling and modal state for the terminal front end.
//!
//! [`App::on_key`] turns a key press into an [`Action`] without touching the
//! session; [`App::perform`] then runs the action. Keeping the two apart lets
//! the event loop decide how to drive the async session calls.

use crate::task::{
    domain::{Status, TaskId},
    ports::TaskStore,
    services::{
        CategoryFilter, Direction, FilterSpec, Flow, Intent, Session, SessionError,
        SessionResult, SortKey,
    },
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mockable::Clock;

/// Current input mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Browsing the task list.
    #[default]
    Browse,
    /// Typing the name of a new task.
    Name {
        /// Text typed so far.
        buffer: String,
    },
    /// Typing the category of a new task.
    Category {
        /// Name entered in the previous prompt.
        name: String,
        /// Text typed so far.
        buffer: String,
    },
    /// Choosing a status for one task.
    StatusPicker {
        /// Task being changed.
        task_id: TaskId,
        /// Highlighted row in [`Status::ALL`].
        cursor: usize,
    },
    /// Choosing a category filter.
    CategoryPicker {
        /// Known categories.
        options: Vec<String>,
        /// Highlighted row in `options`.
        cursor: usize,
        /// Whether the filter keeps or drops the chosen category.
        include: bool,
    },
}

/// Work requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to run.
    None,
    /// Forward an intent to the session.
    Dispatch(Intent),
    /// Advance a task to its next status.
    CycleStatus(TaskId),
    /// Reload the working set from the store.
    Reload,
    /// Fetch categories and open the category picker.
    PickCategory,
}

/// Front-end state that lives beside the session.
#[derive(Debug, Clone, Default)]
pub struct App {
    mode: Mode,
    notice: Option<String>,
}

impl App {
    /// Creates an app in browse mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current input mode.
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Returns the message shown in the footer, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Replaces the footer message.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Maps a key press to an action, updating the input mode.
    pub fn on_key<S, C>(&mut self, key: KeyEvent, session: &Session<S, C>) -> Action
    where
        S: TaskStore,
        C: Clock + Send + Sync,
    {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Dispatch(Intent::Quit);
        }
        self.notice = None;

        match std::mem::take(&mut self.mode) {
            Mode::Browse => self.browse_key(key.code, session),
            Mode::Name { buffer } => self.name_key(key.code, buffer),
            Mode::Category { name, buffer } => self.category_key(key.code, name, buffer),
            Mode::StatusPicker { task_id, cursor } => self.status_key(key.code, task_id, cursor),
            Mode::CategoryPicker {
                options,
                cursor,
                include,
            } => self.category_picker_key(key.code, session.filter(), options, cursor, include),
        }
    }

    /// Runs an action against the session.
    ///
    /// Non-fatal failures become the footer notice and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns the error when [`SessionError::is_fatal`] holds.
    pub async fn perform<S, C>(
        &mut self,
        session: &mut Session<S, C>,
        action: Action,
    ) -> SessionResult<Flow>
    where
        S: TaskStore,
        C: Clock + Send + Sync,
    {
        let result = match action {
            Action::None => Ok(Flow::Continue),
            Action::Dispatch(intent) => session.handle(intent).await,
            Action::CycleStatus(task_id) => session.cycle_status(task_id).await.map(|task| {
                self.notify(format!("{task}"));
                Flow::Continue
            }),
            Action::Reload => session.reload().await.map(|report| {
                self.notify(format!(
                    "Loaded {} tasks, skipped {}",
                    report.loaded, report.skipped
                ));
                Flow::Continue
            }),
            Action::PickCategory => session.categories().await.map(|categories| {
                self.open_category_picker(categories.into_iter().collect());
                Flow::Continue
            }),
        };
        self.settle(result)
    }

    fn settle(&mut self, result: SessionResult<Flow>) -> SessionResult<Flow> {
        match result {
            Err(err) if !err.is_fatal() => {
                tracing::warn!(error = %err, "operation failed");
                self.notify(describe(&err));
                Ok(Flow::Continue)
            }
            other => other,
        }
    }

    fn open_category_picker(&mut self, options: Vec<String>) {
        if options.is_empty() {
            self.notify("No categories yet");
            return;
        }
        self.mode = Mode::CategoryPicker {
            options,
            cursor: 0,
            include: true,
        };
    }

    fn browse_key<S, C>(&mut self, code: KeyCode, session: &Session<S, C>) -> Action
    where
        S: TaskStore,
        C: Clock + Send + Sync,
    {
        let selected = session.selected_task();
        match code {
            KeyCode::Up | KeyCode::Char('k') => Action::Dispatch(Intent::Navigate(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => {
                Action::Dispatch(Intent::Navigate(Direction::Down))
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Name {
                    buffer: String::new(),
                };
                Action::None
            }
            KeyCode::Char('s') => {
                if let Some(task) = selected {
                    self.mode = Mode::StatusPicker {
                        task_id: task.id(),
                        cursor: task.status().position(),
                    };
                }
                Action::None
            }
            KeyCode::Enter => selected.map_or(Action::None, |task| Action::CycleStatus(task.id())),
            KeyCode::Char('d') => selected.map_or(Action::None, |task| {
                Action::Dispatch(Intent::DeleteTask(task.id()))
            }),
            KeyCode::Char('f') => {
                let filter = session.filter().clone();
                let next = next_status_filter(filter.status);
                Action::Dispatch(Intent::SetFilter(filter.with_status(next)))
            }
            KeyCode::Char('c') => Action::PickCategory,
            KeyCode::Char('x') => Action::Dispatch(Intent::SetFilter(FilterSpec::none())),
            KeyCode::Char('o') => Action::Dispatch(Intent::SetSort(SortKey::cycle(session.sort().key))),
            KeyCode::Char('r') => Action::Dispatch(Intent::ToggleSortReverse),
            KeyCode::Char('R') => Action::Reload,
            KeyCode::Char('q') => Action::Dispatch(Intent::Quit),
            _ => Action::None,
        }
    }

    fn name_key(&mut self, code: KeyCode, mut buffer: String) -> Action {
        match code {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                self.mode = Mode::Category {
                    name: buffer,
                    buffer: String::new(),
                };
            }
            other => {
                edit(&mut buffer, other);
                self.mode = Mode::Name { buffer };
            }
        }
        Action::None
    }

    fn category_key(&mut self, code: KeyCode, name: String, mut buffer: String) -> Action {
        match code {
            KeyCode::Esc => Action::None,
            KeyCode::Enter => Action::Dispatch(Intent::AddTask {
                name,
                category: buffer,
            }),
            other => {
                edit(&mut buffer, other);
                self.mode = Mode::Category { name, buffer };
                Action::None
            }
        }
    }

    fn status_key(&mut self, code: KeyCode, task_id: TaskId, cursor: usize) -> Action {
        let len = Status::ALL.len();
        match code {
            KeyCode::Esc => Action::None,
            KeyCode::Enter => Status::ALL.get(cursor).map_or(Action::None, |status| {
                Action::Dispatch(Intent::SetStatus {
                    task_id,
                    status: *status,
                })
            }),
            KeyCode::Up | KeyCode::Char('k') => {
                self.mode = Mode::StatusPicker {
                    task_id,
                    cursor: step_up(cursor, len),
                };
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.mode = Mode::StatusPicker {
                    task_id,
                    cursor: step_down(cursor, len),
                };
                Action::None
            }
            _ => {
                self.mode = Mode::StatusPicker { task_id, cursor };
                Action::None
            }
        }
    }

    fn category_picker_key(
        &mut self,
        code: KeyCode,
        filter: &FilterSpec,
        options: Vec<String>,
        cursor: usize,
        include: bool,
    ) -> Action {
        let len = options.len();
        let (next_cursor, next_include) = match code {
            KeyCode::Esc => return Action::None,
            KeyCode::Enter => {
                return options.get(cursor).map_or(Action::None, |value| {
                    let category = CategoryFilter {
                        value: value.clone(),
                        include,
                    };
                    Action::Dispatch(Intent::SetFilter(
                        filter.clone().with_category(Some(category)),
                    ))
                });
            }
            KeyCode::Up | KeyCode::Char('k') => (step_up(cursor, len), include),
            KeyCode::Down | KeyCode::Char('j') => (step_down(cursor, len), include),
            KeyCode::Tab => (cursor, !include),
            _ => (cursor, include),
        };
        self.mode = Mode::CategoryPicker {
            options,
            cursor: next_cursor,
            include: next_include,
        };
        Action::None
    }
}

fn edit(buffer: &mut String, code: KeyCode) {
    match code {
        KeyCode::Char(ch) => buffer.push(ch),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
}

const fn step_up(cursor: usize, len: usize) -> usize {
    match cursor.checked_sub(1) {
        Some(previous) => previous,
        None => len.saturating_sub(1),
    }
}

const fn step_down(cursor: usize, len: usize) -> usize {
    if cursor.saturating_add(1) >= len {
        0
    } else {
        cursor.saturating_add(1)
    }
}

fn next_status_filter(current: Option<Status>) -> Option<Status> {
    match current {
        None => Status::ALL.first().copied(),
        Some(status) => Status::ALL.get(status.position().saturating_add(1)).copied(),
    }
}

fn describe(err: &SessionError) -> String {
    match err {
        SessionError::NotFound(_) => "That task no longer exists".to_owned(),
        other => other.to_string(),
    }
}
