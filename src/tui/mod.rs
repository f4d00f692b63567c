//! Terminal front end.
//!
//! Layout: a header with per-status counts, the visible task list with the
//! selected row highlighted, and a footer holding key hints, prompts, and
//! notices. All state changes go through the [`Session`].

mod app;
mod render;

pub use app::{Action, App, Mode};
pub use render::{render, status_color};

use crate::task::{
    ports::TaskStore,
    services::{Flow, Session, SessionError},
};
use crossterm::event::{self, Event};
use mockable::Clock;
use ratatui::{Terminal, backend::Backend};
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;

/// How long the event loop waits for input before redrawing.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors that end the event loop.
#[derive(Debug, Error)]
pub enum TuiError {
    /// Drawing or reading terminal input failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The session hit a fatal error.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Runs the event loop until the user quits.
///
/// Session calls are driven to completion on `runtime` before the next key
/// is read.
///
/// # Errors
///
/// Returns [`TuiError::Io`] when the terminal fails and
/// [`TuiError::Session`] on a fatal session error.
pub fn run<B, S, C>(
    terminal: &mut Terminal<B>,
    runtime: &Runtime,
    session: &mut Session<S, C>,
    app: &mut App,
) -> Result<(), TuiError>
where
    B: Backend,
    S: TaskStore,
    C: Clock + Send + Sync,
{
    loop {
        terminal.draw(|frame| render(frame, app, session))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            let action = app.on_key(key, session);
            if runtime.block_on(app.perform(session, action))? == Flow::Quit {
                tracing::debug!("quit requested");
                return Ok(());
            }
        }
    }
}
