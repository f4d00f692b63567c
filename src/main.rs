//! Terminal task tracker.
//!
//! Usage:
//!
//! ```text
//! taskdeck [--database PATH] [--config PATH] [--verbose]
//! ```
//!
//! Logs go to the configured log file because the terminal belongs to the UI.
//! Set `TASKDECK_LOG` to override the log filter.

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mockable::DefaultClock;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::{self, File};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use taskdeck::{
    config::Settings,
    task::{adapters::sqlite::SqliteTaskStore, services::Session},
    tui::{self, App},
};

const LOG_ENV: &str = "TASKDECK_LOG";

#[derive(Debug, Parser)]
#[command(name = "taskdeck", version, about = "Track tasks from the terminal")]
struct Cli {
    /// `SQLite` database file, overriding every config source.
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Extra config file merged above the project config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level when `TASKDECK_LOG` is unset.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref(), cli.database.as_deref())
        .context("failed to load configuration")?;
    init_tracing(&settings.log_path, cli.verbose)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let store = SqliteTaskStore::open(&settings.database_path)
        .inspect_err(|err| tracing::error!(error = %err, "cannot open task database"))
        .with_context(|| {
            format!(
                "failed to open task database at {}",
                settings.database_path.display()
            )
        })?;
    let (mut session, report) = runtime
        .block_on(Session::open(
            Arc::new(store),
            Arc::new(DefaultClock),
            settings.session_settings(),
        ))
        .inspect_err(|err| tracing::error!(error = %err, "cannot load tasks"))
        .context("failed to load tasks")?;

    let mut app = App::new();
    if report.skipped > 0 {
        app.notify(format!("Skipped {} malformed task rows", report.skipped));
    }

    let mut terminal = setup_terminal().context("failed to prepare terminal")?;
    let outcome = tui::run(&mut terminal, &runtime, &mut session, &mut app);
    restore_terminal(&mut terminal).context("failed to restore terminal")?;
    outcome.context("task tracker stopped")
}

fn init_tracing(log_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if let Some(parent) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _raw = disable_raw_mode();
        let _screen = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
