//! Drawing the session and front-end state into a frame.

use super::app::{App, Mode};
use crate::task::{
    domain::{Status, Task},
    ports::TaskStore,
    services::{FilterSpec, HeaderSummary, Session, SortSpec},
};
use mockable::Clock;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

const KEY_HINTS: &str = " ↑↓ Navigate  Enter Cycle  a Add  s Status  d Delete  f/c/x Filter  o/r Sort  R Reload  q Quit";

/// Draws the whole screen.
pub fn render<S, C>(frame: &mut Frame, app: &App, session: &Session<S, C>)
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    frame.render_widget(header_line(&session.header()), header);
    render_tasks(frame, body, session);
    frame.render_widget(footer_lines(app), footer);

    match app.mode() {
        Mode::StatusPicker { cursor, .. } => render_status_picker(frame, *cursor),
        Mode::CategoryPicker {
            options,
            cursor,
            include,
        } => render_category_picker(frame, options, *cursor, *include),
        Mode::Browse | Mode::Name { .. } | Mode::Category { .. } => {}
    }
}

/// Foreground colour used for tasks with `status`.
#[must_use]
pub const fn status_color(status: Status) -> Color {
    match status {
        Status::Active => Color::Green,
        Status::InProgress => Color::Yellow,
        Status::Hold => Color::Cyan,
        Status::Cancelled => Color::Red,
        Status::Completed => Color::DarkGray,
    }
}

fn header_line(summary: &HeaderSummary) -> Paragraph<'static> {
    let mut spans = vec![
        Span::styled(" Tasks ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("Total: {} ", summary.total())),
    ];
    spans.extend(summary.iter().map(|(status, count)| {
        Span::styled(
            format!("{}: {count} ", status.label()),
            Style::default().fg(status_color(status)),
        )
    }));
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
}

fn render_tasks<S, C>(frame: &mut Frame, area: Rect, session: &Session<S, C>)
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    let visible = session.visible();
    let block = Block::default().title(view_title(
        visible.len(),
        session.tasks().len(),
        session.filter(),
        session.sort(),
    ));

    if visible.is_empty() {
        frame.render_widget(Paragraph::new("No tasks").block(block), area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(index, task)| task_item(index, task))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(session.selection());
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_item(index: usize, task: &Task) -> ListItem<'static> {
    let mut spans = vec![Span::styled(
        format!("{}. {task}", index.saturating_add(1)),
        Style::default().fg(status_color(task.status())),
    )];
    if !task.category().is_empty() {
        spans.push(Span::styled(
            format!("  #{}", task.category()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn view_title(visible: usize, total: usize, filter: &FilterSpec, sort: SortSpec) -> String {
    let mut title = format!("Tasks ({visible}/{total})");
    if let Some(status) = filter.status {
        title.push_str(&format!(" | status: {}", status.label()));
    }
    if let Some(category) = &filter.category {
        let verb = if category.include { "in" } else { "not in" };
        title.push_str(&format!(" | category {verb} \"{}\"", category.value));
    }
    if let Some(key) = sort.key {
        let arrow = if sort.reverse { "desc" } else { "asc" };
        title.push_str(&format!(" | sort: {key} {arrow}"));
    }
    title
}

fn footer_lines(app: &App) -> Paragraph<'static> {
    let second = match app.mode() {
        Mode::Name { buffer } => Line::from(format!(" New task: {buffer}_")),
        Mode::Category { buffer, .. } => Line::from(format!(" Category: {buffer}_")),
        Mode::Browse | Mode::StatusPicker { .. } | Mode::CategoryPicker { .. } => Line::from(
            app.notice()
                .map(|notice| format!(" {notice}"))
                .unwrap_or_default(),
        )
        .style(Style::default().fg(Color::Yellow)),
    };
    Paragraph::new(vec![
        Line::from(KEY_HINTS).style(Style::default().fg(Color::DarkGray)),
        second,
    ])
}

fn render_status_picker(frame: &mut Frame, cursor: usize) {
    let items: Vec<ListItem> = Status::ALL
        .iter()
        .map(|status| {
            ListItem::new(status.label()).style(Style::default().fg(status_color(*status)))
        })
        .collect();
    render_picker(frame, "Change Status", items, cursor);
}

fn render_category_picker(frame: &mut Frame, options: &[String], cursor: usize, include: bool) {
    let items: Vec<ListItem> = options
        .iter()
        .map(|option| ListItem::new(option.clone()))
        .collect();
    let title = if include {
        "Show category (Tab: exclude)"
    } else {
        "Hide category (Tab: include)"
    };
    render_picker(frame, title, items, cursor);
}

fn render_picker(frame: &mut Frame, title: &str, items: Vec<ListItem>, cursor: usize) {
    let height = u16::try_from(items.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    let area = centered(frame.area(), 36, height);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_owned()))
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(cursor));
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(middle);
    center
}
