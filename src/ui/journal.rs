//! Journal screen rendering
//!
//! Renders the entry form, the entry list (newest first), and the footer
//! with key hints, install availability, and offline mirror status.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::journal::html::format_date;
use crate::journal::Entry;

/// Renders the journal screen
pub fn render_journal(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // form
            Constraint::Min(3),     // list
            Constraint::Length(1),  // footer
        ])
        .split(frame.area());

    render_form(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

/// Style for a field label depending on focus
fn field_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Renders the three-input entry form
fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let cursor = |focused: bool| if focused { "▏" } else { "" };

    let lines = vec![
        Line::from(vec![
            Span::styled("Title       ", field_style(app.focus == Focus::Title)),
            Span::raw(app.form.title.clone()),
            Span::styled(cursor(app.focus == Focus::Title), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Date        ", field_style(app.focus == Focus::Date)),
            Span::raw(app.form.date.clone()),
            Span::styled(cursor(app.focus == Focus::Date), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Description ", field_style(app.focus == Focus::Description)),
            Span::raw(app.form.description.clone()),
            Span::styled(
                cursor(app.focus == Focus::Description),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];

    let block = Block::default()
        .title(" New entry (Enter adds, Tab moves) ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the entry list or the empty-state placeholder
fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let entries = app.visible_entries();

    let block = Block::default()
        .title(format!(" Logbook ({}) ", entries.len()))
        .borders(Borders::ALL);

    if entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No entries yet. Add your first log above.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let selected = app.focus == Focus::List && i == app.selected_index;
        lines.push(entry_title_line(entry, selected, app.has_copy_feedback(&entry.id)));
        lines.push(Line::from(Span::styled(
            format!("    {}", entry.description),
            Style::default().fg(Color::Gray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Builds the title row of one entry
fn entry_title_line(entry: &Entry, selected: bool, copied: bool) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let title_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(marker.to_string()),
        Span::styled(entry.title.clone(), title_style),
        Span::styled(
            format!("  {}", format_date(entry.date)),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if copied {
        spans.push(Span::styled(
            "  Copied",
            Style::default().fg(Color::Green),
        ));
    }
    Line::from(spans)
}

/// Renders the footer line: key hints plus mirror/install status
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "c copy  d delete  x clear all  ? help  q quit",
        Style::default().fg(Color::DarkGray),
    )];

    if app.install_prompt.is_available() {
        spans.push(Span::styled(
            "  i install app",
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = &app.mirror_status;
    if let Some(err) = &status.last_error {
        spans.push(Span::styled(
            format!("  mirror: {err}"),
            Style::default().fg(Color::Red),
        ));
    } else if status.refreshing {
        spans.push(Span::styled(
            "  mirror: refreshing",
            Style::default().fg(Color::Yellow),
        ));
    } else if status.offline_ready() {
        spans.push(Span::styled(
            "  offline copy ready",
            Style::default().fg(Color::Green),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::journal::JournalStore;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_journal(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with_entries(entries: &[(&str, &str, &str)]) -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JournalStore::with_path(temp_dir.path().join("entries.json"));
        for (title, description, date) in entries {
            store.add(title, description, date);
        }
        let app = App::new(store, Box::new(RecordingClipboard::default()), None);
        (app, temp_dir)
    }

    #[test]
    fn test_empty_collection_shows_placeholder() {
        let (app, _temp_dir) = app_with_entries(&[]);
        let content = render_to_string(&app);
        assert!(content.contains("No entries yet"));
    }

    #[test]
    fn test_entries_render_newest_first() {
        let (app, _temp_dir) = app_with_entries(&[
            ("Dive log", "sharks", "2024-05-01"),
            ("Surface", "calm", "2024-05-03"),
        ]);

        let content = render_to_string(&app);
        let surface = content.find("Surface").unwrap();
        let dive = content.find("Dive log").unwrap();
        assert!(surface < dive);
    }

    #[test]
    fn test_footer_shows_offline_ready() {
        let (mut app, _temp_dir) = app_with_entries(&[]);
        app.mirror_status.installed = true;
        app.mirror_status.activated = true;

        let content = render_to_string(&app);
        assert!(content.contains("offline copy ready"));
    }
}
