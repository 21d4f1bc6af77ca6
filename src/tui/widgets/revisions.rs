use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::truncate;
use crate::analytics::{self, Due};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(area);

    draw_due(f, app, chunks[0]);
    draw_upcoming(f, app, chunks[1]);
}

fn draw_due(f: &mut Frame, app: &App, area: Rect) {
    let state = app.store().state();

    let items: Vec<ListItem> = app
        .revisions
        .items
        .iter()
        .filter_map(|id| state.revision(id))
        .map(|task| {
            let (due, color) = if task.scheduled_date < app.today {
                (Due::Overdue, Color::Red)
            } else {
                (Due::DueToday, Color::Yellow)
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", task.id.chars().take(8).collect::<String>()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<16}", truncate(&task.subject, 14)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<30}", truncate(&task.topic, 28)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<8}", task.scheduled_date.format("%b %d").to_string()),
                    Style::default().fg(Color::White),
                ),
                Span::styled(due.label(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Due Revisions ({}) ", app.revisions.items.len()))
        .title_style(Style::default().fg(Color::Yellow));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.revisions.selected);

    f.render_stateful_widget(list, area, &mut state);
}

fn draw_upcoming(f: &mut Frame, app: &App, area: Rect) {
    let upcoming = analytics::upcoming_revisions(app.store().state(), app.today);

    let mut lines: Vec<Line> = upcoming
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|task| {
            Line::from(vec![
                Span::styled(
                    format!("{:<8}", task.scheduled_date.format("%b %d").to_string()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<16}", truncate(&task.subject, 14)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(truncate(&task.topic, 40)),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing scheduled. Log a lecture to plan revisions.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Upcoming ({}) ", upcoming.len()))
        .title_style(Style::default().fg(Color::Magenta));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
