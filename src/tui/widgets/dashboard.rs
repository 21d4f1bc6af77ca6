use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{accent_color, truncate};
use crate::analytics::{self, Due};
use crate::models::SessionLevel;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Profile + Due revisions row
            Constraint::Length(3), // Quote
            Constraint::Min(0),    // Today's sessions
        ])
        .split(area);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_profile(f, app, top_chunks[0]);
    draw_due_revisions(f, app, top_chunks[1]);
    draw_quote(f, app, chunks[1]);
    draw_today(f, app, chunks[2]);
}

fn draw_profile(f: &mut Frame, app: &App, area: Rect) {
    let store = app.store();
    let state = store.state();

    let countdown = match analytics::days_until_target(state, app.today) {
        Some(days) if days >= 0 => format!("{} days", days),
        Some(days) => format!("{} days past", -days),
        None => "not set".to_string(),
    };

    let row = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(color)),
        ])
    };

    let text = vec![
        Line::from(Span::styled(
            state.display_name(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        row("Goal: ", state.exam_goal.label().to_string(), Color::White),
        row("Ink: ", format!("{}", state.ink_points), accent_color(app)),
        row("Mode: ", state.daily_mode.label().to_string(), Color::Cyan),
        row(
            "Theme: ",
            format!("{} / {}", store.current_theme().name, store.current_font().name),
            Color::White,
        ),
        row("Target: ", countdown, Color::Magenta),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Profile ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_due_revisions(f: &mut Frame, app: &App, area: Rect) {
    let due = analytics::due_revisions(app.store().state(), app.today);

    let items: Vec<ListItem> = due
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let color = match d.due {
                Due::Overdue => Color::Red,
                Due::DueToday => Color::Yellow,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(truncate(&d.task.topic, 22), Style::default().fg(color)),
                Span::raw(" "),
                Span::styled(
                    truncate(&d.task.subject, 12),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Due Revisions ({}) ", due.len()))
        .title_style(Style::default().fg(Color::Yellow));

    f.render_widget(List::new(items).block(block), area);
}

fn draw_quote(f: &mut Frame, app: &App, area: Rect) {
    let quote = Paragraph::new(Span::styled(
        app.quote,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    ))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(quote, area);
}

fn draw_today(f: &mut Frame, app: &App, area: Rect) {
    let sessions = analytics::sessions_on(app.store().state(), app.today);

    let items: Vec<ListItem> = sessions
        .iter()
        .map(|session| {
            let (level_color, detail) = match session.level {
                SessionLevel::Lecture => (Color::Cyan, format!("{} min", session.minutes())),
                SessionLevel::Practice => (
                    Color::Green,
                    format!("{}/{} correct", session.correct(), session.attempted()),
                ),
                SessionLevel::Manual => (
                    Color::Magenta,
                    format!(
                        "{} min, {}/{}",
                        session.minutes(),
                        session.correct(),
                        session.attempted()
                    ),
                ),
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<6}", session.date.format("%H:%M").to_string()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<10}", session.level.label()),
                    Style::default().fg(level_color),
                ),
                Span::styled(
                    format!("{:<16}", truncate(&session.subject, 14)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<26}", truncate(&session.topic, 24)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(detail, Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Today ({}) ", app.today.format("%b %d")))
        .title_style(Style::default().fg(Color::Magenta));

    f.render_widget(List::new(items).block(block), area);
}
