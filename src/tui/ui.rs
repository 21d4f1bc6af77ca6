use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{accent_color, dashboard, report, revisions, shop};
use super::{App, View};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Message line
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_message(f, app, chunks[2]);
    draw_help_bar(f, app, chunks[3]);
}

const TABS: [(View, &str); 4] = [
    (View::Dashboard, "Dashboard"),
    (View::Revisions, "Revisions"),
    (View::Report, "Report"),
    (View::Shop, "Shop"),
];

// (keys, action) pairs shown in the help bar
type Hints = &'static [(&'static str, &'static str)];

const PROMPT_HINTS: Hints = &[("<CR>", "Save"), ("<Esc>", "Cancel")];

fn view_hints(view: View) -> Hints {
    match view {
        View::Dashboard => &[("a", "Log"), ("m", "Mode"), ("^r", "Refresh")],
        View::Revisions => &[("j/k", "Nav"), ("d/<CR>", "Done"), ("p", "Postpone (-10)")],
        View::Report => &[("^r", "Refresh")],
        View::Shop => &[
            ("j/k", "Nav"),
            ("g/G", "Top/Bot"),
            ("b/<CR>", "Buy"),
            ("e", "Equip"),
        ],
    }
}

fn hint_spans(hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    let key = Style::default().fg(Color::Cyan);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (i, (keys, action)) in hints.iter().enumerate() {
        let gap = if i + 1 == hints.len() { "" } else { "  " };
        spans.push(Span::styled(*keys, key));
        spans.push(Span::raw(format!(" {}{}", action, gap)));
    }
    spans
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let selected = TABS.iter().position(|(v, _)| *v == app.view).unwrap_or(0);
    let ink = format!(" PaperMock | {} ink ", app.store().state().ink_points);

    let tabs = Tabs::new(TABS.iter().map(|(_, title)| *title))
        .block(Block::default().borders(Borders::ALL).title(ink))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(accent_color(app))
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Dashboard => dashboard::draw(f, app, area),
        View::Revisions => revisions::draw(f, app, area),
        View::Report => report::draw(f, app, area),
        View::Shop => shop::draw(f, app, area),
    }
}

fn draw_message(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.message {
        Some(msg) => Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Yellow))),
        None => Line::default(),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let spans = if app.input_mode {
        let mut spans = vec![
            Span::styled("log> ", Style::default().fg(Color::Yellow)),
            Span::raw(app.input.as_str()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
        ];
        spans.extend(hint_spans(PROMPT_HINTS));
        spans
    } else {
        let mut hints = vec![("h/l", "Views")];
        hints.extend_from_slice(view_hints(app.view));
        hints.push(("q", "Quit"));
        hint_spans(&hints)
    };

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(help, area);
}
