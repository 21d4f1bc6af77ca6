use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{accent_color, truncate};
use crate::analytics::{self, DayTotals, HeatTier, Report};
use crate::tui::App;

const BAR_WIDTH: u64 = 30;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let report = analytics::report(app.store().state(), app.today);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Efficiency + heat strip
            Constraint::Min(0),    // Growth + trend
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    draw_efficiency(f, &report, top[0]);
    draw_heat(f, app, &report, top[1]);
    draw_growth(f, &report, bottom[0]);
    draw_trend(f, app, &report.trend, bottom[1]);
}

fn draw_efficiency(f: &mut Frame, report: &Report, area: Rect) {
    let text = vec![Line::from(vec![
        Span::styled("Accuracy ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}%", report.accuracy),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Speed ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} q/hr", report.speed),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Efficiency ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_heat(f: &mut Frame, app: &App, report: &Report, area: Rect) {
    let accent = accent_color(app);
    let strip: Vec<Span> = report
        .heat
        .iter()
        .map(|d| {
            let color = if d.tier == HeatTier::Idle {
                Color::DarkGray
            } else {
                accent
            };
            Span::styled(d.tier.glyph().to_string(), Style::default().fg(color))
        })
        .collect();

    let total: i64 = report.heat.iter().map(|d| d.ink).sum();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Heat, 28 days ({} ink) ", total))
        .title_style(Style::default().fg(Color::Yellow));

    f.render_widget(Paragraph::new(Line::from(strip)).block(block), area);
}

fn draw_growth(f: &mut Frame, report: &Report, area: Rect) {
    let mut lines = vec![Line::from(vec![Span::styled(
        format!("{:<16}{:>6}{:>6}{:>7}", "Subject", "Now", "Prev", "Δ%"),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )])];

    lines.extend(report.growth.iter().map(|g| {
        let color = match g.percent {
            p if p > 0 => Color::Green,
            p if p < 0 => Color::Red,
            _ => Color::White,
        };
        Line::from(vec![
            Span::styled(
                format!("{:<16}", truncate(&g.subject, 14)),
                Style::default().fg(Color::White),
            ),
            Span::raw(format!("{:>6}{:>6}", g.current, g.previous)),
            Span::styled(format!("{:>6}%", g.percent), Style::default().fg(color)),
        ])
    }));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Weekly Growth (min) ")
        .title_style(Style::default().fg(Color::Green));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_trend(f: &mut Frame, app: &App, trend: &[DayTotals], area: Rect) {
    let peak = trend.iter().map(|d| d.minutes).max().unwrap_or(0);
    let accent = accent_color(app);

    let lines: Vec<Line> = trend
        .iter()
        .map(|d| {
            Line::from(vec![
                Span::styled(
                    format!("{:<7}", d.day.format("%a %d").to_string()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(bar(d.minutes, peak), Style::default().fg(accent)),
                Span::raw(format!(" {}m {}q", d.minutes, d.questions)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Last 7 Days ")
        .title_style(Style::default().fg(Color::Magenta));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

// Bar scaled against the busiest day in the window
fn bar(value: u64, peak: u64) -> String {
    if peak == 0 {
        return String::new();
    }
    let scaled = (u128::from(value) * u128::from(BAR_WIDTH)).div_ceil(u128::from(peak));
    let filled = scaled.min(u128::from(BAR_WIDTH)) as usize;
    "█".repeat(filled)
}
