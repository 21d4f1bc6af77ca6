use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::{accent_color, truncate};
use crate::models::UserState;
use crate::tui::{App, ShopItem};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let state = app.store().state();

    let items: Vec<ListItem> = app
        .shop
        .items
        .iter()
        .map(|item| {
            let (status, status_color) = status(state, item);
            let price_color = if i64::from(item.price()) > state.ink_points {
                Color::Red
            } else {
                Color::Yellow
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<9}", item.kind()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<26}", truncate(item.name(), 24)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:>5} ink  ", item.price()),
                    Style::default().fg(price_color),
                ),
                Span::styled(status, Style::default().fg(status_color)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Stationery Shop ({} ink) ", state.ink_points))
        .title_style(Style::default().fg(accent_color(app)));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(app.shop.selected);

    f.render_stateful_widget(list, area, &mut list_state);
}

fn status(state: &UserState, item: &ShopItem) -> (String, Color) {
    let (owned, equipped) = match item {
        ShopItem::Theme(t) => (state.owns_theme(t.id), state.current_theme_id == t.id),
        ShopItem::Font(font) => (state.owns_font(font.id), state.current_font_id == font.id),
        ShopItem::Sticker(s) => (state.owns_sticker(s.id), false),
    };

    if equipped {
        return ("Equipped".to_string(), Color::Green);
    }
    match item {
        ShopItem::Sticker(s) if owned => {
            let placed = state
                .placed_stickers
                .iter()
                .filter(|p| p.sticker_id == s.id)
                .count();
            (format!("Owned, {} placed", placed), Color::Gray)
        }
        _ if owned => ("Owned".to_string(), Color::Gray),
        _ => (String::new(), Color::Gray),
    }
}
