pub mod dashboard;
pub mod report;
pub mod revisions;
pub mod shop;

use ratatui::style::Color;

use crate::tui::App;

/// Parses `#RRGGBB` into a terminal colour.
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

// Accent of the equipped theme, so the UI follows what the user bought
pub fn accent_color(app: &App) -> Color {
    hex_color(app.store().current_theme().palette.accent).unwrap_or(Color::Yellow)
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parses_palette_entries() {
        assert_eq!(hex_color("#EAB308"), Some(Color::Rgb(0xEA, 0xB3, 0x08)));
        assert_eq!(hex_color("#0f172a"), Some(Color::Rgb(0x0f, 0x17, 0x2a)));
    }

    #[test]
    fn hex_color_rejects_malformed() {
        assert_eq!(hex_color("EAB308"), None);
        assert_eq!(hex_color("#EAB3"), None);
        assert_eq!(hex_color("#GGGGGG"), None);
    }

    #[test]
    fn every_theme_accent_parses() {
        for theme in crate::catalog::THEMES {
            assert!(hex_color(theme.palette.accent).is_some(), "{}", theme.id);
        }
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Optics", 10), "Optics");
        assert_eq!(truncate("Thermodynamics", 8), "Therm...");
    }
}
