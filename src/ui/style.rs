//! Theming and color definitions.
//!
//! Token colors are taken from the same inline CSS the HTML overlay uses,
//! converted for the terminal. Chrome colors switch on the detected
//! terminal background.

use ratatui::style::{Color, Modifier, Style};

use crate::highlight::TokenKind;

/// Style for a highlighted segment; `None` is plain text.
pub fn token_style(kind: Option<TokenKind>) -> Style {
    let light_bg = crate::highlight::is_light_background();
    match kind {
        None => Style::default(),
        Some(TokenKind::String) => {
            let fg = css_color(TokenKind::String.css()).map_or(Color::Red, fg_color_for_terminal);
            Style::default().fg(fg).add_modifier(Modifier::BOLD)
        }
        Some(TokenKind::Comment) => Style::default()
            .fg(if light_bg { Color::Blue } else { Color::LightBlue })
            .add_modifier(Modifier::ITALIC),
        // Keywords are white with a red glow in the overlay; a light
        // terminal gets the glow color instead.
        Some(TokenKind::Keyword) => Style::default()
            .fg(if light_bg {
                Color::Indexed(160)
            } else {
                Color::White
            })
            .add_modifier(Modifier::BOLD),
    }
}

/// The `#rrggbb` value of the `color:` declaration in an inline style.
fn css_color(css: &str) -> Option<(u8, u8, u8)> {
    let value = css
        .split(';')
        .find_map(|decl| decl.trim().strip_prefix("color:"))?;
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn fg_color_for_terminal((r, g, b): (u8, u8, u8)) -> Color {
    if supports_truecolor() {
        Color::Rgb(r, g, b)
    } else {
        Color::Indexed(rgb_to_xterm_256(r, g, b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("HTMLPAD_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    if let Some(t) = term {
        let lower = t.to_ascii_lowercase();
        if lower.contains("direct") || lower.contains("truecolor") {
            return true;
        }
    }
    false
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    let ri = to_cube(r);
    let gi = to_cube(g);
    let bi = to_cube(b);
    16 + (36 * ri) + (6 * gi) + bi
}

/// Colors for everything around the buffer text.
#[derive(Debug, Clone)]
pub struct Theme {
    pub menu_bar: Style,
    /// Title of the open menu
    pub menu_title_active: Style,
    pub menu_item: Style,
    pub menu_selected: Style,
    pub menu_separator: Style,
    pub gutter: Style,
    pub gutter_current: Style,
    pub selection: Style,
    pub caret: Style,
    pub find_panel: Style,
    /// Focused find panel field
    pub find_field: Style,
    pub status_bg: Color,
    pub status_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            menu_bar: Style::default().bg(Color::Indexed(236)).fg(Color::Indexed(252)),
            menu_title_active: Style::default().bg(Color::Blue).fg(Color::White),
            menu_item: Style::default().bg(Color::Indexed(236)).fg(Color::Indexed(252)),
            menu_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            menu_separator: Style::default().bg(Color::Indexed(236)).fg(Color::Indexed(240)),
            gutter: Style::default().fg(Color::DarkGray),
            gutter_current: Style::default().fg(Color::Yellow),
            selection: Style::default().bg(Color::Indexed(24)),
            caret: Style::default().bg(Color::White).fg(Color::Black),
            find_panel: Style::default().bg(Color::Indexed(235)).fg(Color::Indexed(252)),
            find_field: Style::default()
                .bg(Color::Indexed(238))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            status_bg: Color::Indexed(236), // Dark gray that works on both
            status_fg: Color::Indexed(252), // Light gray
        }
    }
}

impl Theme {
    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self::default()
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            menu_bar: Style::default().bg(Color::Indexed(252)).fg(Color::Indexed(235)),
            menu_title_active: Style::default().bg(Color::Indexed(25)).fg(Color::White),
            menu_item: Style::default().bg(Color::Indexed(254)).fg(Color::Indexed(235)),
            menu_selected: Style::default()
                .bg(Color::Indexed(25))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            menu_separator: Style::default().bg(Color::Indexed(254)).fg(Color::Indexed(245)),
            gutter: Style::default().fg(Color::Indexed(245)),
            gutter_current: Style::default().fg(Color::Indexed(136)),
            selection: Style::default().bg(Color::Indexed(153)),
            caret: Style::default().bg(Color::Black).fg(Color::White),
            find_panel: Style::default().bg(Color::Indexed(253)).fg(Color::Indexed(235)),
            find_field: Style::default()
                .bg(Color::Indexed(250))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
        }
    }

    /// Theme for the detected terminal background.
    pub fn current() -> Self {
        if crate::highlight::is_light_background() {
            Self::light()
        } else {
            Self::dark()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_default_style() {
        assert_eq!(token_style(None), Style::default());
    }

    #[test]
    fn test_token_styles_are_bold_or_italic() {
        assert!(
            token_style(Some(TokenKind::String))
                .add_modifier
                .contains(Modifier::BOLD)
        );
        assert!(
            token_style(Some(TokenKind::Comment))
                .add_modifier
                .contains(Modifier::ITALIC)
        );
        assert!(
            token_style(Some(TokenKind::Keyword))
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }

    #[test]
    fn test_css_color_reads_hex_declaration() {
        assert_eq!(css_color(TokenKind::String.css()), Some((0xd7, 0x3a, 0x49)));
        assert_eq!(css_color("color:blue;font-weight:500"), None);
        assert_eq!(css_color("font-weight:700;color: #00ff00;"), Some((0, 255, 0)));
    }

    #[test]
    fn test_truecolor_detection_without_colorterm() {
        assert!(!supports_truecolor_from_env(None, Some("xterm-256color")));
    }

    #[test]
    fn test_truecolor_detection_with_colorterm() {
        assert!(supports_truecolor_from_env(Some("truecolor"), None));
        assert!(supports_truecolor_from_env(Some("24bit"), None));
        assert!(supports_truecolor_from_env(None, Some("xterm-direct")));
    }

    #[test]
    fn test_rgb_to_xterm_256_maps_cube_corners() {
        assert_eq!(rgb_to_xterm_256(0, 0, 0), 16);
        assert_eq!(rgb_to_xterm_256(255, 255, 255), 231);
        assert_eq!(rgb_to_xterm_256(255, 0, 0), 196);
    }

    #[test]
    fn test_light_and_dark_themes_differ() {
        assert_ne!(Theme::light().selection, Theme::dark().selection);
        assert_ne!(Theme::light().status_bg, Theme::dark().status_bg);
    }
}
