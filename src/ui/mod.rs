//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Token colors and chrome theming
//!
//! The screen is a fixed stack: menu bar, editor pane, optional find panel,
//! message line, status bar. Menus and popups draw over the editor.

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{dropdown_rects, menu_title_positions};
pub use render::{line_number_width, render};

pub const MENU_BAR_ROWS: u16 = 1;
/// Message line plus status bar.
pub const FOOTER_ROWS: u16 = 2;
pub const FIND_PANEL_ROWS: u16 = 2;

/// Rows left for buffer text on a terminal `height` rows tall.
pub const fn editor_rows(height: u16, find_panel_open: bool) -> u16 {
    let panel = if find_panel_open { FIND_PANEL_ROWS } else { 0 };
    height.saturating_sub(MENU_BAR_ROWS + FOOTER_ROWS + panel)
}

/// Columns left for buffer text once the line-number gutter is drawn.
pub const fn editor_text_width(width: u16, total_lines: usize) -> u16 {
    width.saturating_sub(line_number_width(total_lines) + 1)
}
