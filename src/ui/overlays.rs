use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{Model, Notice, Prompt};
use crate::menu::{MenuBar, MenuCursor, MenuNode};

use super::style::Theme;

const ABOUT_TEXT: [&str; 3] = [
    "HTML Editor",
    "Version 1.0",
    "A simple HTML editor with live preview.",
];

/// Screen column and width of each top-level menu title.
pub fn menu_title_positions(bar: &MenuBar) -> Vec<(u16, u16)> {
    let mut x = 1_u16;
    bar.menus()
        .iter()
        .map(|menu| {
            let width = u16::try_from(menu.label.chars().count() + 2).unwrap_or(u16::MAX);
            let pos = (x, width);
            x = x.saturating_add(width);
            pos
        })
        .collect()
}

/// One rectangle per open list: the dropdown, then each opened submenu.
pub fn dropdown_rects(bar: &MenuBar, cursor: &MenuCursor, area: Rect) -> Vec<Rect> {
    let titles = menu_title_positions(bar);
    let Some(&(title_x, _)) = titles.get(cursor.top) else {
        return Vec::new();
    };
    let mut rects: Vec<Rect> = Vec::new();
    for depth in 0..=cursor.depth() {
        let Some(items) = bar.level(cursor, depth) else {
            break;
        };
        let (x, y) = match rects.last() {
            None => (title_x.saturating_sub(1), area.y + 1),
            Some(parent) => {
                let row = u16::try_from(cursor.path[depth - 1]).unwrap_or(0);
                (parent.x + parent.width, parent.y + 1 + row)
            }
        };
        let width = list_width(items).min(area.width);
        let height = u16::try_from(items.len() + 2)
            .unwrap_or(u16::MAX)
            .min(area.height.saturating_sub(1));
        let x = x.min(area.right().saturating_sub(width));
        let y = y.min(area.bottom().saturating_sub(height));
        rects.push(Rect::new(x, y, width, height));
    }
    rects
}

fn list_width(items: &[MenuNode]) -> u16 {
    let widest = items
        .iter()
        .filter_map(MenuNode::label)
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    // border + padding + submenu marker on each side
    u16::try_from(widest + 6).unwrap_or(u16::MAX)
}

pub fn render_menu_dropdowns(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(cursor) = model.menu.as_ref() else {
        return;
    };
    let theme = Theme::current();
    let rects = dropdown_rects(&model.menu_bar, cursor, area);
    for (depth, rect) in rects.into_iter().enumerate() {
        let Some(items) = model.menu_bar.level(cursor, depth) else {
            break;
        };
        let inner_width = usize::from(rect.width.saturating_sub(2));
        let lines: Vec<Line> = items
            .iter()
            .enumerate()
            .map(|(idx, node)| match node {
                MenuNode::Separator => {
                    Line::styled("\u{2500}".repeat(inner_width), theme.menu_separator)
                }
                MenuNode::Leaf { label, .. } | MenuNode::Submenu { label, .. } => {
                    let marker = if matches!(node, MenuNode::Submenu { .. }) {
                        "\u{25b8}"
                    } else {
                        " "
                    };
                    let text = format!(
                        " {label:<width$}{marker} ",
                        width = inner_width.saturating_sub(3)
                    );
                    let style = if cursor.path.get(depth) == Some(&idx) {
                        theme.menu_selected
                    } else {
                        theme.menu_item
                    };
                    Line::styled(text, style)
                }
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .style(theme.menu_item);
        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

pub fn render_notice(notice: Notice, frame: &mut Frame, area: Rect) {
    let (title, lines) = match notice {
        Notice::About => (
            "About",
            ABOUT_TEXT.iter().map(|line| Line::raw(*line)).collect(),
        ),
        Notice::Help => ("Documentation", help_lines()),
    };
    #[allow(clippy::cast_possible_truncation)]
    let needed_rows = lines.len() as u16 + 5;
    let popup_height = needed_rows.min(area.height.saturating_sub(2).max(6));
    let popup_width = area.width.saturating_sub(12).clamp(20, 64);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let mut lines = lines;
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "any key closes",
        Style::default().fg(Color::Indexed(245)),
    ));

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn help_lines() -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    vec![
        Line::styled("Menus", section_style),
        Line::raw("  F10 / Alt+letter    Open menu"),
        Line::raw("  Arrows, Enter, Esc  Navigate, activate, close"),
        Line::styled("Editing", section_style),
        Line::raw("  Ctrl-z / Ctrl-y     Undo / redo"),
        Line::raw("  Ctrl-x/c/v          Cut, copy, paste"),
        Line::raw("  Ctrl-a              Select all"),
        Line::raw("  Shift+arrows        Extend selection"),
        Line::styled("Find", section_style),
        Line::raw("  Ctrl-f              Find/replace panel"),
        Line::raw("  Enter / F3          Find / find next"),
        Line::raw("  Ctrl-r / Ctrl-a     Replace / replace all"),
        Line::raw("  Alt-c / Alt-w       Match case / whole word"),
        Line::styled("File", section_style),
        Line::raw("  Ctrl-n / Ctrl-o     New / open"),
        Line::raw("  Ctrl-s / Ctrl-q     Save / exit"),
    ]
}

pub fn render_prompt(prompt: &Prompt, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(8).clamp(24, 72);
    let popup = centered_popup_rect(popup_width, 5, area);
    let lines = vec![
        Line::from(vec![
            Span::raw(prompt.input.clone()),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ]),
        Line::styled(
            "Enter confirms \u{2502} Esc cancels",
            Style::default().fg(Color::Indexed(245)),
        ),
    ];
    let block = Block::default()
        .title(prompt.kind.title())
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
