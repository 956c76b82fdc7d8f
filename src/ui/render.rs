use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::Model;

use super::style::{Theme, token_style};
use super::{FIND_PANEL_ROWS, MENU_BAR_ROWS, overlays, status};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let find_open = model.find_panel.is_some();
    let editor_rows = super::editor_rows(area.height, find_open);

    let menu_area = Rect {
        height: MENU_BAR_ROWS.min(area.height),
        ..area
    };
    let editor_area = Rect {
        y: area.y + MENU_BAR_ROWS,
        height: editor_rows,
        ..area
    };
    let mut y = editor_area.bottom();
    let find_area = find_open.then(|| {
        let rect = Rect {
            y,
            height: FIND_PANEL_ROWS,
            ..area
        };
        y += FIND_PANEL_ROWS;
        rect
    });
    let toast_area = Rect {
        y,
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: y + 1,
        height: 1,
        ..area
    };

    status::render_menu_bar(model, frame, menu_area);
    render_editor(model, frame, editor_area);
    if let Some(find_area) = find_area {
        status::render_find_panel(model, frame, find_area.intersection(area));
    }
    status::render_toast_bar(model, frame, toast_area.intersection(area));
    status::render_status_bar(model, frame, status_area.intersection(area));

    overlays::render_menu_dropdowns(model, frame, area);
    if let Some(prompt) = model.prompt.as_ref() {
        overlays::render_prompt(prompt, frame, area);
    }
    if let Some(notice) = model.notice {
        overlays::render_notice(notice, frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = Theme::current();
    let buffer = model.session.buffer();
    let overlay = model.session.overlay();

    // Line number gutter width
    let total_lines = buffer.line_count();
    let gutter_width = line_number_width(total_lines);
    let text_width = usize::from(area.width.saturating_sub(gutter_width + 1));

    let start = overlay.scroll_top();
    let end = (start + area.height as usize).min(total_lines);
    let (caret_line, caret_col) = buffer.cursor_line_col();
    let selection = buffer.selection();

    let mut content: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    for line_idx in start..end {
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);
        let gutter_style = if line_idx == caret_line {
            theme.gutter_current
        } else {
            theme.gutter
        };
        let mut spans = vec![Span::styled(line_num, gutter_style)];

        let mut cells: Vec<(char, Style)> = overlay
            .lines()
            .get(line_idx)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .flat_map(|segment| {
                let style = token_style(segment.kind);
                segment.text.chars().map(move |ch| (display_char(ch), style))
            })
            .collect();

        let line_start = buffer.line_start(line_idx);
        if !selection.is_empty() {
            for (col, cell) in cells.iter_mut().enumerate() {
                if selection.range().contains(&(line_start + col)) {
                    cell.1 = cell.1.patch(theme.selection);
                }
            }
        }
        if line_idx == caret_line {
            if caret_col >= cells.len() {
                cells.resize(caret_col + 1, (' ', Style::default()));
            }
            cells[caret_col].1 = cells[caret_col].1.patch(theme.caret);
        }

        let visible = cells
            .into_iter()
            .skip(model.viewport.col_offset())
            .take(text_width);
        spans.extend(group_cells(visible));
        content.push(Line::from(spans));
    }

    let doc = Paragraph::new(content);
    frame.render_widget(Clear, area);
    frame.render_widget(doc, area);
}

/// Control characters occupy one cell as a space.
fn display_char(ch: char) -> char {
    if ch.is_control() { ' ' } else { ch }
}

/// Merge runs of equally styled cells into spans.
fn group_cells(cells: impl Iterator<Item = (char, Style)>) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    for (ch, style) in cells {
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    spans
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
