use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{FindField, Model, ToastLevel};

use super::style::Theme;

pub fn render_menu_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = Theme::current();
    let open = model.menu.as_ref().map(|cursor| cursor.top);
    let mut spans = vec![Span::styled(" ", theme.menu_bar)];
    for (idx, menu) in model.menu_bar.menus().iter().enumerate() {
        let style = if open == Some(idx) {
            theme.menu_title_active
        } else {
            theme.menu_bar
        };
        spans.push(Span::styled(format!(" {} ", menu.label), style));
    }
    let bar = Paragraph::new(Line::from(spans)).style(theme.menu_bar);
    frame.render_widget(bar, area);
}

pub fn render_find_panel(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(panel) = model.find_panel.as_ref() else {
        return;
    };
    let theme = Theme::current();
    let state = model.session.find_state();
    let field_style = |field: FindField| {
        if panel.field == field {
            theme.find_field
        } else {
            theme.find_panel
        }
    };
    let check = |on: bool| if on { "[x]" } else { "[ ]" };

    let find_line = Line::from(vec![
        Span::styled(" Find:    ", theme.find_panel),
        Span::styled(format!(" {} ", state.spec.query), field_style(FindField::Query)),
        Span::styled(
            format!(
                "  {} Match case (Alt-c)  {} Whole word (Alt-w)",
                check(state.spec.case_sensitive),
                check(state.spec.whole_word)
            ),
            theme.find_panel,
        ),
    ]);
    let replace_line = Line::from(vec![
        Span::styled(" Replace: ", theme.find_panel),
        Span::styled(
            format!(" {} ", state.replacement),
            field_style(FindField::Replacement),
        ),
        Span::styled(
            "  Enter: find  F3: next  Ctrl-r: replace  Ctrl-a: all  Esc: close",
            theme.find_panel,
        ),
    ]);
    let widget = Paragraph::new(vec![find_line, replace_line]).style(theme.find_panel);
    frame.render_widget(widget, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = Theme::current();
    let buffer = model.session.buffer();
    let (line, col) = buffer.cursor_line_col();
    let dirty_indicator = if model.session.is_dirty() {
        " [modified]"
    } else {
        ""
    };
    let selection = buffer.selection();
    let selection_info = if selection.is_empty() {
        String::new()
    } else {
        format!("  ({} selected)", selection.len())
    };
    let status = format!(
        " {}{dirty_indicator}  Ln {}, Col {}{selection_info}  F10:menu  F1:help",
        model.display_name(),
        line + 1,
        col + 1
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(theme.status_bg).fg(theme.status_fg));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
