use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::command::Command;
use crate::editor::Direction;

const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) => Some(Message::InsertText(text.clone())),
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.notice.is_some() {
            return Some(Message::DismissNotice);
        }
        if model.prompt.is_some() {
            return prompt_key(key);
        }
        if model.menu.is_some() {
            return menu_key(key, model);
        }
        if model.find_panel.is_some()
            && let Some(msg) = find_panel_key(key)
        {
            return Some(msg);
        }
        editor_key(key, model)
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.notice.is_some() || model.prompt.is_some() {
            return None;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_LINES)),
            MouseEventKind::Down(MouseButton::Left) => {
                if mouse.row < crate::ui::MENU_BAR_ROWS {
                    return menu_title_at(model, mouse.column)
                        .map(Message::OpenMenu)
                        .or(Some(Message::CloseMenu));
                }
                if model.menu.is_some() {
                    return Some(Message::CloseMenu);
                }
                editor_position(model, mouse.column, mouse.row)
                    .map(|(line, col)| Message::ClickAt { line, col })
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn has_ctrl(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

fn has_alt(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT)
}

fn has_shift(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::SHIFT)
}

fn prompt_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::PromptCancel),
        KeyCode::Enter => Some(Message::PromptSubmit),
        KeyCode::Backspace => Some(Message::PromptBackspace),
        KeyCode::Char(c) if !has_ctrl(key) && !has_alt(key) => Some(Message::PromptInput(c)),
        _ => None,
    }
}

fn menu_key(key: KeyEvent, model: &Model) -> Option<Message> {
    match key.code {
        KeyCode::Esc | KeyCode::F(10) => Some(Message::CloseMenu),
        KeyCode::Up => Some(Message::MenuUp),
        KeyCode::Down => Some(Message::MenuDown),
        KeyCode::Left => Some(Message::MenuLeft),
        KeyCode::Right => Some(Message::MenuRight),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Message::MenuActivate),
        KeyCode::Char(c) if has_alt(key) => model.menu_bar.find_by_initial(c).map(Message::OpenMenu),
        _ => None,
    }
}

/// Keys owned by the find panel; anything else falls through to the editor.
fn find_panel_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::CloseFindPanel),
        KeyCode::Tab | KeyCode::BackTab => Some(Message::FindSwitchField),
        KeyCode::Enter => Some(Message::Command(Command::Find)),
        KeyCode::Backspace => Some(Message::FindBackspace),
        KeyCode::Char('r') if has_ctrl(key) => Some(Message::Command(Command::Replace)),
        KeyCode::Char('a') if has_ctrl(key) => Some(Message::Command(Command::ReplaceAll)),
        KeyCode::Char('c') if has_alt(key) => {
            Some(Message::Command(Command::ToggleCaseSensitive))
        }
        KeyCode::Char('w') if has_alt(key) => Some(Message::Command(Command::ToggleWholeWord)),
        KeyCode::Char(c) if !has_ctrl(key) && !has_alt(key) => Some(Message::FindInput(c)),
        _ => None,
    }
}

fn editor_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let extend = has_shift(key);
    if has_ctrl(key) {
        return match key.code {
            KeyCode::Char('z') => Some(Message::Command(Command::Undo)),
            KeyCode::Char('y') => Some(Message::Command(Command::Redo)),
            KeyCode::Char('x') => Some(Message::Command(Command::Cut)),
            KeyCode::Char('c') => Some(Message::Command(Command::Copy)),
            KeyCode::Char('v') => Some(Message::Command(Command::Paste)),
            KeyCode::Char('a') => Some(Message::SelectAll),
            KeyCode::Char('f') => Some(Message::Command(Command::FindReplace)),
            KeyCode::Char('s') => Some(Message::Command(Command::SaveFile)),
            KeyCode::Char('o') => Some(Message::Command(Command::OpenFile)),
            KeyCode::Char('n') => Some(Message::Command(Command::NewFile)),
            KeyCode::Char('q') => Some(Message::Command(Command::ExitApp)),
            KeyCode::Home => Some(Message::BufferStart(extend)),
            KeyCode::End => Some(Message::BufferEnd(extend)),
            _ => None,
        };
    }
    if has_alt(key) {
        return match key.code {
            KeyCode::Char(c) => model.menu_bar.find_by_initial(c).map(Message::OpenMenu),
            _ => None,
        };
    }
    match key.code {
        KeyCode::F(10) => Some(Message::OpenMenu(0)),
        KeyCode::F(1) => Some(Message::Command(Command::ShowDocs)),
        KeyCode::F(3) => Some(Message::Command(Command::FindNext)),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left, extend)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right, extend)),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up, extend)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down, extend)),
        KeyCode::Home => Some(Message::LineStart(extend)),
        KeyCode::End => Some(Message::LineEnd(extend)),
        KeyCode::PageUp => Some(Message::PageUp(extend)),
        KeyCode::PageDown => Some(Message::PageDown(extend)),
        KeyCode::Enter => Some(Message::Newline),
        KeyCode::Tab => Some(Message::Tab),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Char(c) => Some(Message::InsertChar(c)),
        _ => None,
    }
}

fn menu_title_at(model: &Model, column: u16) -> Option<usize> {
    crate::ui::menu_title_positions(&model.menu_bar)
        .into_iter()
        .position(|(start, width)| column >= start && column < start + width)
}

/// Buffer line and column under a screen cell in the editor pane.
fn editor_position(model: &Model, column: u16, row: u16) -> Option<(usize, usize)> {
    let top = crate::ui::MENU_BAR_ROWS;
    if row < top || row >= top + model.viewport.height() {
        return None;
    }
    let gutter = crate::ui::line_number_width(model.viewport.total_lines()) + 1;
    let line = model.viewport.offset() + usize::from(row - top);
    let col = model.viewport.col_offset() + usize::from(column.saturating_sub(gutter));
    let last_line = model.session.buffer().line_count().saturating_sub(1);
    Some((line.min(last_line), col))
}
