use crate::app::Model;
use crate::app::model::{FindField, HostEffect, PromptKind, ToastLevel};
use crate::command::{Command, snippets};
use crate::editor::Direction;
use crate::menu::MenuCursor;
use crate::session::EditorSession;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Type a character over the selection
    InsertChar(char),
    /// Insert a block of text (bracketed paste)
    InsertText(String),
    Newline,
    /// Insert the indentation unit
    Tab,
    DeleteBack,
    DeleteForward,

    // Caret
    /// Move the caret; `true` extends the selection
    MoveCursor(Direction, bool),
    LineStart(bool),
    LineEnd(bool),
    BufferStart(bool),
    BufferEnd(bool),
    PageUp(bool),
    PageDown(bool),
    SelectAll,
    /// Place the caret at a visible line and column (mouse click)
    ClickAt { line: usize, col: usize },
    /// Scroll the view without moving the caret
    ScrollUp(usize),
    ScrollDown(usize),

    // Commands
    /// Run an editor command
    Command(Command),
    /// Run a named action, as activated from a menu
    Dispatch { action: String, data: Option<String> },

    // Menu
    OpenMenu(usize),
    MenuUp,
    MenuDown,
    MenuLeft,
    MenuRight,
    MenuActivate,
    CloseMenu,

    // Find/replace panel
    FindInput(char),
    FindBackspace,
    FindSwitchField,
    CloseFindPanel,

    // Path prompt
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,

    DismissNotice,
    /// Terminal resized
    Resize(u16, u16),
}

/// Commands that throw away unsaved work and so need a second press.
const fn needs_confirmation(command: &Command) -> bool {
    matches!(
        command,
        Command::NewFile | Command::Clear | Command::ExitApp
    )
}

/// Pure function that updates the model based on a message.
///
/// This is the core of The Elm Architecture - all state changes
/// happen here in a predictable way. File and clipboard I/O is queued on
/// the model and carried out by the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    let follow_cursor = !matches!(msg, Message::ScrollUp(_) | Message::ScrollDown(_));
    // A pending confirmation only survives an immediate repeat of itself.
    let confirm = model.pending_confirm.take();

    match msg {
        // Editing
        Message::InsertChar(ch) => {
            let effects = model.session.type_char(ch);
            model.apply_effects(effects);
        }
        Message::InsertText(text) => {
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            let effects = model.session.type_text(&text);
            model.apply_effects(effects);
        }
        Message::Newline => {
            let effects = model.session.type_char('\n');
            model.apply_effects(effects);
        }
        Message::Tab => {
            let effects = model.session.type_text(snippets::TAB);
            model.apply_effects(effects);
        }
        Message::DeleteBack => {
            let effects = model.session.delete_back();
            model.apply_effects(effects);
        }
        Message::DeleteForward => {
            let effects = model.session.delete_forward();
            model.apply_effects(effects);
        }

        // Caret
        Message::MoveCursor(direction, extend) => model.session.move_cursor(direction, extend),
        Message::LineStart(extend) => model.session.move_home(extend),
        Message::LineEnd(extend) => model.session.move_end(extend),
        Message::BufferStart(extend) => model.session.move_to_start(extend),
        Message::BufferEnd(extend) => model.session.move_to_end(extend),
        Message::PageUp(extend) => {
            let page = page_lines(&model);
            model.viewport.scroll_up(page.unsigned_abs());
            model.session.move_lines(-page, extend);
        }
        Message::PageDown(extend) => {
            let page = page_lines(&model);
            model.viewport.scroll_down(page.unsigned_abs());
            model.session.move_lines(page, extend);
        }
        Message::SelectAll => model.session.select_all(),
        Message::ClickAt { line, col } => {
            model.menu = None;
            model.session.move_to(line, col);
        }
        Message::ScrollUp(n) => {
            model.viewport.scroll_up(n);
            model.sync_overlay_scroll();
        }
        Message::ScrollDown(n) => {
            model.viewport.scroll_down(n);
            model.sync_overlay_scroll();
        }

        // Commands
        Message::Command(command) => run_command(&mut model, command, confirm.as_ref()),
        Message::Dispatch { action, data } => {
            dispatch(&mut model, &action, data.as_deref(), confirm.as_ref());
        }

        // Menu
        Message::OpenMenu(top) => {
            if model.menu_bar.menus().is_empty() {
                model.show_toast(ToastLevel::Warning, "No menus loaded");
            } else {
                model.menu = Some(MenuCursor::open(&model.menu_bar, top));
            }
        }
        Message::MenuUp => with_menu(&mut model, MenuCursor::move_up),
        Message::MenuDown => with_menu(&mut model, MenuCursor::move_down),
        Message::MenuLeft => with_menu(&mut model, MenuCursor::move_left),
        Message::MenuRight => with_menu(&mut model, MenuCursor::move_right),
        Message::MenuActivate => {
            let activated = match model.menu.as_mut() {
                Some(cursor) => cursor.activate(&model.menu_bar),
                None => None,
            };
            if let Some(item) = activated {
                model.menu = None;
                dispatch(&mut model, &item.action, item.data.as_deref(), confirm.as_ref());
            }
        }
        Message::CloseMenu => model.menu = None,

        // Find/replace panel
        Message::FindInput(ch) => edit_find_field(&mut model, |text| text.push(ch)),
        Message::FindBackspace => edit_find_field(&mut model, |text| {
            text.pop();
        }),
        Message::FindSwitchField => {
            if let Some(panel) = model.find_panel.as_mut() {
                panel.field = match panel.field {
                    FindField::Query => FindField::Replacement,
                    FindField::Replacement => FindField::Query,
                };
            }
        }
        Message::CloseFindPanel => model.find_panel = None,

        // Path prompt
        Message::PromptInput(ch) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.pop();
            }
        }
        Message::PromptSubmit => submit_prompt(&mut model),
        Message::PromptCancel => model.prompt = None,

        Message::DismissNotice => model.notice = None,
        Message::Resize(width, height) => model.set_terminal_size(width, height),
    }

    if follow_cursor {
        model.follow_cursor();
    }
    model
}

fn page_lines(model: &Model) -> isize {
    isize::try_from(model.viewport.height().max(1)).unwrap_or(1)
}

fn with_menu(model: &mut Model, step: impl FnOnce(&mut MenuCursor, &crate::menu::MenuBar)) {
    if let Some(cursor) = model.menu.as_mut() {
        step(cursor, &model.menu_bar);
    }
}

fn dispatch(model: &mut Model, action: &str, data: Option<&str>, confirm: Option<&Command>) {
    match Command::parse(action, data) {
        Ok(command) => run_command(model, command, confirm),
        Err(err) => {
            for effect in EditorSession::rejected(&err) {
                if let crate::session::Effect::Status(message) = effect {
                    model.show_toast(ToastLevel::Warning, message);
                }
            }
        }
    }
}

fn run_command(model: &mut Model, command: Command, confirm: Option<&Command>) {
    if needs_confirmation(&command)
        && model.session.is_dirty()
        && confirm != Some(&command)
    {
        let verb = match command {
            Command::ExitApp => "exit",
            Command::Clear => "clear",
            _ => "start a new file",
        };
        model.show_toast(
            ToastLevel::Warning,
            format!("Unsaved changes. Repeat to {verb} anyway"),
        );
        model.pending_confirm = Some(command);
        return;
    }
    let effects = model.session.apply(command);
    model.apply_effects(effects);
}

fn edit_find_field(model: &mut Model, edit: impl FnOnce(&mut String)) {
    let Some(panel) = model.find_panel.as_ref() else {
        return;
    };
    let state = model.session.find_state();
    let command = match panel.field {
        FindField::Query => {
            let mut text = state.spec.query.clone();
            edit(&mut text);
            Command::SetFindText(text)
        }
        FindField::Replacement => {
            let mut text = state.replacement.clone();
            edit(&mut text);
            Command::SetReplaceText(text)
        }
    };
    let effects = model.session.apply(command);
    model.apply_effects(effects);
}

fn submit_prompt(model: &mut Model) {
    let Some(prompt) = model.prompt.take() else {
        return;
    };
    let input = prompt.input.trim();
    if input.is_empty() {
        model.show_toast(ToastLevel::Warning, "No file name given");
        return;
    }
    let path = std::path::PathBuf::from(input);
    match prompt.kind {
        PromptKind::Open => model.pending_io.push(HostEffect::Open(path)),
        PromptKind::SaveAs => model.pending_io.push(HostEffect::Save(path)),
    }
}
