use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::command::Command;
use crate::menu::{MenuBar, MenuCursor};
use crate::session::{EditorSession, Effect};
use crate::ui::viewport::Viewport;

/// File written by Save when the session has no path yet.
pub const FALLBACK_FILE_NAME: &str = "edited.html";

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which field of the find/replace panel receives typing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FindField {
    #[default]
    Query,
    Replacement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindPanel {
    pub field: FindField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    SaveAs,
}

impl PromptKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Open => "Open file",
            Self::SaveAs => "Save as",
        }
    }
}

/// One-line path input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// Read-only popup over the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    About,
    Help,
}

/// I/O the event loop performs after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    CopyToTerminal(String),
    Save(PathBuf),
    Open(PathBuf),
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The buffer itself
/// is owned by the [`EditorSession`]; the model only holds what the
/// terminal host adds around it.
pub struct Model {
    pub session: EditorSession,
    pub menu_bar: MenuBar,
    /// Open menu and highlighted item, if any
    pub menu: Option<MenuCursor>,
    pub find_panel: Option<FindPanel>,
    pub prompt: Option<Prompt>,
    pub notice: Option<Notice>,
    /// In-process clipboard register
    pub clipboard: Option<String>,
    /// Where Save writes; `None` for an untitled buffer
    pub file_path: Option<PathBuf>,
    /// Scroll window over the buffer text
    pub viewport: Viewport,
    terminal_size: (u16, u16),
    toast: Option<Toast>,
    /// Destructive command awaiting its second press
    pub pending_confirm: Option<Command>,
    pub(super) pending_io: Vec<HostEffect>,
    /// Buffer text changed since the preview was last notified
    pub(super) preview_stale: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("viewport", &self.viewport)
            .field("menu", &self.menu)
            .field("find_panel", &self.find_panel)
            .field("prompt", &self.prompt)
            .field("notice", &self.notice)
            .field("pending_confirm", &self.pending_confirm)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(
        session: EditorSession,
        menu_bar: MenuBar,
        file_path: Option<PathBuf>,
        terminal_size: (u16, u16),
    ) -> Self {
        let mut model = Self {
            session,
            menu_bar,
            menu: None,
            find_panel: None,
            prompt: None,
            notice: None,
            clipboard: None,
            file_path,
            viewport: Viewport::default(),
            terminal_size,
            toast: None,
            pending_confirm: None,
            pending_io: Vec::new(),
            preview_stale: false,
            should_quit: false,
        };
        model.layout_editor();
        model
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub(super) fn set_terminal_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.layout_editor();
    }

    /// Size the viewport to the editor pane for the current chrome.
    pub(super) fn layout_editor(&mut self) {
        let (width, height) = self.terminal_size;
        let total_lines = self.session.buffer().line_count();
        let rows = crate::ui::editor_rows(height, self.find_panel.is_some());
        let cols = crate::ui::editor_text_width(width, total_lines);
        self.viewport.resize(cols, rows);
        self.viewport.set_total_lines(total_lines);
    }

    /// Scroll so the caret is on screen and mirror the offset to the overlay.
    pub(super) fn follow_cursor(&mut self) {
        self.layout_editor();
        let (line, col) = self.session.buffer().cursor_line_col();
        self.viewport.ensure_visible(line, col);
        self.sync_overlay_scroll();
    }

    pub(super) fn sync_overlay_scroll(&mut self) {
        let top = self.viewport.offset();
        self.session.sync_scroll(top);
    }

    /// File name shown in the status bar.
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(
                || "untitled".to_string(),
                |name| name.to_string_lossy().into_owned(),
            )
    }

    /// Path Save writes to.
    pub fn save_target(&self) -> PathBuf {
        self.file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(FALLBACK_FILE_NAME))
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| now >= toast.expires_at)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// I/O queued by the last updates, oldest first.
    pub fn take_pending_io(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.pending_io)
    }

    /// Whether the preview needs the current text, clearing the flag.
    pub fn take_preview_stale(&mut self) -> bool {
        std::mem::take(&mut self.preview_stale)
    }

    /// Carry out the session's effects that stay inside the model.
    pub(super) fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Status(message) => self.show_toast(ToastLevel::Info, message),
                Effect::SyncPreview => self.preview_stale = true,
                Effect::CopyToClipboard(text) => {
                    self.clipboard = Some(text.clone());
                    self.pending_io.push(HostEffect::CopyToTerminal(text));
                }
                Effect::ReadClipboard => {
                    let clipboard = self
                        .clipboard
                        .clone()
                        .ok_or_else(|| "clipboard is empty".to_string());
                    let pasted = self.session.paste(clipboard);
                    self.apply_effects(pasted);
                }
                Effect::Save => {
                    let target = self.save_target();
                    self.pending_io.push(HostEffect::Save(target));
                }
                Effect::SaveAs => {
                    let input = self
                        .file_path
                        .as_ref()
                        .map(|path| path.display().to_string())
                        .unwrap_or_default();
                    self.prompt = Some(Prompt {
                        kind: PromptKind::SaveAs,
                        input,
                    });
                }
                Effect::Open => {
                    self.prompt = Some(Prompt {
                        kind: PromptKind::Open,
                        input: String::new(),
                    });
                }
                Effect::NewDocument => self.file_path = None,
                Effect::Exit => self.should_quit = true,
                Effect::ShowFindReplace => {
                    self.menu = None;
                    self.find_panel = Some(FindPanel::default());
                }
                Effect::ShowAbout => self.notice = Some(Notice::About),
                Effect::ShowDocs => self.notice = Some(Notice::Help),
            }
        }
    }

    /// Load `text` read from `path` as the current document.
    pub(super) fn load_document(&mut self, path: PathBuf, text: &str) {
        let effects = self.session.replace_document(text);
        self.apply_effects(effects);
        self.file_path = Some(path);
        self.viewport.go_to_top();
        self.follow_cursor();
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(EditorSession::default(), MenuBar::default(), None, (80, 24))
    }
}
