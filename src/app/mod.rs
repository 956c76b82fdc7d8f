//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Editing semantics live in [`crate::session`]; this layer turns key
//! presses into session calls and session effects into terminal I/O.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::read_document;
pub use model::{
    FALLBACK_FILE_NAME, FindField, FindPanel, HostEffect, Model, Notice, Prompt, PromptKind,
    ToastLevel,
};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::editor::DEFAULT_HISTORY_LIMIT;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    initial_text: String,
    startup_notice: Option<String>,
    history_limit: usize,
    preview: Option<(PathBuf, u64)>,
}

impl App {
    /// Create an application editing `initial_text`, saved to `file_path`.
    pub fn new(file_path: Option<PathBuf>, initial_text: impl Into<String>) -> Self {
        Self {
            file_path,
            initial_text: initial_text.into(),
            startup_notice: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            preview: None,
        }
    }

    /// Maximum number of undo snapshots.
    #[must_use]
    pub const fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Mirror the buffer into `path`, written once edits settle for `delay_ms`.
    #[must_use]
    pub fn with_preview(mut self, path: Option<PathBuf>, delay_ms: u64) -> Self {
        self.preview = path.map(|path| (path, delay_ms));
        self
    }

    /// Message shown on the first frame.
    #[must_use]
    pub fn with_startup_notice(mut self, notice: Option<String>) -> Self {
        self.startup_notice = notice;
        self
    }
}
