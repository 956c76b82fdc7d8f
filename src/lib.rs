// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. menu::MenuBar)
    clippy::module_name_repetitions
)]

//! # htmlpad
//!
//! A terminal HTML editor with a live syntax-highlight overlay.
//!
//! htmlpad edits a single HTML document with:
//! - A highlight overlay recomputed on every edit
//! - Snapshot undo/redo (50 entries by default)
//! - Menu-driven tag and snippet insertion
//! - Find, replace and replace-all
//! - A debounced preview file kept in sync with the buffer
//!
//! ## Architecture
//!
//! The editing core is host-independent: [`session::EditorSession`] owns
//! the buffer, history and overlay and answers every command with a list of
//! [`session::Effect`]s. The terminal host uses The Elm Architecture (TEA):
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Text buffer and snapshot history
//! - [`highlight`]: HTML escaping and token highlighting
//! - [`command`]: Action table and insertion snippets
//! - [`search`]: Find/replace matching
//! - [`session`]: The editing session tying the above together
//! - [`menu`]: Declarative menu bar
//! - [`preview`]: Debounced preview file
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod command;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod menu;
pub mod perf;
pub mod preview;
pub mod search;
pub mod session;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::session::{EditorSession, Effect};
    pub use crate::ui::viewport::Viewport;
}
