//! The editing session: buffer, history and overlay kept in lockstep.
//!
//! [`EditorSession`] is the single writer of the buffer. Every mutation runs
//! in a fixed order: buffer change, overlay re-render, history record, then
//! the returned effects (status first, preview last). Hosts execute the
//! [`Effect`]s; the session never performs I/O.

use chrono::{Local, NaiveDateTime};

use crate::command::{Command, CommandError, VirtualKey, snippets};
use crate::editor::{Buffer, DEFAULT_HISTORY_LIMIT, Direction, History, Selection};
use crate::highlight::Overlay;
use crate::search::FindSpec;

/// Work the host performs on behalf of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Short human-readable outcome for the status line.
    Status(String),
    /// Buffer text changed; push it to the preview.
    SyncPreview,
    /// Put text on the clipboard.
    CopyToClipboard(String),
    /// Read the clipboard and hand the result to [`EditorSession::paste`].
    ReadClipboard,
    Save,
    SaveAs,
    Open,
    /// The buffer now holds a fresh untitled document.
    NewDocument,
    Exit,
    ShowFindReplace,
    ShowAbout,
    ShowDocs,
}

/// Query, replacement and options of the find/replace panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindState {
    pub spec: FindSpec,
    pub replacement: String,
}

#[derive(Debug)]
pub struct EditorSession {
    buffer: Buffer,
    history: History,
    overlay: Overlay,
    find: FindState,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl EditorSession {
    /// Start a session over `text` with the default history limit.
    pub fn new(text: &str) -> Self {
        Self::with_history_limit(text, DEFAULT_HISTORY_LIMIT)
    }

    /// Start a session whose history keeps at most `limit` snapshots.
    ///
    /// The initial text is the first snapshot.
    pub fn with_history_limit(text: &str, limit: usize) -> Self {
        let mut history = History::with_limit(limit);
        history.record(text);
        Self {
            buffer: Buffer::from_text(text),
            history,
            overlay: Overlay::new(text),
            find: FindState::default(),
            clock: local_now,
        }
    }

    /// Replace the wall clock used by `insertDate`.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    pub const fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub const fn find_state(&self) -> &FindState {
        &self.find
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub const fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// The buffer now matches what is on disk.
    pub const fn mark_saved(&mut self) {
        self.buffer.mark_clean();
    }

    /// Mirror the editor's scroll offset onto the overlay.
    pub const fn sync_scroll(&mut self, top_line: usize) {
        self.overlay.sync_scroll(top_line);
    }

    // --- Dispatch ---

    /// Look up `action` and run it. Unknown actions and bad payloads are
    /// reported on the status channel.
    pub fn dispatch(&mut self, action: &str, payload: Option<&str>) -> Vec<Effect> {
        match Command::parse(action, payload) {
            Ok(command) => self.apply(command),
            Err(err) => Self::rejected(&err),
        }
    }

    /// Effects reporting a command that could not be parsed.
    pub fn rejected(err: &CommandError) -> Vec<Effect> {
        tracing::warn!(%err, "rejected editor action");
        vec![Effect::Status(err.to_string())]
    }

    pub fn apply(&mut self, command: Command) -> Vec<Effect> {
        tracing::debug!(action = command.action_id(), "apply command");
        crate::perf::log_event("session.apply", command.action_id());
        match command {
            Command::NewFile => {
                let mut effects = self.reset_document("New file created");
                effects.insert(0, Effect::NewDocument);
                effects
            }
            Command::Clear => self.reset_document("Cleared"),
            Command::OpenFile => vec![Effect::Open],
            Command::SaveFile => vec![Effect::Save],
            Command::SaveAsFile => vec![Effect::SaveAs],
            Command::ExitApp => vec![Effect::Exit],
            Command::Undo => self.step_history(true),
            Command::Redo => self.step_history(false),
            Command::Cut => self.cut(),
            Command::Copy => self.copy(),
            Command::Paste => vec![Effect::ReadClipboard],
            Command::FindReplace => vec![Effect::ShowFindReplace],
            Command::ShowAbout => vec![Effect::ShowAbout],
            Command::ShowDocs => vec![Effect::ShowDocs],
            Command::InsertDate => self.insert_date(),
            Command::InsertTag(tag) => {
                let default_text = if tag == "dt" || tag == "dd" {
                    "Item"
                } else {
                    "Content"
                };
                self.buffer.wrap_selection(&tag, default_text);
                self.commit(Some(format!("Inserted {tag} tag")))
            }
            Command::WrapSelection(tag) => {
                let status = if self.buffer.has_selection() {
                    format!("Wrapped with {tag} tags")
                } else {
                    format!("Inserted {tag} tags")
                };
                self.buffer.wrap_selection(&tag, "text");
                self.commit(Some(status))
            }
            Command::InsertForm => self.insert_snippet(snippets::FORM, "Inserted form"),
            Command::InsertInput(kind) => {
                let status = format!("Inserted {} input", kind.as_str());
                self.insert_snippet(&snippets::input(kind), &status)
            }
            Command::InsertSelect => self.insert_snippet(snippets::SELECT, "Inserted select"),
            Command::InsertOption => self.insert_snippet(snippets::OPTION, "Inserted option"),
            Command::InsertTextarea => {
                self.insert_snippet(snippets::TEXTAREA, "Inserted textarea")
            }
            Command::InsertVideo => self.insert_snippet(snippets::VIDEO, "Inserted video"),
            Command::InsertAudio => self.insert_snippet(snippets::AUDIO, "Inserted audio"),
            Command::InsertMeta(kind) => {
                let status = format!("Inserted meta {}", kind.as_str());
                self.insert_snippet(snippets::meta(kind), &status)
            }
            Command::Find => self.find().1,
            Command::FindNext => self.find_next(),
            Command::Replace => self.replace(),
            Command::ReplaceAll => self.replace_all(),
            Command::SetFindText(text) => {
                self.find.spec.query = text;
                Vec::new()
            }
            Command::SetReplaceText(text) => {
                self.find.replacement = text;
                Vec::new()
            }
            Command::ToggleCaseSensitive => {
                self.find.spec.case_sensitive = !self.find.spec.case_sensitive;
                Vec::new()
            }
            Command::ToggleWholeWord => {
                self.find.spec.whole_word = !self.find.spec.whole_word;
                Vec::new()
            }
            Command::KeyboardKey(key) => match key {
                VirtualKey::Char(ch) => self.type_char(ch),
                VirtualKey::Space => self.type_char(' '),
                VirtualKey::Enter => self.type_char('\n'),
                VirtualKey::Tab => self.type_text(snippets::TAB),
                VirtualKey::Backspace => self.delete_back(),
            },
        }
    }

    // --- Typing ---

    /// Insert typed text over the selection.
    pub fn type_text(&mut self, text: &str) -> Vec<Effect> {
        if text.is_empty() && !self.buffer.has_selection() {
            return Vec::new();
        }
        self.buffer.insert_str(text);
        self.commit(None)
    }

    pub fn type_char(&mut self, ch: char) -> Vec<Effect> {
        self.buffer.insert_char(ch);
        self.commit(None)
    }

    pub fn delete_back(&mut self) -> Vec<Effect> {
        if self.buffer.delete_back() {
            self.commit(None)
        } else {
            Vec::new()
        }
    }

    pub fn delete_forward(&mut self) -> Vec<Effect> {
        if self.buffer.delete_forward() {
            self.commit(None)
        } else {
            Vec::new()
        }
    }

    /// Finish a clipboard read started by [`Effect::ReadClipboard`].
    ///
    /// A failed read leaves the buffer untouched.
    pub fn paste(&mut self, clipboard: Result<String, String>) -> Vec<Effect> {
        match clipboard {
            Ok(text) => {
                self.buffer.insert_str(&text);
                self.commit(Some("Pasted from clipboard".to_string()))
            }
            Err(err) => vec![Effect::Status(format!("Failed to paste: {err}"))],
        }
    }

    /// Load new document text as a single undoable step.
    pub fn replace_document(&mut self, text: &str) -> Vec<Effect> {
        self.buffer.set_text(text);
        self.buffer.set_caret(0);
        let effects = self.commit(None);
        self.buffer.mark_clean();
        effects
    }

    // --- Caret movement (no history) ---

    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        self.buffer.move_cursor(direction, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.buffer.move_home(extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        self.buffer.move_end(extend);
    }

    pub fn move_to_start(&mut self, extend: bool) {
        self.buffer.move_to_start(extend);
    }

    pub fn move_to_end(&mut self, extend: bool) {
        self.buffer.move_to_end(extend);
    }

    pub fn move_lines(&mut self, lines: isize, extend: bool) {
        self.buffer.move_lines(lines, extend);
    }

    pub fn move_to(&mut self, line: usize, col: usize) {
        self.buffer.move_to(line, col);
    }

    pub fn select_all(&mut self) {
        self.buffer.select_all();
    }

    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.buffer.set_selection(start, end);
    }

    // --- Operations ---

    /// Settle after a buffer mutation: re-render, snapshot, report.
    fn commit(&mut self, status: Option<String>) -> Vec<Effect> {
        let text = self.buffer.text();
        self.overlay.refresh(&text);
        self.history.record(&text);
        let mut effects = Vec::with_capacity(2);
        if let Some(status) = status {
            effects.push(Effect::Status(status));
        }
        effects.push(Effect::SyncPreview);
        effects
    }

    fn reset_document(&mut self, status: &str) -> Vec<Effect> {
        self.buffer.set_text("");
        self.buffer.mark_clean();
        self.overlay.refresh("");
        self.history.reset("");
        vec![Effect::Status(status.to_string()), Effect::SyncPreview]
    }

    fn step_history(&mut self, backwards: bool) -> Vec<Effect> {
        let (entry, done, nothing) = if backwards {
            (self.history.undo(), "Undo", "Nothing to undo")
        } else {
            (self.history.redo(), "Redo", "Nothing to redo")
        };
        let Some(text) = entry.map(str::to_string) else {
            return vec![Effect::Status(nothing.to_string())];
        };
        self.buffer.set_text(&text);
        self.overlay.refresh(&text);
        vec![Effect::Status(done.to_string()), Effect::SyncPreview]
    }

    fn cut(&mut self) -> Vec<Effect> {
        let Some(removed) = self.buffer.delete_selection() else {
            return Vec::new();
        };
        let mut effects = vec![Effect::CopyToClipboard(removed)];
        effects.extend(self.commit(Some("Cut to clipboard".to_string())));
        effects
    }

    fn copy(&self) -> Vec<Effect> {
        if !self.buffer.has_selection() {
            return Vec::new();
        }
        vec![
            Effect::CopyToClipboard(self.buffer.selected_text()),
            Effect::Status("Copied to clipboard".to_string()),
        ]
    }

    fn insert_snippet(&mut self, snippet: &str, status: &str) -> Vec<Effect> {
        self.buffer.insert_str(snippet);
        self.commit(Some(status.to_string()))
    }

    fn insert_date(&mut self) -> Vec<Effect> {
        let stamp = (self.clock)().format("%Y-%m-%d %H:%M:%S").to_string();
        self.insert_snippet(&stamp, "Inserted current date")
    }

    fn empty_query() -> Vec<Effect> {
        vec![Effect::Status("Please enter text to find".to_string())]
    }

    /// Select the first match from the top of the buffer.
    ///
    /// The returned selection is the completion signal that replace waits
    /// on; `None` means nothing was selected.
    fn find(&mut self) -> (Option<Selection>, Vec<Effect>) {
        if self.find.spec.is_empty() {
            return (None, Self::empty_query());
        }
        let text = self.buffer.text();
        let found = self.find.spec.find_first(&text).unwrap_or_else(|err| {
            tracing::warn!(%err, "find pattern rejected");
            None
        });
        self.select_match(found)
    }

    fn find_next(&mut self) -> Vec<Effect> {
        if self.find.spec.is_empty() {
            return Self::empty_query();
        }
        let text = self.buffer.text();
        let from = self.buffer.char_to_byte(self.buffer.selection().end);
        let found = self.find.spec.find_next(&text, from).unwrap_or_else(|err| {
            tracing::warn!(%err, "find pattern rejected");
            None
        });
        self.select_match(found).1
    }

    fn select_match(
        &mut self,
        found: Option<std::ops::Range<usize>>,
    ) -> (Option<Selection>, Vec<Effect>) {
        match found {
            Some(range) => {
                let start = self.buffer.byte_to_char(range.start);
                let end = self.buffer.byte_to_char(range.end);
                self.buffer.set_selection(start, end);
                (
                    Some(Selection::new(start, end)),
                    vec![Effect::Status("Found text".to_string())],
                )
            }
            None => (None, vec![Effect::Status("Text not found".to_string())]),
        }
    }

    /// Replace only acts on a selection equal to the query, whatever the
    /// case and whole-word options.
    fn selection_matches_query(&self) -> bool {
        self.buffer.has_selection() && self.buffer.selected_text() == self.find.spec.query
    }

    fn replace(&mut self) -> Vec<Effect> {
        if self.find.spec.is_empty() {
            return Self::empty_query();
        }
        if self.selection_matches_query() {
            return self.replace_selection();
        }
        let (found, mut effects) = self.find();
        if found.is_some() && self.selection_matches_query() {
            effects.extend(self.replace_selection());
        }
        effects
    }

    fn replace_selection(&mut self) -> Vec<Effect> {
        let replacement = self.find.replacement.clone();
        self.buffer.replace_selection(&replacement);
        self.commit(Some("Replaced".to_string()))
    }

    fn replace_all(&mut self) -> Vec<Effect> {
        if self.find.spec.is_empty() {
            return Self::empty_query();
        }
        let text = self.buffer.text();
        let result = match self.find.spec.replace_all(&text, &self.find.replacement) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%err, "replace pattern rejected");
                return vec![Effect::Status("No occurrences found".to_string())];
            }
        };
        if result.text == text {
            return vec![Effect::Status("No occurrences found".to_string())];
        }
        self.buffer.set_text(&result.text);
        self.commit(Some("Replaced all occurrences".to_string()))
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests;
