use std::ops::Range;

use ropey::Rope;

/// An ordered selection range in char offsets.
///
/// `start <= end` always holds; an empty selection is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Build a selection from two offsets in any order.
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A collapsed selection at `pos`.
    pub const fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The editable text plus its selection, backed by a rope.
///
/// Offsets are char indices into the text. The selection is stored as an
/// anchor and a head so that keyboard extension keeps the fixed end; callers
/// only ever see the ordered [`Selection`].
///
/// Every mutating method here is a pure text operation: no rendering, no
/// history. The session composes them with those side effects.
pub struct Buffer {
    rope: Rope,
    anchor: usize,
    head: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: Option<usize>,
    dirty: bool,
}

impl Buffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            anchor: 0,
            head: 0,
            col_memory: None,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length of the text in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in chars (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    /// Char offset where a line starts.
    pub fn line_start(&self, line_idx: usize) -> usize {
        let line_idx = line_idx.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(line_idx)
    }

    /// Line index containing a char offset.
    pub fn line_of(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.rope.len_chars()))
    }

    /// Convert a char offset to a byte offset into [`Buffer::text`].
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        self.rope.char_to_byte(char_idx.min(self.rope.len_chars()))
    }

    /// Convert a byte offset into [`Buffer::text`] to a char offset.
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        self.rope.byte_to_char(byte_idx.min(self.rope.len_bytes()))
    }

    /// The current ordered selection.
    pub const fn selection(&self) -> Selection {
        Selection::new(self.anchor, self.head)
    }

    /// The moving end of the selection (where the caret is drawn).
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Line and column (chars) of the caret.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let line = self.line_of(self.head);
        (line, self.head - self.line_start(line))
    }

    pub const fn has_selection(&self) -> bool {
        self.anchor != self.head
    }

    /// Set the selection, clamping both ends to the text length.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.rope.len_chars();
        let sel = Selection::new(start.min(len), end.min(len));
        self.anchor = sel.start;
        self.head = sel.end;
        self.col_memory = None;
    }

    /// Collapse the selection to a caret.
    pub fn set_caret(&mut self, pos: usize) {
        self.set_selection(pos, pos);
    }

    pub fn select_all(&mut self) {
        self.set_selection(0, self.rope.len_chars());
    }

    /// The selected text (empty when the selection is a caret).
    pub fn selected_text(&self) -> String {
        let sel = self.selection();
        self.rope.slice(sel.range()).to_string()
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Replace the whole text, leaving the caret at the end.
    ///
    /// Returns `false` when the text was already identical.
    pub fn set_text(&mut self, text: &str) -> bool {
        let len = text.chars().count();
        if self.rope == text {
            self.set_caret(len);
            return false;
        }
        self.rope = Rope::from_str(text);
        self.set_caret(len);
        self.dirty = true;
        true
    }

    /// Replace the selection with `text`, collapsing the caret after it.
    pub fn replace_selection(&mut self, text: &str) {
        let sel = self.selection();
        self.replace_range(sel.range(), text);
        self.set_caret(sel.start + text.chars().count());
    }

    /// Alias used for typed input and snippet insertion.
    pub fn insert_str(&mut self, text: &str) {
        self.replace_selection(text);
    }

    /// Insert a single character, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.replace_selection(ch.encode_utf8(&mut tmp));
    }

    /// Remove the selection and return it. `None` when nothing is selected.
    pub fn delete_selection(&mut self) -> Option<String> {
        if !self.has_selection() {
            return None;
        }
        let removed = self.selected_text();
        let sel = self.selection();
        self.replace_range(sel.range(), "");
        self.set_caret(sel.start);
        Some(removed)
    }

    /// Wrap the selection in `<tag>…</tag>`.
    ///
    /// With a selection, the new selection spans the whole wrapped region.
    /// Without one, `<tag>default_text</tag>` is inserted at the caret and
    /// `default_text` is selected for overtyping.
    pub fn wrap_selection(&mut self, tag: &str, default_text: &str) {
        let sel = self.selection();
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        if sel.is_empty() {
            let inserted = format!("{open}{default_text}{close}");
            self.replace_range(sel.range(), &inserted);
            let inner_start = sel.start + open.chars().count();
            self.set_selection(inner_start, inner_start + default_text.chars().count());
        } else {
            let wrapped = format!("{open}{}{close}", self.selected_text());
            self.replace_range(sel.range(), &wrapped);
            self.set_selection(sel.start, sel.start + wrapped.chars().count());
        }
    }

    /// Delete the selection, or the character before the caret (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection().is_some() {
            return true;
        }
        if self.head == 0 {
            return false;
        }
        let pos = self.head;
        self.replace_range(pos - 1..pos, "");
        self.set_caret(pos - 1);
        true
    }

    /// Delete the selection, or the character at the caret (Delete).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection().is_some() {
            return true;
        }
        if self.head >= self.rope.len_chars() {
            return false;
        }
        let pos = self.head;
        self.replace_range(pos..pos + 1, "");
        self.set_caret(pos);
        true
    }

    /// Move the caret; with `extend` the anchor stays put.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        match direction {
            Direction::Left => {
                let target = if !extend && self.has_selection() {
                    self.selection().start
                } else {
                    self.head.saturating_sub(1)
                };
                self.place_head(target, extend);
            }
            Direction::Right => {
                let target = if !extend && self.has_selection() {
                    self.selection().end
                } else {
                    (self.head + 1).min(self.rope.len_chars())
                };
                self.place_head(target, extend);
            }
            Direction::Up => self.move_vertical(-1, extend),
            Direction::Down => self.move_vertical(1, extend),
        }
    }

    /// Move the caret to the beginning of its line (Home).
    pub fn move_home(&mut self, extend: bool) {
        let (line, _) = self.cursor_line_col();
        self.place_head(self.line_start(line), extend);
    }

    /// Move the caret to the end of its line (End).
    pub fn move_end(&mut self, extend: bool) {
        let (line, _) = self.cursor_line_col();
        self.place_head(self.line_start(line) + self.line_len(line), extend);
    }

    /// Move the caret to the start of the buffer (Ctrl+Home).
    pub fn move_to_start(&mut self, extend: bool) {
        self.place_head(0, extend);
    }

    /// Move the caret to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self, extend: bool) {
        self.place_head(self.rope.len_chars(), extend);
    }

    /// Move the caret vertically by `lines` (PageUp/PageDown).
    pub fn move_lines(&mut self, lines: isize, extend: bool) {
        self.move_vertical(lines, extend);
    }

    /// Move the caret to a specific line and column, clamped.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        let line = line.min(max_line);
        let col = col.min(self.line_len(line));
        self.set_caret(self.line_start(line) + col);
    }

    // --- Private helpers ---

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        if start < end || !text.is_empty() {
            self.dirty = true;
        }
    }

    fn place_head(&mut self, pos: usize, extend: bool) {
        self.head = pos.min(self.rope.len_chars());
        if !extend {
            self.anchor = self.head;
        }
        self.col_memory = None;
    }

    fn move_vertical(&mut self, delta: isize, extend: bool) {
        let (line, col) = self.cursor_line_col();
        let memory = self.col_memory.unwrap_or(col);
        let last = self.line_count().saturating_sub(1);
        let target_line = line.saturating_add_signed(delta).min(last);
        if target_line == line {
            return;
        }
        let target_col = memory.min(self.line_len(target_line));
        self.head = self.line_start(target_line) + target_col;
        if !extend {
            self.anchor = self.head;
        }
        self.col_memory = Some(memory);
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("rope", &format_args!("Rope({} chars)", self.rope.len_chars()))
            .field("selection", &self.selection())
            .field("dirty", &self.dirty)
            .finish()
    }
}
