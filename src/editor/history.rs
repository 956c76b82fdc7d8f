use std::collections::VecDeque;

/// Default number of snapshots kept before the oldest is evicted.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded stack of full-text snapshots with an undo/redo cursor.
///
/// `cursor` is `None` only while the history is empty; otherwise it indexes
/// the entry that matches the buffer at the last settle point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<String>,
    cursor: Option<usize>,
    limit: usize,
}

impl History {
    /// Create an empty history with the default limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty history holding at most `limit` snapshots (min 1).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    /// Record a snapshot of `text`.
    ///
    /// Consecutive identical snapshots collapse into one; the cursor still
    /// moves to that tail entry so it names the recorded text. On overflow
    /// the oldest entry is evicted and the cursor shifts down with it.
    ///
    /// Returns `true` if a new entry was appended.
    pub fn record(&mut self, text: &str) -> bool {
        if self.entries.back().is_some_and(|last| last == text) {
            self.cursor = Some(self.entries.len() - 1);
            return false;
        }
        self.entries.push_back(text.to_string());
        let mut cursor = self.entries.len() - 1;
        if self.entries.len() > self.limit {
            self.entries.pop_front();
            cursor -= 1;
        }
        self.cursor = Some(cursor);
        true
    }

    /// Step back one snapshot. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&str> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(String::as_str)
    }

    /// Step forward one snapshot. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&str> {
        let cursor = self.cursor.map_or(0, |c| c + 1);
        if cursor >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(String::as_str)
    }

    /// Drop every snapshot and start over with `text` as the only entry.
    pub fn reset(&mut self, text: &str) {
        self.entries.clear();
        self.entries.push_back(text.to_string());
        self.cursor = Some(0);
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> Option<&str> {
        self.cursor
            .and_then(|c| self.entries.get(c))
            .map(String::as_str)
    }

    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.entries.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_is_empty() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_record_moves_cursor_to_new_entry() {
        let mut history = History::new();
        assert!(history.record("a"));
        assert!(history.record("ab"));
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.current(), Some("ab"));
    }

    #[test]
    fn test_record_identical_twice_keeps_one_entry() {
        let mut history = History::new();
        history.record("same");
        assert!(!history.record("same"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_undo_then_redo_restores_text() {
        let mut history = History::new();
        history.record("one");
        history.record("two");
        history.record("three");
        assert_eq!(history.undo(), Some("two"));
        assert_eq!(history.undo(), Some("one"));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), Some("two"));
        assert_eq!(history.redo(), Some("three"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_record_after_undo_appends_at_tail() {
        let mut history = History::new();
        history.record("one");
        history.record("two");
        history.undo();
        history.record("other");
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.undo(), Some("two"));
    }

    #[test]
    fn test_record_matching_tail_after_undo_moves_cursor_to_tail() {
        let mut history = History::new();
        history.record("");
        history.record("a");
        history.record("ab");
        assert_eq!(history.undo(), Some("a"));
        assert!(!history.record("ab"));
        assert_eq!(history.len(), 3);
        assert_eq!(history.current(), Some("ab"));
        assert_eq!(history.undo(), Some("a"));
    }

    #[test]
    fn test_overflow_evicts_oldest_and_shifts_cursor() {
        let mut history = History::new();
        for i in 0..DEFAULT_HISTORY_LIMIT {
            history.record(&i.to_string());
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.cursor(), Some(49));

        history.record("fifty");
        assert_eq!(history.len(), 50);
        assert_eq!(history.cursor(), Some(49));
        assert_eq!(history.current(), Some("fifty"));

        // "0" is gone: undoing all the way lands on "1".
        let mut oldest = None;
        while let Some(text) = history.undo() {
            oldest = Some(text.to_string());
        }
        assert_eq!(oldest.as_deref(), Some("1"));
    }

    #[test]
    fn test_reset_keeps_single_entry() {
        let mut history = History::new();
        history.record("a");
        history.record("b");
        history.reset("");
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.current(), Some(""));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_is_at_least_one() {
        let mut history = History::with_limit(0);
        history.record("a");
        history.record("b");
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Some("b"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_exceeds_limit(texts in prop::collection::vec("[ab]{0,3}", 0..200)) {
                let mut history = History::new();
                for text in &texts {
                    history.record(text);
                    prop_assert!(history.len() <= DEFAULT_HISTORY_LIMIT);
                    prop_assert_eq!(history.current(), Some(text.as_str()));
                }
            }

            #[test]
            fn undo_then_redo_is_identity(
                texts in prop::collection::vec("[a-c]{0,4}", 1..80),
                undos in 1..10usize,
            ) {
                let mut history = History::new();
                for text in &texts {
                    history.record(text);
                }
                for _ in 0..undos {
                    let before = history.current().map(str::to_string);
                    if history.undo().is_some() {
                        let restored = history.redo().map(str::to_string);
                        prop_assert_eq!(restored, before);
                        history.undo();
                    }
                }
            }

            #[test]
            fn cursor_always_in_bounds(
                ops in prop::collection::vec((0..3u8, "[xy]{0,2}"), 0..150),
            ) {
                let mut history = History::with_limit(8);
                for (op, text) in &ops {
                    match op {
                        0 => { history.record(text); }
                        1 => { history.undo(); }
                        _ => { history.redo(); }
                    }
                    if let Some(cursor) = history.cursor() {
                        prop_assert!(cursor < history.len());
                    } else {
                        prop_assert!(history.is_empty());
                    }
                }
            }
        }
    }
}
