use chrono::NaiveDate;

use super::*;

fn status(effects: &[Effect]) -> Option<&str> {
    effects.iter().rev().find_map(|effect| match effect {
        Effect::Status(message) => Some(message.as_str()),
        _ => None,
    })
}

fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|date| date.and_hms_opt(14, 7, 9))
        .unwrap()
}

fn session_with_find(text: &str, query: &str, replacement: &str) -> EditorSession {
    let mut session = EditorSession::new(text);
    session.dispatch("setFindText", Some(query));
    session.dispatch("setReplaceText", Some(replacement));
    session
}

// --- Mutation ordering ---

#[test]
fn test_mutation_renders_records_then_reports() {
    let mut session = EditorSession::new("say hi now");
    session.set_selection(4, 6);
    let effects = session.dispatch("insertTag", Some("em"));

    assert_eq!(session.text(), "say <em>hi</em> now");
    assert_eq!(session.buffer().selected_text(), "<em>hi</em>");
    assert_eq!(session.history().current(), Some("say <em>hi</em> now"));
    assert!(session.overlay().markup().contains("&lt;em&gt;"));
    assert_eq!(
        effects,
        vec![
            Effect::Status("Inserted em tag".to_string()),
            Effect::SyncPreview
        ]
    );
}

#[test]
fn test_history_matches_buffer_after_every_edit() {
    let mut session = EditorSession::new("");
    for ch in "abc".chars() {
        session.type_char(ch);
        assert_eq!(session.history().current(), Some(session.text().as_str()));
    }
    assert_eq!(session.history().len(), 4);
}

#[test]
fn test_insert_tag_without_selection_selects_default() {
    let mut session = EditorSession::new("");
    session.dispatch("insertTag", Some("p"));
    assert_eq!(session.text(), "<p>Content</p>");
    assert_eq!(session.buffer().selected_text(), "Content");
}

#[test]
fn test_insert_tag_definition_terms_default_to_item() {
    let mut session = EditorSession::new("");
    session.dispatch("insertTag", Some("dd"));
    assert_eq!(session.text(), "<dd>Item</dd>");
}

#[test]
fn test_wrap_selection_status_depends_on_selection() {
    let mut session = EditorSession::new("word");
    session.move_to_end(false);
    let effects = session.dispatch("wrapSelection", Some("b"));
    assert_eq!(status(&effects), Some("Inserted b tags"));
    assert_eq!(session.buffer().selected_text(), "text");

    session.select_all();
    let effects = session.dispatch("wrapSelection", Some("i"));
    assert_eq!(status(&effects), Some("Wrapped with i tags"));
    assert_eq!(session.text(), "<i>word<b>text</b></i>");
}

#[test]
fn test_snippet_replaces_selection_and_collapses_after() {
    let mut session = EditorSession::new("[x]");
    session.set_selection(1, 2);
    let effects = session.dispatch("insertInput", Some("text"));
    let snippet = "<input type=\"text\" name=\"\" value=\"\">";
    assert_eq!(session.text(), format!("[{snippet}]"));
    let caret = 1 + snippet.chars().count();
    assert_eq!(session.buffer().selection(), Selection::caret(caret));
    assert_eq!(status(&effects), Some("Inserted text input"));
}

#[test]
fn test_insert_meta_status_names_kind() {
    let mut session = EditorSession::new("");
    let effects = session.dispatch("insertMeta", Some("author"));
    assert_eq!(session.text(), "<meta name=\"author\" content=\"Author name\">");
    assert_eq!(status(&effects), Some("Inserted meta author"));
}

#[test]
fn test_insert_date_uses_clock() {
    let mut session = EditorSession::new("").with_clock(fixed_clock);
    let effects = session.dispatch("insertDate", None);
    assert_eq!(session.text(), "2024-03-05 14:07:09");
    assert_eq!(status(&effects), Some("Inserted current date"));
}

#[test]
fn test_unknown_action_reports_and_leaves_buffer() {
    let mut session = EditorSession::new("keep");
    let effects = session.dispatch("screenKeyboard", None);
    assert_eq!(status(&effects), Some("Unknown action: screenKeyboard"));
    assert_eq!(session.text(), "keep");
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_host_actions_only_return_effects() {
    let mut session = EditorSession::new("x");
    assert_eq!(session.dispatch("saveFile", None), vec![Effect::Save]);
    assert_eq!(session.dispatch("openFile", None), vec![Effect::Open]);
    assert_eq!(session.dispatch("exitApp", None), vec![Effect::Exit]);
    assert_eq!(
        session.dispatch("findReplace", None),
        vec![Effect::ShowFindReplace]
    );
    assert_eq!(session.dispatch("paste", None), vec![Effect::ReadClipboard]);
    assert_eq!(session.text(), "x");
}

// --- Undo / redo ---

#[test]
fn test_undo_redo_round_trip() {
    let mut session = EditorSession::new("");
    session.type_text("one");
    session.type_text(" two");

    let effects = session.dispatch("undo", None);
    assert_eq!(session.text(), "one");
    assert_eq!(
        effects,
        vec![Effect::Status("Undo".to_string()), Effect::SyncPreview]
    );
    assert_eq!(session.overlay().markup(), "one");

    session.dispatch("redo", None);
    assert_eq!(session.text(), "one two");
}

#[test]
fn test_retyping_undone_text_keeps_history_in_step() {
    let mut session = EditorSession::new("");
    session.type_char('a');
    session.type_char('b');
    session.dispatch("undo", None);
    session.type_char('b');
    assert_eq!(session.text(), "ab");
    assert_eq!(session.history().current(), Some("ab"));
    session.dispatch("undo", None);
    assert_eq!(session.text(), "a");
}

#[test]
fn test_undo_at_start_reports_nothing() {
    let mut session = EditorSession::new("start");
    let effects = session.dispatch("undo", None);
    assert_eq!(status(&effects), Some("Nothing to undo"));
    let effects = session.dispatch("redo", None);
    assert_eq!(status(&effects), Some("Nothing to redo"));
    assert_eq!(session.text(), "start");
}

#[test]
fn test_undo_reaches_initial_text() {
    let mut session = EditorSession::new("base");
    session.move_to_end(false);
    session.type_char('!');
    session.dispatch("undo", None);
    assert_eq!(session.text(), "base");
}

#[test]
fn test_new_file_resets_history() {
    let mut session = EditorSession::new("old");
    session.type_text("er");
    let effects = session.dispatch("newFile", None);
    assert_eq!(effects[0], Effect::NewDocument);
    assert_eq!(status(&effects), Some("New file created"));
    assert_eq!(session.text(), "");
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().current(), Some(""));
    assert!(!session.is_dirty());
    assert_eq!(session.overlay().markup(), "\n");
}

#[test]
fn test_clear_resets_history() {
    let mut session = EditorSession::new("text");
    let effects = session.dispatch("clear", None);
    assert_eq!(status(&effects), Some("Cleared"));
    assert_eq!(session.history().len(), 1);
    assert_eq!(status(&session.dispatch("undo", None)), Some("Nothing to undo"));
}

#[test]
fn test_history_limit_is_configurable() {
    let mut session = EditorSession::with_history_limit("", 3);
    for ch in "abcdef".chars() {
        session.type_char(ch);
    }
    assert_eq!(session.history().len(), 3);
}

// --- Clipboard ---

#[test]
fn test_cut_removes_and_copies() {
    let mut session = EditorSession::new("hello world");
    session.set_selection(5, 11);
    let effects = session.dispatch("cut", None);
    assert_eq!(session.text(), "hello");
    assert_eq!(effects[0], Effect::CopyToClipboard(" world".to_string()));
    assert_eq!(status(&effects), Some("Cut to clipboard"));
    assert_eq!(session.history().current(), Some("hello"));
}

#[test]
fn test_cut_and_copy_without_selection_do_nothing() {
    let mut session = EditorSession::new("hello");
    assert!(session.dispatch("cut", None).is_empty());
    assert!(session.dispatch("copy", None).is_empty());
    assert_eq!(session.text(), "hello");
}

#[test]
fn test_copy_leaves_buffer() {
    let mut session = EditorSession::new("hello");
    session.set_selection(0, 2);
    let effects = session.dispatch("copy", None);
    assert_eq!(effects[0], Effect::CopyToClipboard("he".to_string()));
    assert_eq!(session.text(), "hello");
}

#[test]
fn test_paste_replaces_selection() {
    let mut session = EditorSession::new("a-b");
    session.set_selection(1, 2);
    let effects = session.paste(Ok("+++".to_string()));
    assert_eq!(session.text(), "a+++b");
    assert_eq!(session.buffer().selection(), Selection::caret(4));
    assert_eq!(status(&effects), Some("Pasted from clipboard"));
}

#[test]
fn test_failed_paste_keeps_buffer() {
    let mut session = EditorSession::new("a-b");
    let effects = session.paste(Err("clipboard is empty".to_string()));
    assert_eq!(session.text(), "a-b");
    assert_eq!(
        effects,
        vec![Effect::Status(
            "Failed to paste: clipboard is empty".to_string()
        )]
    );
}

// --- Find / replace ---

#[test]
fn test_find_empty_query_asks_for_text() {
    let mut session = EditorSession::new("abc");
    for action in ["find", "replace", "replaceAll", "findNext"] {
        let effects = session.dispatch(action, None);
        assert_eq!(status(&effects), Some("Please enter text to find"));
    }
}

#[test]
fn test_find_selects_first_match() {
    let mut session = session_with_find("x cat cat", "cat", "");
    session.move_to_end(false);
    let effects = session.dispatch("find", None);
    assert_eq!(session.buffer().selection(), Selection::new(2, 5));
    assert_eq!(status(&effects), Some("Found text"));
}

#[test]
fn test_find_whole_word_skips_embedded_match() {
    let mut session = session_with_find("concatenate cat", "cat", "");
    session.dispatch("toggleWholeWord", None);
    session.dispatch("find", None);
    assert_eq!(session.buffer().selection(), Selection::new(12, 15));
}

#[test]
fn test_find_miss_reports_not_found() {
    let mut session = session_with_find("abc", "zzz", "");
    let effects = session.dispatch("find", None);
    assert_eq!(status(&effects), Some("Text not found"));
}

#[test]
fn test_find_uses_char_offsets_after_multibyte_text() {
    let mut session = session_with_find("héllo wörld", "wörld", "");
    session.dispatch("find", None);
    assert_eq!(session.buffer().selection(), Selection::new(6, 11));
    assert_eq!(session.buffer().selected_text(), "wörld");
}

#[test]
fn test_find_next_advances_and_wraps() {
    let mut session = session_with_find("ab ab ab", "ab", "");
    session.dispatch("find", None);
    session.dispatch("findNext", None);
    assert_eq!(session.buffer().selection(), Selection::new(3, 5));
    session.dispatch("findNext", None);
    session.dispatch("findNext", None);
    assert_eq!(session.buffer().selection(), Selection::new(0, 2));
}

#[test]
fn test_replace_selected_match() {
    let mut session = session_with_find("cat dog", "cat", "bird");
    session.set_selection(0, 3);
    let effects = session.dispatch("replace", None);
    assert_eq!(session.text(), "bird dog");
    assert_eq!(session.buffer().selection(), Selection::caret(4));
    assert_eq!(status(&effects), Some("Replaced"));
}

#[test]
fn test_replace_requires_selection_equal_to_query() {
    let mut session = session_with_find("CAT dog", "cat", "bird");
    session.set_selection(0, 3);
    let effects = session.dispatch("replace", None);
    // case-insensitive find reselects "CAT", which still differs from "cat"
    assert_eq!(session.text(), "CAT dog");
    assert_eq!(session.buffer().selected_text(), "CAT");
    assert_eq!(effects, vec![Effect::Status("Found text".to_string())]);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_replace_finds_then_retries_once() {
    let mut session = session_with_find("dog cat cat", "cat", "bird");
    let effects = session.dispatch("replace", None);
    assert_eq!(session.text(), "dog bird cat");
    assert_eq!(
        effects,
        vec![
            Effect::Status("Found text".to_string()),
            Effect::Status("Replaced".to_string()),
            Effect::SyncPreview,
        ]
    );
}

#[test]
fn test_replace_without_match_drops_silently() {
    let mut session = session_with_find("dog", "cat", "bird");
    let effects = session.dispatch("replace", None);
    assert_eq!(session.text(), "dog");
    assert_eq!(status(&effects), Some("Text not found"));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_replace_all_reports_change() {
    let mut session = session_with_find("cat cat dog", "cat", "bird");
    session.dispatch("toggleCaseSensitive", None);
    let effects = session.dispatch("replaceAll", None);
    assert_eq!(session.text(), "bird bird dog");
    assert_eq!(status(&effects), Some("Replaced all occurrences"));
    session.dispatch("undo", None);
    assert_eq!(session.text(), "cat cat dog");
}

#[test]
fn test_replace_all_unchanged_reports_none() {
    let mut session = session_with_find("cat", "cat", "cat");
    let effects = session.dispatch("replaceAll", None);
    assert_eq!(status(&effects), Some("No occurrences found"));
    assert_eq!(session.history().len(), 1);
}

// --- Keyboard and documents ---

#[test]
fn test_keyboard_keys() {
    let mut session = EditorSession::new("");
    session.dispatch("keyboardKey", Some("a"));
    session.dispatch("keyboardKey", Some("Space"));
    session.dispatch("keyboardKey", Some("Tab"));
    session.dispatch("keyboardKey", Some("Enter"));
    assert_eq!(session.text(), "a     \n");
    session.dispatch("keyboardKey", Some("Backspace"));
    assert_eq!(session.text(), "a     ");
}

#[test]
fn test_backspace_at_start_records_nothing() {
    let mut session = EditorSession::new("");
    assert!(session.delete_back().is_empty());
    assert!(session.delete_forward().is_empty());
}

#[test]
fn test_replace_document_is_one_undo_step() {
    let mut session = EditorSession::new("first");
    session.replace_document("second");
    assert!(!session.is_dirty());
    assert_eq!(session.buffer().selection(), Selection::caret(0));
    session.dispatch("undo", None);
    assert_eq!(session.text(), "first");
}

#[test]
fn test_typing_marks_dirty_until_saved() {
    let mut session = EditorSession::new("");
    session.type_char('x');
    assert!(session.is_dirty());
    session.mark_saved();
    assert!(!session.is_dirty());
}

#[test]
fn test_sync_scroll_reaches_overlay() {
    let mut session = EditorSession::new("a\nb\nc");
    session.sync_scroll(2);
    assert_eq!(session.overlay().scroll_top(), 2);
}
