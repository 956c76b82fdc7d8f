//! Syntax highlighting for the editor overlay.
//!
//! The overlay is a read-only copy of the buffer drawn behind the editable
//! text. [`render`] produces HTML markup for hosts that display markup;
//! [`highlight_lines`] produces the same tokens split into lines for the
//! terminal view.
//!
//! Tokenizing is a single leftmost-first pass over the text, so a token can
//! never be re-matched inside markup emitted for an earlier token.

use std::ops::Range;
use std::sync::{LazyLock, Mutex, OnceLock};

use regex::Regex;

/// Keywords tagged as whole words.
pub const KEYWORDS: [&str; 6] = ["function", "return", "if", "else", "for", "while"];

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<string>"(?:[^"\\]|\\.)*")"#,
        r"|(?P<comment>//.*)",
        r"|\b(?P<keyword>function|return|if|else|for|while)\b",
    ))
    .expect("token pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Double-quoted string literal, backslash escapes honored.
    String,
    /// `//` to end of line.
    Comment,
    Keyword,
}

impl TokenKind {
    /// Inline CSS for this token in overlay markup.
    pub const fn css(self) -> &'static str {
        match self {
            Self::String => "color:#d73a49;text-shadow: 0 0 7px yellow;font-weight:700;",
            Self::Comment => "color:blue;font-weight:500;text-shadow: 0 0 8px cyan",
            Self::Keyword => "color:white;text-shadow: 0 0 3px #ff0000, 0 0 5px #ff00ff;",
        }
    }
}

/// A highlighted span as a byte range into the tokenized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

/// A run of text on one line, optionally tagged with a token kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: Option<TokenKind>,
    pub text: String,
}

/// Find all tokens in `text`, in order and non-overlapping.
pub fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let (kind, m) = if let Some(m) = caps.name("string") {
                (TokenKind::String, m)
            } else if let Some(m) = caps.name("comment") {
                (TokenKind::Comment, m)
            } else {
                (TokenKind::Keyword, caps.name("keyword")?)
            };
            Some(Token {
                kind,
                range: m.range(),
            })
        })
        .collect()
}

/// Escape the three HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render buffer text as overlay markup.
///
/// Escaping runs first over the whole text; tokens are then found in the
/// escaped text and wrapped in styled spans.
pub fn render(text: &str) -> String {
    let escaped = escape_html(text);
    let tokens = tokenize(&escaped);
    let mut out = String::with_capacity(escaped.len() + tokens.len() * 64);
    let mut last = 0;
    for token in tokens {
        out.push_str(&escaped[last..token.range.start]);
        out.push_str("<span style=\"");
        out.push_str(token.kind.css());
        out.push_str("\">");
        out.push_str(&escaped[token.range.clone()]);
        out.push_str("</span>");
        last = token.range.end;
    }
    out.push_str(&escaped[last..]);
    out
}

/// Like [`render`], but never empty: an empty buffer yields a single
/// newline so the overlay keeps its height.
pub fn render_overlay(text: &str) -> String {
    let markup = render(text);
    if markup.is_empty() {
        "\n".to_string()
    } else {
        markup
    }
}

/// Tokenize raw text and split the result into lines of segments.
///
/// Tokens spanning a newline (multi-line strings) are split at the line
/// break and keep their kind on both sides.
pub fn highlight_lines(text: &str) -> Vec<Vec<Segment>> {
    let mut lines: Vec<Vec<Segment>> = vec![Vec::new()];
    let mut last = 0;
    for token in tokenize(text) {
        push_segments(&mut lines, None, &text[last..token.range.start]);
        push_segments(&mut lines, Some(token.kind), &text[token.range.clone()]);
        last = token.range.end;
    }
    push_segments(&mut lines, None, &text[last..]);
    lines
}

fn push_segments(lines: &mut Vec<Vec<Segment>>, kind: Option<TokenKind>, chunk: &str) {
    let mut parts = chunk.split('\n');
    if let Some(first) = parts.next() {
        push_segment(lines, kind, first);
    }
    for part in parts {
        lines.push(Vec::new());
        push_segment(lines, kind, part);
    }
}

fn push_segment(lines: &mut [Vec<Segment>], kind: Option<TokenKind>, text: &str) {
    let text = text.strip_suffix('\r').unwrap_or(text);
    if text.is_empty() {
        return;
    }
    if let Some(line) = lines.last_mut() {
        line.push(Segment {
            kind,
            text: text.to_string(),
        });
    }
}

/// Cached overlay state kept in sync with the buffer.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    markup: String,
    lines: Vec<Vec<Segment>>,
    scroll_top: usize,
}

impl Overlay {
    pub fn new(text: &str) -> Self {
        let mut overlay = Self::default();
        overlay.refresh(text);
        overlay
    }

    /// Re-render after a text change.
    pub fn refresh(&mut self, text: &str) {
        let _scope = crate::perf::scope("highlight.overlay.refresh");
        self.markup = render_overlay(text);
        self.lines = highlight_lines(text);
    }

    /// Mirror the editor's scroll offset.
    pub const fn sync_scroll(&mut self, scroll_top: usize) {
        self.scroll_top = scroll_top;
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn lines(&self) -> &[Vec<Segment>] {
        &self.lines
    }

    pub const fn scroll_top(&self) -> usize {
        self.scroll_top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

/// Force the terminal palette used for token colors.
pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

/// Whether token colors should target a light terminal background.
pub fn is_light_background() -> bool {
    background_mode() == BackgroundMode::Light
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return match mode {
            HighlightBackground::Light => BackgroundMode::Light,
            HighlightBackground::Dark => BackgroundMode::Dark,
        };
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return BackgroundMode::Dark;
    };

    if bg >= 7 {
        BackgroundMode::Light
    } else {
        BackgroundMode::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(kind: TokenKind, text: &str) -> String {
        format!("<span style=\"{}\">{text}</span>", kind.css())
    }

    #[test]
    fn test_render_is_deterministic() {
        let text = "function f() { return \"x\"; } // done";
        assert_eq!(render(text), render(text));
    }

    #[test]
    fn test_render_escapes_before_tagging() {
        let out = render("<div>\"a&b\"</div>");
        let expected = format!(
            "&lt;div&gt;{}&lt;/div&gt;",
            span(TokenKind::String, "\"a&amp;b\"")
        );
        assert_eq!(out, expected);
        assert!(!out.contains("<div>"));
    }

    #[test]
    fn test_render_plain_text_is_only_escaped() {
        assert_eq!(render("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_render_tags_keywords_as_whole_words() {
        let out = render("if iffy");
        assert_eq!(out, format!("{} iffy", span(TokenKind::Keyword, "if")));
    }

    #[test]
    fn test_render_tags_comment_to_end_of_line() {
        let out = render("x = 1; // note\nwhile");
        assert_eq!(
            out,
            format!(
                "x = 1; {}\n{}",
                span(TokenKind::Comment, "// note"),
                span(TokenKind::Keyword, "while")
            )
        );
    }

    #[test]
    fn test_string_honors_escaped_quotes() {
        let tokens = tokenize(r#"say "a \"quoted\" word" now"#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].range, 4..23);
    }

    #[test]
    fn test_keyword_inside_string_is_not_tagged_twice() {
        let out = render("\"return if\"");
        assert_eq!(out, span(TokenKind::String, "\"return if\""));
    }

    #[test]
    fn test_comment_containing_string_is_one_token() {
        let tokens = tokenize("// \"quoted\" for");
        assert_eq!(
            tokens,
            vec![Token {
                kind: TokenKind::Comment,
                range: 0..15,
            }]
        );
    }

    #[test]
    fn test_url_in_string_is_not_a_comment() {
        let tokens = tokenize("\"http://x\" // real");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[1].kind, TokenKind::Comment);
    }

    #[test]
    fn test_render_overlay_never_empty() {
        assert_eq!(render(""), "");
        assert_eq!(render_overlay(""), "\n");
        assert_eq!(render_overlay("x"), "x");
    }

    #[test]
    fn test_highlight_lines_splits_multiline_string() {
        let lines = highlight_lines("a \"b\nc\" d");
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            vec![
                Segment {
                    kind: None,
                    text: "a ".to_string()
                },
                Segment {
                    kind: Some(TokenKind::String),
                    text: "\"b".to_string()
                },
            ]
        );
        assert_eq!(lines[1][0].kind, Some(TokenKind::String));
        assert_eq!(lines[1][0].text, "c\"");
        assert_eq!(lines[1][1].kind, None);
    }

    #[test]
    fn test_highlight_lines_keeps_empty_lines() {
        let lines = highlight_lines("a\n\nb\n");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].is_empty());
        assert!(lines[3].is_empty());
    }

    #[test]
    fn test_overlay_tracks_scroll_and_text() {
        let mut overlay = Overlay::new("");
        assert_eq!(overlay.markup(), "\n");
        overlay.refresh("for");
        assert_eq!(overlay.markup(), span(TokenKind::Keyword, "for"));
        overlay.sync_scroll(12);
        assert_eq!(overlay.scroll_top(), 12);
    }

    #[test]
    fn test_colorfgbg_dark_background() {
        let mode = background_mode_from_colorfgbg(Some("15;0"));
        assert_eq!(mode, BackgroundMode::Dark);
    }

    #[test]
    fn test_colorfgbg_light_background() {
        let mode = background_mode_from_colorfgbg(Some("0;15"));
        assert_eq!(mode, BackgroundMode::Light);
    }

    #[test]
    fn test_background_override_light() {
        set_background_mode(Some(HighlightBackground::Light));
        assert!(is_light_background());
        set_background_mode(None);
    }
}
