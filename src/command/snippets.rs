//! Fixed HTML templates inserted at the caret.

use super::{InputKind, MetaKind};

pub const FORM: &str = "\n<form action=\"#\" method=\"post\">\n  <!-- Form content here -->\n</form>\n";

pub const SELECT: &str =
    "\n<select name=\"\">\n  <option value=\"\">Select option</option>\n</select>\n";

pub const OPTION: &str = "  <option value=\"\">Option text</option>";

pub const TEXTAREA: &str = "\n<textarea name=\"\" rows=\"4\" cols=\"50\"></textarea>\n";

pub const VIDEO: &str = "\n<video width=\"320\" height=\"240\" controls>\n  <source src=\"movie.mp4\" type=\"video/mp4\">\n  Your browser does not support the video tag.\n</video>\n";

pub const AUDIO: &str = "\n<audio controls>\n  <source src=\"audio.mp3\" type=\"audio/mpeg\">\n  Your browser does not support the audio element.\n</audio>\n";

/// Spaces inserted for a Tab key.
pub const TAB: &str = "    ";

pub fn input(kind: InputKind) -> String {
    format!("<input type=\"{}\" name=\"\" value=\"\">", kind.as_str())
}

pub const fn meta(kind: MetaKind) -> &'static str {
    match kind {
        MetaKind::Description => "<meta name=\"description\" content=\"Page description\">",
        MetaKind::Author => "<meta name=\"author\" content=\"Author name\">",
    }
}

/// Starter document loaded when no file is given.
pub const DEFAULT_DOCUMENT: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Untitled</title>
</head>
<body>
    <h1>Hello</h1>
    <p>Start editing.</p>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_snippet_names_type() {
        assert_eq!(
            input(InputKind::Checkbox),
            "<input type=\"checkbox\" name=\"\" value=\"\">"
        );
    }

    #[test]
    fn test_block_snippets_are_framed_by_newlines() {
        for snippet in [FORM, SELECT, TEXTAREA, VIDEO, AUDIO] {
            assert!(snippet.starts_with('\n'));
            assert!(snippet.ends_with('\n'));
        }
        assert!(!OPTION.contains('\n'));
    }
}
