//! Literal find and replace over whole-buffer text.
//!
//! Queries are always escaped before compiling, so every query matches
//! literally; case sensitivity and whole-word matching are the only knobs.
//! All ranges returned here are byte ranges into the searched text.

use std::ops::Range;

use regex::{NoExpand, Regex, RegexBuilder};

/// A find query and its matching options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindSpec {
    pub query: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

/// Outcome of [`FindSpec::replace_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceAll {
    pub text: String,
    pub count: usize,
}

impl ReplaceAll {
    pub const fn changed(&self) -> bool {
        self.count > 0
    }
}

impl FindSpec {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub const fn with_whole_word(mut self, whole_word: bool) -> Self {
        self.whole_word = whole_word;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// The regex source for this query, before case folding.
    pub fn pattern(&self) -> String {
        let escaped = regex::escape(&self.query);
        if self.whole_word {
            format!(r"\b{escaped}\b")
        } else {
            escaped
        }
    }

    /// Compile the query.
    ///
    /// Escaping makes syntax errors impossible; the only failure left is
    /// the regex size limit on very long queries.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        build(&self.pattern(), self.case_sensitive)
    }

    /// First match from the start of `text`.
    pub fn find_first(&self, text: &str) -> Result<Option<Range<usize>>, regex::Error> {
        let re = self.compile()?;
        Ok(re.find(text).map(|m| m.range()))
    }

    /// First match at or after byte offset `from`, wrapping to the start
    /// when nothing follows.
    pub fn find_next(
        &self,
        text: &str,
        from: usize,
    ) -> Result<Option<Range<usize>>, regex::Error> {
        let re = self.compile()?;
        let from = floor_char_boundary(text, from);
        Ok(re
            .find_at(text, from)
            .or_else(|| re.find(text))
            .map(|m| m.range()))
    }

    /// Replace every non-overlapping match in one pass. The replacement is
    /// inserted literally; `$` carries no group meaning.
    pub fn replace_all(&self, text: &str, replacement: &str) -> Result<ReplaceAll, regex::Error> {
        let re = self.compile()?;
        let count = re.find_iter(text).count();
        if count == 0 {
            return Ok(ReplaceAll {
                text: text.to_string(),
                count,
            });
        }
        let text = re.replace_all(text, NoExpand(replacement)).into_owned();
        Ok(ReplaceAll { text, count })
    }
}

fn build(pattern: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_is_case_insensitive_by_default() {
        let spec = FindSpec::new("Cat");
        assert_eq!(spec.find_first("the CAT sat").unwrap(), Some(4..7));
    }

    #[test]
    fn test_find_first_case_sensitive_skips_other_case() {
        let spec = FindSpec::new("cat").with_case_sensitive(true);
        assert_eq!(spec.find_first("Cat cat").unwrap(), Some(4..7));
    }

    #[test]
    fn test_whole_word_skips_embedded_match() {
        let spec = FindSpec::new("cat").with_whole_word(true);
        assert_eq!(spec.find_first("concatenate cat").unwrap(), Some(12..15));
    }

    #[test]
    fn test_query_metacharacters_match_literally() {
        let spec = FindSpec::new("a.b(c)*");
        assert_eq!(spec.find_first("axb a.b(c)*").unwrap(), Some(4..11));
        assert_eq!(spec.find_first("aXb(c)").unwrap(), None);
    }

    #[test]
    fn test_find_next_wraps_to_start() {
        let spec = FindSpec::new("ab");
        let text = "ab xx ab";
        assert_eq!(spec.find_next(text, 1).unwrap(), Some(6..8));
        assert_eq!(spec.find_next(text, 7).unwrap(), Some(0..2));
    }

    #[test]
    fn test_find_next_clamps_inside_multibyte_char() {
        let spec = FindSpec::new("é");
        assert_eq!(spec.find_next("éé", 1).unwrap(), Some(0..2));
    }

    #[test]
    fn test_replace_all_replaces_every_match() {
        let spec = FindSpec::new("cat");
        let result = spec.replace_all("cat cat dog", "bird").unwrap();
        assert_eq!(result.text, "bird bird dog");
        assert_eq!(result.count, 2);
        assert!(result.changed());
    }

    #[test]
    fn test_replace_all_without_match_is_unchanged() {
        let spec = FindSpec::new("fish");
        let result = spec.replace_all("cat cat dog", "bird").unwrap();
        assert_eq!(result.text, "cat cat dog");
        assert!(!result.changed());
    }

    #[test]
    fn test_replace_all_replacement_is_literal() {
        let spec = FindSpec::new("x");
        let result = spec.replace_all("x y", "$1${0}").unwrap();
        assert_eq!(result.text, "$1${0} y");
    }

    #[test]
    fn test_replace_all_does_not_rescan_replacement() {
        let spec = FindSpec::new("a");
        let result = spec.replace_all("aa", "aa").unwrap();
        assert_eq!(result.text, "aaaa");
        assert_eq!(result.count, 2);
    }
}
