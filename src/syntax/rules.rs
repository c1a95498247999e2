//! Pattern rules for markdown highlighting
//!
//! A pattern rule is a named, compiled regex. Document-scoped rules scan
//! the whole text; line-scoped rules are run against each line of a
//! `LineIndex` and report offsets in document coordinates.

use regex::{Captures, Regex};

use super::lines::LineIndex;

/// A compiled pattern rule
pub struct PatternRule {
    /// Name for debugging
    pub name: &'static str,
    /// Compiled regex pattern
    pub pattern: Regex,
}

impl PatternRule {
    /// Compile a new pattern rule
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Compile a built-in rule, panicking on a malformed pattern
    pub(crate) fn builtin(name: &'static str, pattern: &str) -> Self {
        match Self::new(name, pattern) {
            Ok(rule) => rule,
            Err(e) => panic!("built-in pattern {name:?} failed to compile: {e}"),
        }
    }

    /// Iterate over all non-overlapping matches in text as `(start, end)`
    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = (usize, usize)> + 't {
        self.pattern.find_iter(text).map(|m| (m.start(), m.end()))
    }

    /// Iterate over all non-overlapping capture sets in text
    pub fn captures_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Captures<'t>> + 't {
        self.pattern.captures_iter(text)
    }

    /// Check whether the pattern matches anywhere in text
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Match against each line, yielding the line's start offset and captures
    ///
    /// Patterns run per line can never match across a line break.
    pub fn captures_by_line<'t>(
        &'t self,
        lines: &'t LineIndex<'t>,
    ) -> impl Iterator<Item = (usize, Captures<'t>)> + 't {
        lines
            .lines()
            .filter_map(move |(start, line)| self.pattern.captures(line).map(|caps| (start, caps)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_iter() {
        let rule = PatternRule::new("number", r"\d+").unwrap();
        let found: Vec<_> = rule.find_iter("abc 123 def 4").collect();
        assert_eq!(found, vec![(4, 7), (12, 13)]);
        assert_eq!(rule.find_iter("no numbers").count(), 0);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternRule::new("broken", r"(unclosed").is_err());
    }

    #[test]
    #[should_panic(expected = "failed to compile")]
    fn test_builtin_panics_on_bad_pattern() {
        PatternRule::builtin("broken", r"[");
    }

    #[test]
    fn test_captures_by_line_uses_document_offsets() {
        let rule = PatternRule::new("word", r"^(\w+)$").unwrap();
        let lines = LineIndex::new("one\n--\nthree");
        let found: Vec<_> = rule
            .captures_by_line(&lines)
            .map(|(start, caps)| (start, caps.get(1).map(|m| m.as_str()).unwrap_or("")))
            .collect();
        assert_eq!(found, vec![(0, "one"), (7, "three")]);
    }
}
