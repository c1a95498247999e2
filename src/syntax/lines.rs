//! Line index over a text snapshot
//!
//! Built once per highlight pass and shared by every line-scoped rule.
//! Lines are split on `\n`; the content of a line excludes the `\n` and
//! a single trailing `\r`.

use std::ops::Range;

/// Start offsets of every line in a text
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset of the first byte of each line
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Index the lines of `text`
    pub fn new(text: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, starts }
    }

    /// Number of lines (an empty text has one empty line)
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Always false: an empty text still has one empty line
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Byte offset where a line starts
    pub fn line_start(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or(self.text.len())
    }

    /// Byte range of a line's content, excluding the line terminator
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let start = self.line_start(line);
        let mut end = match self.starts.get(line + 1) {
            Some(&next) => next - 1,
            None => self.text.len(),
        };
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        start..end
    }

    /// Content of a line, excluding the line terminator
    pub fn line(&self, line: usize) -> &'a str {
        &self.text[self.line_range(line)]
    }

    /// Iterate over `(line start offset, line content)` pairs
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        (0..self.len()).map(move |i| (self.line_start(i), self.line(i)))
    }

    /// Line containing a byte offset
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    /// Convert a byte offset to a count of Unicode scalar values
    pub fn char_offset(&self, byte: usize) -> usize {
        let byte = floor_char_boundary(self.text, byte);
        self.text[..byte].chars().count()
    }

    /// Convert a byte offset to a count of UTF-16 code units
    pub fn utf16_offset(&self, byte: usize) -> usize {
        let byte = floor_char_boundary(self.text, byte);
        self.text[..byte].chars().map(char::len_utf16).sum()
    }

    /// Convert a UTF-16 code unit offset back to a byte offset
    ///
    /// Offsets inside a surrogate pair snap forward to the next char.
    pub fn byte_from_utf16(&self, utf16: usize) -> usize {
        let mut units = 0;
        for (byte, ch) in self.text.char_indices() {
            if units >= utf16 {
                return byte;
            }
            units += ch.len_utf16();
        }
        self.text.len()
    }
}

/// Find the nearest valid UTF-8 boundary at or before `pos`
fn floor_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    (0..=pos).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
