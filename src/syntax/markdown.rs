//! Markdown highlighting rules
//!
//! Twelve independent scans, run in a fixed order. Each one appends spans
//! for its construct class; a later span overrides an earlier one only on
//! the attributes it writes. Two overlaps are intentional and kept as-is:
//! text inside `**bold**` also matches the single-asterisk italic pattern,
//! and the `[alt](target)` tail of an image also matches the link pattern.

use once_cell::sync::Lazy;

use super::construct::Construct;
use super::lines::LineIndex;
use super::rules::PatternRule;
use super::style::{Span, Style, StylePatch};
use super::theme::Theme;

/// Compiled built-in patterns, shared by every pass
struct MarkdownPatterns {
    header: PatternRule,
    bold: PatternRule,
    italic: PatternRule,
    strikethrough: PatternRule,
    inline_code: PatternRule,
    blockquote: PatternRule,
    table_separator: PatternRule,
    image: PatternRule,
    link: PatternRule,
    list: PatternRule,
}

impl MarkdownPatterns {
    fn compile() -> Self {
        Self {
            // line-scoped
            header: PatternRule::builtin("header", r"^(#{1,6})[ \t]+(.*)$"),
            blockquote: PatternRule::builtin("blockquote", r"^([ \t]*>+[ \t]?)(.*)$"),
            table_separator: PatternRule::builtin(
                "table_separator",
                r"^\s*\|?\s*[-:]+\s*(\|\s*[-:]+\s*)*\|?\s*$",
            ),
            list: PatternRule::builtin("list", r"^([ \t]*)([-*+]|\d+\.)[ \t]+"),
            // document-scoped; `.` and the negated classes never cross a newline
            bold: PatternRule::builtin("bold", r"\*\*(.*?)\*\*"),
            italic: PatternRule::builtin("italic", r"\*(.*?)\*"),
            strikethrough: PatternRule::builtin("strikethrough", r"~~(.*?)~~"),
            inline_code: PatternRule::builtin("inline_code", r"`([^`\n]+)`"),
            image: PatternRule::builtin("image", r"!\[([^\]\n]*)\]\(([^)\n]+)\)"),
            link: PatternRule::builtin("link", r"\[([^\]\n]+)\]\(([^)\n]+)\)"),
        }
    }
}

static PATTERNS: Lazy<MarkdownPatterns> = Lazy::new(MarkdownPatterns::compile);

/// Everything a rule needs for one pass over a snapshot
pub struct PassContext<'a> {
    pub text: &'a str,
    pub lines: LineIndex<'a>,
    pub theme: &'a Theme,
    /// Base font size in points
    pub font_size: u16,
}

impl<'a> PassContext<'a> {
    pub fn new(text: &'a str, theme: &'a Theme, font_size: u16) -> Self {
        Self {
            text,
            lines: LineIndex::new(text),
            theme,
            font_size,
        }
    }

    /// Style every byte starts from
    pub fn base_style(&self) -> Style {
        Style {
            fg: self.theme.text,
            bg: None,
            bold: false,
            italic: false,
            monospace: true,
            underline: false,
            strikethrough: false,
            size: self.font_size,
        }
    }

    /// Header font size: larger for low levels, never below the base size
    fn header_size(&self, level: usize) -> u16 {
        let shrink = 2 * level.min(6) as u16;
        self.font_size.saturating_add(4).saturating_sub(shrink).max(self.font_size)
    }

    /// Code is set one point smaller than body text
    fn code_size(&self) -> u16 {
        self.font_size.saturating_sub(1).max(1)
    }

    fn paint(&self, construct: Construct) -> StylePatch {
        StylePatch::paint(self.theme.paint(construct))
    }

    fn code_patch(&self) -> StylePatch {
        self.paint(Construct::InlineCode)
            .with_monospace()
            .with_size(self.code_size())
    }
}

/// Highlighting rules in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Base,
    Headers,
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    CodeBlocks,
    Blockquotes,
    Tables,
    Images,
    Links,
    Lists,
}

impl Rule {
    /// The fixed order rules are applied in
    pub const ORDER: [Rule; 12] = [
        Rule::Base,
        Rule::Headers,
        Rule::Bold,
        Rule::Italic,
        Rule::Strikethrough,
        Rule::InlineCode,
        Rule::CodeBlocks,
        Rule::Blockquotes,
        Rule::Tables,
        Rule::Images,
        Rule::Links,
        Rule::Lists,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::Base => "base",
            Rule::Headers => "headers",
            Rule::Bold => "bold",
            Rule::Italic => "italic",
            Rule::Strikethrough => "strikethrough",
            Rule::InlineCode => "inline_code",
            Rule::CodeBlocks => "code_blocks",
            Rule::Blockquotes => "blockquotes",
            Rule::Tables => "tables",
            Rule::Images => "images",
            Rule::Links => "links",
            Rule::Lists => "lists",
        }
    }

    /// Run this rule over a pass, appending its spans
    pub fn apply(&self, pass: &PassContext<'_>, out: &mut Vec<Span>) {
        match self {
            Rule::Base => base(pass, out),
            Rule::Headers => headers(pass, out),
            Rule::Bold => bold(pass, out),
            Rule::Italic => italic(pass, out),
            Rule::Strikethrough => strikethrough(pass, out),
            Rule::InlineCode => inline_code(pass, out),
            Rule::CodeBlocks => code_blocks(pass, out),
            Rule::Blockquotes => blockquotes(pass, out),
            Rule::Tables => tables(pass, out),
            Rule::Images => images(pass, out),
            Rule::Links => links(pass, out),
            Rule::Lists => lists(pass, out),
        }
    }
}

fn base(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    out.push(Span::new(
        0,
        pass.text.len(),
        Construct::Text,
        StylePatch::full(pass.base_style()),
    ));
}

fn headers(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    for (start, caps) in PATTERNS.header.captures_by_line(&pass.lines) {
        let (Some(whole), Some(marker)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let level = marker.len();
        let patch = StylePatch::fg(pass.theme.header_color(level))
            .with_bold()
            .with_size(pass.header_size(level));
        out.push(Span::new(start + whole.start(), start + whole.end(), Construct::Header, patch));
    }
}

fn bold(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let patch = pass.paint(Construct::Bold).with_bold();
    for (start, end) in PATTERNS.bold.find_iter(pass.text) {
        out.push(Span::new(start, end, Construct::Bold, patch));
    }
}

fn italic(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let patch = pass.paint(Construct::Italic).with_italic();
    for (start, end) in PATTERNS.italic.find_iter(pass.text) {
        out.push(Span::new(start, end, Construct::Italic, patch));
    }
}

fn strikethrough(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let patch = pass.paint(Construct::Strikethrough).with_strikethrough();
    for (start, end) in PATTERNS.strikethrough.find_iter(pass.text) {
        out.push(Span::new(start, end, Construct::Strikethrough, patch));
    }
}

fn inline_code(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let patch = pass.code_patch();
    for (start, end) in PATTERNS.inline_code.find_iter(pass.text) {
        out.push(Span::new(start, end, Construct::InlineCode, patch));
    }
}

/// A fence line toggles the in-block state; only closed blocks are styled.
fn code_blocks(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let patch = pass.code_patch();
    let mut open: Option<usize> = None;
    for line in 0..pass.lines.len() {
        if !pass.lines.line(line).trim_start().starts_with("```") {
            continue;
        }
        let range = pass.lines.line_range(line);
        match open.take() {
            None => open = Some(range.start),
            Some(start) => out.push(Span::new(start, range.end, Construct::CodeBlock, patch)),
        }
    }
}

fn blockquotes(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let body = pass.paint(Construct::Blockquote);
    let marker = pass.paint(Construct::BlockquoteMarker).with_bold();
    for (start, caps) in PATTERNS.blockquote.captures_by_line(&pass.lines) {
        let (Some(whole), Some(prefix)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(Span::new(start + whole.start(), start + whole.end(), Construct::Blockquote, body));
        out.push(Span::new(
            start + prefix.start(),
            start + prefix.end(),
            Construct::BlockquoteMarker,
            marker,
        ));
    }
}

fn is_separator_row(line: &str) -> bool {
    line.contains('|') && PATTERNS.table_separator.is_match(line)
}

/// Separator rows are styled whole; other rows get their pipes styled, and
/// rows next to a separator are treated as header rows.
fn tables(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let lines = &pass.lines;
    let separators: Vec<bool> = (0..lines.len()).map(|i| is_separator_row(lines.line(i))).collect();
    let table = pass.paint(Construct::Table).with_bold();

    for (i, &is_separator) in separators.iter().enumerate() {
        let line = lines.line(i);
        if !line.contains('|') {
            continue;
        }
        let range = lines.line_range(i);
        if is_separator {
            out.push(Span::new(range.start, range.end, Construct::Table, table));
            continue;
        }

        for (offset, _) in line.match_indices('|') {
            let pos = range.start + offset;
            out.push(Span::new(pos, pos + 1, Construct::Table, table));
        }

        let prev = i.checked_sub(1).is_some_and(|p| separators[p]);
        let next = separators.get(i + 1).copied().unwrap_or(false);
        if prev || next {
            out.push(Span::new(
                range.start,
                range.end,
                Construct::Table,
                StylePatch::default().with_bold(),
            ));
        }
    }
}

fn images(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let body = pass.paint(Construct::Image);
    let marker = pass.paint(Construct::ImageMarker).with_bold();
    for caps in PATTERNS.image.captures_iter(pass.text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push(Span::new(whole.start(), whole.end(), Construct::Image, body));
        out.push(Span::new(whole.start(), whole.start() + 1, Construct::ImageMarker, marker));
        if let Some(alt) = caps.get(1).filter(|m| !m.is_empty()) {
            out.push(Span::new(
                alt.start(),
                alt.end(),
                Construct::Image,
                StylePatch::default().with_italic(),
            ));
        }
    }
}

fn links(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let patch = pass.paint(Construct::Link).with_underline();
    for (start, end) in PATTERNS.link.find_iter(pass.text) {
        out.push(Span::new(start, end, Construct::Link, patch));
    }
}

/// Only the marker prefix is styled, never the item content
fn lists(pass: &PassContext<'_>, out: &mut Vec<Span>) {
    let patch = pass.paint(Construct::ListMarker);
    for (start, caps) in PATTERNS.list.captures_by_line(&pass.lines) {
        if let Some(prefix) = caps.get(0) {
            out.push(Span::new(start + prefix.start(), start + prefix.end(), Construct::ListMarker, patch));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: Rule, text: &str) -> Vec<Span> {
        let theme = Theme::light();
        let pass = PassContext::new(text, &theme, 14);
        let mut out = Vec::new();
        rule.apply(&pass, &mut out);
        out
    }

    fn ranges(spans: &[Span]) -> Vec<(usize, usize)> {
        spans.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_header_size_saturates_at_max_font_size() {
        let theme = Theme::light();
        let pass = PassContext::new("# Title\n###### Six", &theme, u16::MAX);
        let mut out = Vec::new();
        Rule::Headers.apply(&pass, &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| s.style.size == Some(u16::MAX)));
    }

    #[test]
    fn test_patterns_compile() {
        Lazy::force(&PATTERNS);
    }

    #[test]
    fn test_base_covers_document() {
        let spans = run(Rule::Base, "hello\nworld");
        assert_eq!(ranges(&spans), vec![(0, 11)]);
        assert_eq!(spans[0].style.fg, Some(Theme::light().text));
        assert_eq!(spans[0].style.bold, Some(false));

        assert_eq!(ranges(&run(Rule::Base, "")), vec![(0, 0)]);
    }

    #[test]
    fn test_headers() {
        let theme = Theme::light();
        let spans = run(Rule::Headers, "# One\ntext\n### Three\n####### seven");
        assert_eq!(ranges(&spans), vec![(0, 5), (11, 20)]);
        assert_eq!(spans[0].style.fg, Some(theme.headers[0]));
        assert_eq!(spans[1].style.fg, Some(theme.headers[2]));
        assert_eq!(spans[0].style.bold, Some(true));
        assert_eq!(spans[0].style.size, Some(16));
        assert_eq!(spans[1].style.size, Some(14));
    }

    #[test]
    fn test_header_requires_space() {
        assert!(run(Rule::Headers, "#hashtag").is_empty());
        assert!(run(Rule::Headers, "#\nnext").is_empty());
    }

    #[test]
    fn test_bold_does_not_cross_lines() {
        assert!(run(Rule::Bold, "**open\nclose**").is_empty());
        assert_eq!(ranges(&run(Rule::Bold, "a **b** c **d**")), vec![(2, 7), (10, 15)]);
    }

    #[test]
    fn test_italic_matches_inside_bold() {
        // known overlap: the delimiters of a bold run pair up as italics
        assert_eq!(ranges(&run(Rule::Italic, "**bold**")), vec![(0, 2), (6, 8)]);
    }

    #[test]
    fn test_strikethrough() {
        let spans = run(Rule::Strikethrough, "keep ~~gone~~ keep");
        assert_eq!(ranges(&spans), vec![(5, 13)]);
        assert_eq!(spans[0].style.strikethrough, Some(true));
    }

    #[test]
    fn test_inline_code() {
        let spans = run(Rule::InlineCode, "use `foo()` and `bar`; not `a\nb`");
        assert_eq!(ranges(&spans), vec![(4, 11), (16, 21)]);
        assert_eq!(spans[0].style.monospace, Some(true));
        assert_eq!(spans[0].style.bg, Theme::light().code.bg);
        assert_eq!(spans[0].style.size, Some(13));
    }

    #[test]
    fn test_code_block_spans_both_fences() {
        let text = "intro\n```rust\nlet x = 1;\n```\nafter";
        let spans = run(Rule::CodeBlocks, text);
        assert_eq!(ranges(&spans), vec![(6, 28)]);
        assert_eq!(&text[6..28], "```rust\nlet x = 1;\n```");
    }

    #[test]
    fn test_code_block_indented_fence() {
        let spans = run(Rule::CodeBlocks, "  ```\ncode\n  ```");
        assert_eq!(ranges(&spans), vec![(0, 16)]);
    }

    #[test]
    fn test_unterminated_code_block() {
        assert!(run(Rule::CodeBlocks, "```\ncode").is_empty());
        // second block left open
        let spans = run(Rule::CodeBlocks, "```\na\n```\n```\nb");
        assert_eq!(ranges(&spans), vec![(0, 9)]);
    }

    #[test]
    fn test_blockquote_marker_and_body() {
        let theme = Theme::light();
        let spans = run(Rule::Blockquotes, "text\n  >> quoted");
        assert_eq!(ranges(&spans), vec![(5, 16), (5, 10)]);
        assert_eq!(spans[0].construct, Construct::Blockquote);
        assert_eq!(spans[0].style.fg, Some(theme.blockquote.fg));
        assert_eq!(spans[1].construct, Construct::BlockquoteMarker);
        assert_eq!(spans[1].style.fg, Some(theme.blockquote_marker.fg));
        assert_eq!(spans[1].style.bold, Some(true));
    }

    #[test]
    fn test_table_separator_row() {
        let spans = run(Rule::Tables, "| --- | :---: |");
        assert_eq!(ranges(&spans), vec![(0, 15)]);
        assert_eq!(spans[0].style.bold, Some(true));
    }

    #[test]
    fn test_table_pipes_without_separator() {
        let spans = run(Rule::Tables, "a | b | c");
        assert_eq!(ranges(&spans), vec![(2, 3), (6, 7)]);
    }

    #[test]
    fn test_table_header_row_by_adjacency() {
        let text = "| a | b |\n|---|---|\n| 1 | 2 |";
        let spans = run(Rule::Tables, text);
        let whole_rows: Vec<_> = spans
            .iter()
            .filter(|s| s.len() > 1 && s.style.fg.is_none())
            .map(|s| (s.start, s.end))
            .collect();
        // both rows touching the separator are bolded
        assert_eq!(whole_rows, vec![(0, 9), (20, 29)]);
        assert!(spans.iter().any(|s| (s.start, s.end) == (10, 19)));
    }

    #[test]
    fn test_dash_line_without_pipe_is_not_separator() {
        let spans = run(Rule::Tables, "| a | b |\n---");
        assert_eq!(ranges(&spans), vec![(0, 1), (4, 5), (8, 9)]);
    }

    #[test]
    fn test_image_parts() {
        let theme = Theme::light();
        let spans = run(Rule::Images, "![alt](img.png)");
        assert_eq!(ranges(&spans), vec![(0, 15), (0, 1), (2, 5)]);
        assert_eq!(spans[0].style.fg, Some(theme.image.fg));
        assert_eq!(spans[1].style.fg, Some(theme.image_marker.fg));
        assert_eq!(spans[1].style.bold, Some(true));
        assert_eq!(spans[2].style.italic, Some(true));
    }

    #[test]
    fn test_image_empty_alt_has_no_italic() {
        let spans = run(Rule::Images, "![](a.png)");
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_link() {
        let spans = run(Rule::Links, "see [docs](https://example.com) now");
        assert_eq!(ranges(&spans), vec![(4, 31)]);
        assert_eq!(spans[0].style.underline, Some(true));
        assert!(run(Rule::Links, "[](empty)").is_empty());
    }

    #[test]
    fn test_link_matches_image_suffix() {
        assert_eq!(ranges(&run(Rule::Links, "![alt](url)")), vec![(1, 11)]);
    }

    #[test]
    fn test_list_markers() {
        let spans = run(Rule::Lists, "- one\n  * two\n10. ten\n+no\nplain");
        assert_eq!(ranges(&spans), vec![(0, 2), (6, 10), (14, 18)]);
    }
}
