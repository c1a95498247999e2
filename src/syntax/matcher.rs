//! Span matching and style resolution
//!
//! `match_spans` runs every markdown rule over a full snapshot and returns
//! the ordered span list. `resolve_runs` folds such a list into
//! non-overlapping runs of final styles.

use std::time::Instant;

use super::markdown::{PassContext, Rule};
use super::style::{Span, Style, StyleRun};
use super::theme::Theme;

/// Default base font size in points
pub const DEFAULT_FONT_SIZE: u16 = 14;

/// Inputs of a highlight pass besides the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    pub theme: Theme,
    /// Base font size in points
    pub font_size: u16,
}

impl HighlightConfig {
    pub fn new(theme: Theme, font_size: u16) -> Self {
        Self { theme, font_size }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self::new(Theme::default(), DEFAULT_FONT_SIZE)
    }
}

/// Run a full highlight pass over `text`
pub fn match_spans(text: &str, config: &HighlightConfig) -> Vec<Span> {
    match_spans_until(text, config, || false).unwrap_or_default()
}

/// Run a full highlight pass, giving up between rules once `is_stale`
/// reports true
pub fn match_spans_until<F>(text: &str, config: &HighlightConfig, is_stale: F) -> Option<Vec<Span>>
where
    F: Fn() -> bool,
{
    run_pass(text, &config.theme, config.font_size, is_stale)
}

pub(crate) fn run_pass<F>(text: &str, theme: &Theme, font_size: u16, is_stale: F) -> Option<Vec<Span>>
where
    F: Fn() -> bool,
{
    let started = Instant::now();
    let pass = PassContext::new(text, theme, font_size);
    let mut spans = Vec::new();

    for rule in Rule::ORDER {
        if is_stale() {
            tracing::trace!(rule = rule.name(), "pass abandoned");
            return None;
        }
        rule.apply(&pass, &mut spans);
    }

    tracing::trace!(
        bytes = text.len(),
        lines = pass.lines.len(),
        spans = spans.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "highlight pass"
    );
    Some(spans)
}

/// Fold spans in order into runs of resolved style covering `[0, text_len)`
///
/// Spans are clamped to the text; empty spans are ignored. Adjacent runs
/// with equal styles are merged.
pub fn resolve_runs(text_len: usize, spans: &[Span]) -> Vec<StyleRun> {
    let clamp = |span: &Span| (span.start.min(text_len), span.end.min(text_len));

    let mut bounds = vec![0, text_len];
    for span in spans {
        let (start, end) = clamp(span);
        if start < end {
            bounds.push(start);
            bounds.push(end);
        }
    }
    bounds.sort_unstable();
    bounds.dedup();

    // segment i covers bounds[i]..bounds[i + 1]
    let mut styles = vec![Style::default(); bounds.len().saturating_sub(1)];
    for span in spans {
        let (start, end) = clamp(span);
        if start >= end {
            continue;
        }
        let first = bounds.binary_search(&start).unwrap_or_else(|i| i);
        let last = bounds.binary_search(&end).unwrap_or_else(|i| i);
        for style in &mut styles[first..last] {
            style.apply(&span.style);
        }
    }

    let mut runs: Vec<StyleRun> = Vec::new();
    for (i, style) in styles.into_iter().enumerate() {
        let (start, end) = (bounds[i], bounds[i + 1]);
        match runs.last_mut() {
            Some(last) if last.style == style && last.end == start => last.end = end,
            _ => runs.push(StyleRun { start, end, style }),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::construct::Construct;
    use crate::syntax::style::{Color, StylePatch};

    fn config() -> HighlightConfig {
        HighlightConfig::default()
    }

    fn of(spans: &[Span], construct: Construct) -> Vec<(usize, usize)> {
        spans
            .iter()
            .filter(|s| s.construct == construct)
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn test_empty_document_only_has_base() {
        let spans = match_spans("", &config());
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (0, 0));
        assert_eq!(spans[0].construct, Construct::Text);
        assert!(resolve_runs(0, &spans).is_empty());
    }

    #[test]
    fn test_plain_text_only_has_base() {
        let spans = match_spans("just some words\nand more", &config());
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_rule_order_is_preserved() {
        let text = "# T\n**b** *i* ~~s~~ `c`\n> q\n| a |\n![x](y) [l](u)\n- item\n```\nz\n```";
        let spans = match_spans(text, &config());
        let order = [
            Construct::Text,
            Construct::Header,
            Construct::Bold,
            Construct::Italic,
            Construct::Strikethrough,
            Construct::InlineCode,
            Construct::CodeBlock,
            Construct::Blockquote,
            Construct::Table,
            Construct::Image,
            Construct::Link,
            Construct::ListMarker,
        ];
        let rank = |c: Construct| {
            let c = match c {
                Construct::BlockquoteMarker => Construct::Blockquote,
                Construct::ImageMarker => Construct::Image,
                other => other,
            };
            order.iter().position(|&o| o == c).unwrap_or(usize::MAX)
        };
        let ranks: Vec<_> = spans.iter().map(|s| rank(s.construct)).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
        for construct in order {
            assert!(!of(&spans, construct).is_empty(), "missing {}", construct.name());
        }
    }

    #[test]
    fn test_stale_pass_is_abandoned() {
        assert!(match_spans_until("**x**", &config(), || true).is_none());
    }

    #[test]
    fn test_runs_cover_document() {
        let text = "# Title\nsome **bold** and [link](x)\n";
        let spans = match_spans(text, &config());
        let runs = resolve_runs(text.len(), &spans);
        assert_eq!(runs.first().map(|r| r.start), Some(0));
        assert_eq!(runs.last().map(|r| r.end), Some(text.len()));
        for pair in runs.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_ne!(pair[0].style, pair[1].style);
        }
    }

    #[test]
    fn test_later_patch_wins_per_attribute() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let spans = vec![
            Span::new(0, 6, Construct::Text, StylePatch::fg(Color::BLACK)),
            Span::new(0, 4, Construct::Bold, StylePatch::fg(red).with_bold()),
            Span::new(2, 6, Construct::Link, StylePatch::fg(blue).with_underline()),
        ];
        let runs = resolve_runs(6, &spans);
        assert_eq!(runs.len(), 3);
        assert_eq!((runs[0].start, runs[0].end), (0, 2));
        assert_eq!(runs[0].style.fg, red);
        assert!(runs[0].style.bold && !runs[0].style.underline);
        assert_eq!((runs[1].start, runs[1].end), (2, 4));
        assert_eq!(runs[1].style.fg, blue);
        assert!(runs[1].style.bold && runs[1].style.underline);
        assert_eq!((runs[2].start, runs[2].end), (4, 6));
        assert!(!runs[2].style.bold && runs[2].style.underline);
    }

    #[test]
    fn test_out_of_range_spans_are_clamped() {
        let spans = vec![
            Span::new(0, 3, Construct::Text, StylePatch::fg(Color::BLACK)),
            Span::new(2, 50, Construct::Bold, StylePatch::default().with_bold()),
            Span::new(9, 4, Construct::Italic, StylePatch::default().with_italic()),
        ];
        let runs = resolve_runs(3, &spans);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].end, 3);
        assert!(runs[1].style.bold);
        assert!(runs.iter().all(|r| !r.style.italic));
    }
}
