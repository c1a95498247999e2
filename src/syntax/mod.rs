//! Markdown syntax highlighting
//!
//! This module provides the highlighting engine:
//! - Theme palettes and the theme registry
//! - The markdown rule set and span matcher
//! - Synchronous and background highlighters

mod construct;
mod highlighter;
mod lines;
mod markdown;
mod matcher;
mod rules;
mod style;
mod theme;

pub use construct::Construct;
pub use highlighter::{highlight, BackgroundHighlighter, HighlightResult, Highlighter};
pub use lines::LineIndex;
pub use markdown::Rule;
pub use matcher::{match_spans, match_spans_until, resolve_runs, HighlightConfig, DEFAULT_FONT_SIZE};
pub use rules::PatternRule;
pub use style::{Color, Paint, Span, Style, StylePatch, StyleRun};
pub use theme::{Theme, ThemeRegistry, DEFAULT_THEME};
