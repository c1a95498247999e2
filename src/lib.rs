//! mdtint - markdown syntax highlighting engine
//!
//! Scans markdown text with a fixed set of pattern rules and produces
//! styled spans colored from a themeable palette.
//!
//! ```
//! use mdtint::{highlight, resolve_runs, Theme};
//!
//! let text = "# Title\n\nSome **bold** text";
//! let spans = highlight(text, &Theme::from_name("dark"));
//! let runs = resolve_runs(text.len(), &spans);
//! assert_eq!(runs.last().map(|r| r.end), Some(text.len()));
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod syntax;

pub use error::{Error, Result};
pub use syntax::{
    highlight, match_spans, resolve_runs, BackgroundHighlighter, Color, Construct, HighlightConfig,
    Highlighter, Span, Style, StylePatch, StyleRun, Theme, ThemeRegistry,
};
