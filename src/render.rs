//! Terminal rendering of highlighted text
//!
//! Paints resolved style runs with ANSI escape sequences via crossterm.
//! Font family and size have no terminal equivalent and are ignored.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Attribute, Color as TermColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use unicode_width::UnicodeWidthChar;

use crate::config::Config;
use crate::error::Result;
use crate::syntax::{Color, LineIndex, Style, StyleRun};

/// Output layout options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix each line with its 1-based number
    pub line_numbers: bool,
    /// Tab stop width in columns
    pub tab_width: usize,
    /// Emit escape sequences; plain text otherwise
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_numbers: false,
            tab_width: 4,
            color: true,
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            line_numbers: config.line_numbers,
            tab_width: config.tab_width,
            color: config.color,
        }
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn apply_style<W: Write>(out: &mut W, style: &Style) -> Result<()> {
    queue!(out, SetAttribute(Attribute::Reset), SetForegroundColor(term_color(style.fg)))?;
    if let Some(bg) = style.bg {
        queue!(out, SetBackgroundColor(term_color(bg)))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if style.strikethrough {
        queue!(out, SetAttribute(Attribute::CrossedOut))?;
    }
    Ok(())
}

/// Expand tabs to the next tab stop, tracking the display column
fn expand_tabs(segment: &str, col: &mut usize, tab_width: usize) -> String {
    let tab_width = tab_width.max(1);
    let mut result = String::with_capacity(segment.len());
    for ch in segment.chars() {
        if ch == '\t' {
            let spaces = tab_width - (*col % tab_width);
            result.extend(std::iter::repeat(' ').take(spaces));
            *col += spaces;
        } else {
            result.push(ch);
            *col += ch.width().unwrap_or(1);
        }
    }
    result
}

/// Width of the line-number gutter, excluding the separator
fn gutter_width(lines: &LineIndex<'_>) -> usize {
    lines.len().to_string().len()
}

/// Lines to print: a trailing empty line after a final newline is skipped
fn printed_lines(lines: &LineIndex<'_>) -> usize {
    let count = lines.len();
    if count > 1 && lines.line(count - 1).is_empty() {
        count - 1
    } else {
        count
    }
}

/// Write highlighted text to `out`
///
/// Falls back to `write_plain` when color is disabled.
pub fn write_ansi<W: Write>(out: &mut W, text: &str, runs: &[StyleRun], options: &RenderOptions) -> Result<()> {
    if !options.color {
        return write_plain(out, text, options);
    }

    let lines = LineIndex::new(text);
    let width = gutter_width(&lines);
    let mut run_idx = 0;

    for line in 0..printed_lines(&lines) {
        let range = lines.line_range(line);
        if options.line_numbers {
            queue!(
                out,
                SetAttribute(Attribute::Reset),
                SetAttribute(Attribute::Dim),
                Print(format!("{:>width$} ", line + 1, width = width)),
                SetAttribute(Attribute::Reset)
            )?;
        }

        // Runs are sorted and contiguous; skip the ones ending before this line
        while run_idx < runs.len() && runs[run_idx].end <= range.start {
            run_idx += 1;
        }

        let mut col = 0;
        let mut idx = run_idx;
        while idx < runs.len() && runs[idx].start < range.end {
            let run = &runs[idx];
            let start = run.start.max(range.start);
            let end = run.end.min(range.end);
            if start < end {
                apply_style(out, &run.style)?;
                queue!(out, Print(expand_tabs(&text[start..end], &mut col, options.tab_width)))?;
            }
            idx += 1;
        }

        queue!(out, SetAttribute(Attribute::Reset), Print("\n"))?;
    }

    out.flush()?;
    Ok(())
}

/// Write text with the same layout as `write_ansi` but no escape sequences
pub fn write_plain<W: Write>(out: &mut W, text: &str, options: &RenderOptions) -> Result<()> {
    let lines = LineIndex::new(text);
    let width = gutter_width(&lines);

    for line in 0..printed_lines(&lines) {
        if options.line_numbers {
            write!(out, "{:>width$} ", line + 1, width = width)?;
        }
        let mut col = 0;
        writeln!(out, "{}", expand_tabs(lines.line(line), &mut col, options.tab_width))?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{highlight, resolve_runs, Theme};

    fn render(text: &str, options: RenderOptions) -> String {
        let spans = highlight(text, &Theme::light());
        let runs = resolve_runs(text.len(), &spans);
        let mut out = Vec::new();
        write_ansi(&mut out, text, &runs, &options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_output() {
        let options = RenderOptions {
            color: false,
            ..Default::default()
        };
        assert_eq!(render("# a\nb\n", options), "# a\nb\n");
        assert_eq!(render("no newline", options), "no newline\n");
        assert_eq!(render("", options), "\n");
    }

    #[test]
    fn test_plain_line_numbers_and_tabs() {
        let options = RenderOptions {
            line_numbers: true,
            tab_width: 4,
            color: false,
        };
        let text = "a\tb\n\tc\nd\ne\nf\ng\nh\ni\nj\nk";
        let out = render(text, options);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], " 1 a   b");
        assert_eq!(lines[1], " 2     c");
        assert_eq!(lines[9], "10 k");
    }

    #[test]
    fn test_ansi_output_contains_styles() {
        let out = render("**bold** [l](u)", RenderOptions::default());
        assert!(out.contains("\x1b[1m"));
        assert!(out.contains("\x1b[4m"));
        assert!(out.contains("\x1b[38;2;"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_ansi_output_preserves_text() {
        let text = "> quote with `code`\n- item\n\n| a | b |";
        let out = render(text, RenderOptions::default());
        let stripped = strip_ansi(&out);
        assert_eq!(stripped, format!("{}\n", text));
    }

    #[test]
    fn test_wide_chars_advance_tab_stops() {
        let mut col = 0;
        assert_eq!(expand_tabs("日\tx", &mut col, 4), "日  x");
        assert_eq!(col, 5);
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' {
                // CSI: ESC [ params final-byte
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(ch);
            }
        }
        out
    }
}
