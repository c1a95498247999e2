//! Style types for highlighted text
//!
//! Spans carry a `StylePatch`: every attribute is optional and only the
//! attributes a rule sets are written. Folding the patches of a pass in
//! order onto a base `Style` gives the final look of each byte.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::construct::Construct;
use crate::error::Error;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create a color from its components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::hex),
            3 => {
                let mut parts = digits.chars().map(|c| c.to_digit(16).unwrap_or(0) as u8 * 17);
                Some(Self::rgb(parts.next()?, parts.next()?, parts.next()?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| Error::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Foreground color with an optional background, as a theme assigns it
/// to one construct class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paint {
    pub fg: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
}

impl Paint {
    /// Paint with only a foreground color
    pub const fn fg(color: Color) -> Self {
        Self { fg: color, bg: None }
    }

    /// Builder: set background color
    pub const fn with_bg(self, color: Color) -> Self {
        Self {
            fg: self.fg,
            bg: Some(color),
        }
    }
}

/// Fully resolved text attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color, `None` leaves the surface background
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    /// Monospace font family
    pub monospace: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Font size in points
    pub size: u16,
}

impl Style {
    /// Apply a patch, overwriting only the attributes it sets
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(fg) = patch.fg {
            self.fg = fg;
        }
        if let Some(bg) = patch.bg {
            self.bg = Some(bg);
        }
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(monospace) = patch.monospace {
            self.monospace = monospace;
        }
        if let Some(underline) = patch.underline {
            self.underline = underline;
        }
        if let Some(strikethrough) = patch.strikethrough {
            self.strikethrough = strikethrough;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
    }
}

/// Attribute writes produced by one rule match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StylePatch {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub monospace: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub size: Option<u16>,
}

impl StylePatch {
    /// Create a patch with just a foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Default::default()
        }
    }

    /// Create a patch from a theme paint (foreground, plus background if any)
    pub fn paint(paint: Paint) -> Self {
        Self {
            fg: Some(paint.fg),
            bg: paint.bg,
            ..Default::default()
        }
    }

    /// Create a patch that writes every attribute
    pub fn full(style: Style) -> Self {
        Self {
            fg: Some(style.fg),
            bg: style.bg,
            bold: Some(style.bold),
            italic: Some(style.italic),
            monospace: Some(style.monospace),
            underline: Some(style.underline),
            strikethrough: Some(style.strikethrough),
            size: Some(style.size),
        }
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    /// Builder: set monospace font
    pub fn with_monospace(mut self) -> Self {
        self.monospace = Some(true);
        self
    }

    /// Builder: set underline
    pub fn with_underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    /// Builder: set strikethrough
    pub fn with_strikethrough(mut self) -> Self {
        self.strikethrough = Some(true);
        self
    }

    /// Builder: set font size
    pub fn with_size(mut self, size: u16) -> Self {
        self.size = Some(size);
        self
    }

    /// Check if this patch writes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A styled span of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// Construct class whose rule produced the span
    pub construct: Construct,
    /// Attributes written over the range
    pub style: StylePatch,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, construct: Construct, style: StylePatch) -> Self {
        Self {
            start,
            end,
            construct,
            style,
        }
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Get the length of this span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A maximal byte range sharing one resolved style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRun {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}
