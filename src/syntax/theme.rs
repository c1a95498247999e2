//! Highlighting themes
//!
//! A theme is an immutable palette keyed by construct class. Built-in
//! themes are plain data; custom themes can be loaded from TOML files:
//!
//! ```toml
//! name = "paper"
//! background = "#fbfaf7"
//! text = "#2b2b2b"
//! headers = ["#1f4e79", "#2e75b6"]
//!
//! [code]
//! fg = "#a31515"
//! bg = "#eeeeee"
//! ```
//!
//! Every paint table (`bold`, `italic`, `strikethrough`, `code`,
//! `blockquote`, `blockquote-marker`, `table`, `image`, `image-marker`,
//! `link`, `list`) is required.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::construct::Construct;
use super::style::{Color, Paint};
use crate::error::{Error, Result};

/// Name of the canonical default theme
pub const DEFAULT_THEME: &str = "light";

/// Color palette for markdown highlighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Theme {
    pub name: String,
    /// Surface background
    pub background: Color,
    /// Default text color
    pub text: Color,
    /// Header colors, index 0 for level 1
    pub headers: Vec<Color>,
    pub bold: Paint,
    pub italic: Paint,
    pub strikethrough: Paint,
    /// Inline code and fenced code blocks
    pub code: Paint,
    pub blockquote: Paint,
    pub blockquote_marker: Paint,
    pub table: Paint,
    pub image: Paint,
    pub image_marker: Paint,
    pub link: Paint,
    /// List item markers
    pub list: Paint,
}

impl Theme {
    /// Color for a header level (1-based), clamped to the last defined color
    pub fn header_color(&self, level: usize) -> Color {
        let idx = level.max(1).min(self.headers.len());
        match idx.checked_sub(1).and_then(|i| self.headers.get(i)) {
            Some(&color) => color,
            None => self.text,
        }
    }

    /// Paint for a construct class
    ///
    /// Headers resolve to the level 1 color; use `header_color` for others.
    pub fn paint(&self, construct: Construct) -> Paint {
        match construct {
            Construct::Text => Paint::fg(self.text),
            Construct::Header => Paint::fg(self.header_color(1)),
            Construct::Bold => self.bold,
            Construct::Italic => self.italic,
            Construct::Strikethrough => self.strikethrough,
            Construct::InlineCode | Construct::CodeBlock => self.code,
            Construct::Blockquote => self.blockquote,
            Construct::BlockquoteMarker => self.blockquote_marker,
            Construct::Table => self.table,
            Construct::Image => self.image,
            Construct::ImageMarker => self.image_marker,
            Construct::Link => self.link,
            Construct::ListMarker => self.list,
        }
    }

    /// Get a built-in theme by name, defaults to `light` if not found
    pub fn from_name(name: &str) -> Self {
        let normalized = normalize_name(name);
        match builtin(&normalized) {
            Some(theme) => theme,
            None => {
                tracing::debug!(requested = name, "unknown theme, using {}", DEFAULT_THEME);
                Self::light()
            }
        }
    }

    /// Names of all built-in themes
    pub fn builtin_names() -> &'static [&'static str] {
        &BUILTIN_NAMES
    }

    /// Parse a theme from TOML
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut theme: Theme = toml::from_str(contents)?;
        theme.name = normalize_name(&theme.name);
        theme.validate()?;
        Ok(theme)
    }

    /// Load a theme from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialize this theme as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Message(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidTheme {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.headers.is_empty() {
            return Err(invalid("at least one header color is required"));
        }
        Ok(())
    }

    pub fn light() -> Self {
        Self {
            name: "light".into(),
            background: Color::WHITE,
            text: Color::hex(0x1d1d1f),
            headers: vec![
                Color::hex(0x0040dd),
                Color::hex(0x0058e6),
                Color::hex(0x006ff0),
                Color::hex(0x007aff),
                Color::hex(0x3395ff),
                Color::hex(0x5ea9ff),
            ],
            bold: Paint::fg(Color::hex(0x1d1d1f)),
            italic: Paint::fg(Color::hex(0x3a3a3c)),
            strikethrough: Paint::fg(Color::hex(0x8e8e93)),
            code: Paint::fg(Color::hex(0xff3b30)).with_bg(Color::hex(0xf2f2f7)),
            blockquote: Paint::fg(Color::hex(0x8e8e93)),
            blockquote_marker: Paint::fg(Color::hex(0xff9500)),
            table: Paint::fg(Color::hex(0xaf52de)),
            image: Paint::fg(Color::hex(0x007aff)),
            image_marker: Paint::fg(Color::hex(0xff3b30)),
            link: Paint::fg(Color::hex(0x007aff)),
            list: Paint::fg(Color::hex(0x34c759)),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".into(),
            background: Color::hex(0x1e1e1e),
            text: Color::hex(0xe5e5e7),
            headers: vec![
                Color::hex(0x0a84ff),
                Color::hex(0x409cff),
                Color::hex(0x64d2ff),
                Color::hex(0x70d7ff),
                Color::hex(0x8ae0ff),
                Color::hex(0xa8e8ff),
            ],
            bold: Paint::fg(Color::hex(0xffffff)),
            italic: Paint::fg(Color::hex(0xd1d1d6)),
            strikethrough: Paint::fg(Color::hex(0x8e8e93)),
            code: Paint::fg(Color::hex(0xff6961)).with_bg(Color::hex(0x2c2c2e)),
            blockquote: Paint::fg(Color::hex(0x98989d)),
            blockquote_marker: Paint::fg(Color::hex(0xff9f0a)),
            table: Paint::fg(Color::hex(0xbf5af2)),
            image: Paint::fg(Color::hex(0x0a84ff)),
            image_marker: Paint::fg(Color::hex(0xff453a)),
            link: Paint::fg(Color::hex(0x0a84ff)),
            list: Paint::fg(Color::hex(0x30d158)),
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light".into(),
            background: Color::hex(0xfdf6e3),
            text: Color::hex(0x657b83),
            headers: vec![
                Color::hex(0xcb4b16),
                Color::hex(0xb58900),
                Color::hex(0x859900),
                Color::hex(0x2aa198),
            ],
            bold: Paint::fg(Color::hex(0x586e75)),
            italic: Paint::fg(Color::hex(0x586e75)),
            strikethrough: Paint::fg(Color::hex(0x93a1a1)),
            code: Paint::fg(Color::hex(0xd33682)).with_bg(Color::hex(0xeee8d5)),
            blockquote: Paint::fg(Color::hex(0x93a1a1)),
            blockquote_marker: Paint::fg(Color::hex(0xcb4b16)),
            table: Paint::fg(Color::hex(0x6c71c4)),
            image: Paint::fg(Color::hex(0x268bd2)),
            image_marker: Paint::fg(Color::hex(0xdc322f)),
            link: Paint::fg(Color::hex(0x268bd2)),
            list: Paint::fg(Color::hex(0x859900)),
        }
    }

    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".into(),
            background: Color::hex(0x002b36),
            text: Color::hex(0x839496),
            headers: vec![
                Color::hex(0xcb4b16),
                Color::hex(0xb58900),
                Color::hex(0x859900),
                Color::hex(0x2aa198),
            ],
            bold: Paint::fg(Color::hex(0x93a1a1)),
            italic: Paint::fg(Color::hex(0x93a1a1)),
            strikethrough: Paint::fg(Color::hex(0x586e75)),
            code: Paint::fg(Color::hex(0xd33682)).with_bg(Color::hex(0x073642)),
            blockquote: Paint::fg(Color::hex(0x586e75)),
            blockquote_marker: Paint::fg(Color::hex(0xcb4b16)),
            table: Paint::fg(Color::hex(0x6c71c4)),
            image: Paint::fg(Color::hex(0x268bd2)),
            image_marker: Paint::fg(Color::hex(0xdc322f)),
            link: Paint::fg(Color::hex(0x268bd2)),
            list: Paint::fg(Color::hex(0x859900)),
        }
    }

    pub fn github() -> Self {
        Self {
            name: "github".into(),
            background: Color::WHITE,
            text: Color::hex(0x24292f),
            headers: vec![Color::hex(0x0550ae), Color::hex(0x0969da), Color::hex(0x57606a)],
            bold: Paint::fg(Color::hex(0x24292f)),
            italic: Paint::fg(Color::hex(0x24292f)),
            strikethrough: Paint::fg(Color::hex(0x6e7781)),
            code: Paint::fg(Color::hex(0xcf222e)).with_bg(Color::hex(0xf6f8fa)),
            blockquote: Paint::fg(Color::hex(0x57606a)),
            blockquote_marker: Paint::fg(Color::hex(0xd0d7de)),
            table: Paint::fg(Color::hex(0x8250df)),
            image: Paint::fg(Color::hex(0x0969da)),
            image_marker: Paint::fg(Color::hex(0xcf222e)),
            link: Paint::fg(Color::hex(0x0969da)),
            list: Paint::fg(Color::hex(0x116329)),
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula".into(),
            background: Color::hex(0x282a36),
            text: Color::hex(0xf8f8f2),
            headers: vec![
                Color::hex(0xbd93f9),
                Color::hex(0xff79c6),
                Color::hex(0x8be9fd),
                Color::hex(0x50fa7b),
                Color::hex(0xf1fa8c),
                Color::hex(0xffb86c),
            ],
            bold: Paint::fg(Color::hex(0xffb86c)),
            italic: Paint::fg(Color::hex(0xf1fa8c)),
            strikethrough: Paint::fg(Color::hex(0x6272a4)),
            code: Paint::fg(Color::hex(0x50fa7b)).with_bg(Color::hex(0x44475a)),
            blockquote: Paint::fg(Color::hex(0x6272a4)),
            blockquote_marker: Paint::fg(Color::hex(0xffb86c)),
            table: Paint::fg(Color::hex(0xbd93f9)),
            image: Paint::fg(Color::hex(0x8be9fd)),
            image_marker: Paint::fg(Color::hex(0xff5555)),
            link: Paint::fg(Color::hex(0x8be9fd)),
            list: Paint::fg(Color::hex(0xff79c6)),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".into(),
            background: Color::hex(0x2e3440),
            text: Color::hex(0xd8dee9),
            headers: vec![Color::hex(0x88c0d0), Color::hex(0x81a1c1), Color::hex(0x5e81ac)],
            bold: Paint::fg(Color::hex(0xeceff4)),
            italic: Paint::fg(Color::hex(0xe5e9f0)),
            strikethrough: Paint::fg(Color::hex(0x4c566a)),
            code: Paint::fg(Color::hex(0xa3be8c)).with_bg(Color::hex(0x3b4252)),
            blockquote: Paint::fg(Color::hex(0x616e88)),
            blockquote_marker: Paint::fg(Color::hex(0xd08770)),
            table: Paint::fg(Color::hex(0xb48ead)),
            image: Paint::fg(Color::hex(0x8fbcbb)),
            image_marker: Paint::fg(Color::hex(0xbf616a)),
            link: Paint::fg(Color::hex(0x88c0d0)),
            list: Paint::fg(Color::hex(0xebcb8b)),
        }
    }

    pub fn monokai() -> Self {
        Self {
            name: "monokai".into(),
            background: Color::hex(0x272822),
            text: Color::hex(0xf8f8f2),
            headers: vec![Color::hex(0xf92672), Color::hex(0xfd971f)],
            bold: Paint::fg(Color::hex(0xfd971f)),
            italic: Paint::fg(Color::hex(0xe6db74)),
            strikethrough: Paint::fg(Color::hex(0x75715e)),
            code: Paint::fg(Color::hex(0xa6e22e)).with_bg(Color::hex(0x3e3d32)),
            blockquote: Paint::fg(Color::hex(0x75715e)),
            blockquote_marker: Paint::fg(Color::hex(0xfd971f)),
            table: Paint::fg(Color::hex(0xae81ff)),
            image: Paint::fg(Color::hex(0x66d9ef)),
            image_marker: Paint::fg(Color::hex(0xf92672)),
            link: Paint::fg(Color::hex(0x66d9ef)),
            list: Paint::fg(Color::hex(0xa6e22e)),
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".into(),
            background: Color::hex(0x282828),
            text: Color::hex(0xebdbb2),
            headers: vec![
                Color::hex(0xfb4934),
                Color::hex(0xfabd2f),
                Color::hex(0xb8bb26),
                Color::hex(0x8ec07c),
                Color::hex(0x83a598),
            ],
            bold: Paint::fg(Color::hex(0xfe8019)),
            italic: Paint::fg(Color::hex(0xd3869b)),
            strikethrough: Paint::fg(Color::hex(0x928374)),
            code: Paint::fg(Color::hex(0xb8bb26)).with_bg(Color::hex(0x3c3836)),
            blockquote: Paint::fg(Color::hex(0x928374)),
            blockquote_marker: Paint::fg(Color::hex(0xfe8019)),
            table: Paint::fg(Color::hex(0xd3869b)),
            image: Paint::fg(Color::hex(0x83a598)),
            image_marker: Paint::fg(Color::hex(0xfb4934)),
            link: Paint::fg(Color::hex(0x83a598)),
            list: Paint::fg(Color::hex(0xfabd2f)),
        }
    }

    pub fn sepia() -> Self {
        Self {
            name: "sepia".into(),
            background: Color::hex(0xf4ecd8),
            text: Color::hex(0x5b4636),
            headers: vec![Color::hex(0x8b4513)],
            bold: Paint::fg(Color::hex(0x3e2c1c)),
            italic: Paint::fg(Color::hex(0x6f5643)),
            strikethrough: Paint::fg(Color::hex(0xa89984)),
            code: Paint::fg(Color::hex(0x9c3d10)).with_bg(Color::hex(0xe9dfc6)),
            blockquote: Paint::fg(Color::hex(0x8a7560)),
            blockquote_marker: Paint::fg(Color::hex(0xb5651d)),
            table: Paint::fg(Color::hex(0x7b5e57)),
            image: Paint::fg(Color::hex(0x4f6d7a)),
            image_marker: Paint::fg(Color::hex(0xa0522d)),
            link: Paint::fg(Color::hex(0x4f6d7a)),
            list: Paint::fg(Color::hex(0x6b8e23)),
        }
    }

    pub fn ocean() -> Self {
        Self {
            name: "ocean".into(),
            background: Color::hex(0x2b303b),
            text: Color::hex(0xc0c5ce),
            headers: vec![
                Color::hex(0x8fa1b3),
                Color::hex(0x96b5b4),
                Color::hex(0xa3be8c),
                Color::hex(0xebcb8b),
            ],
            bold: Paint::fg(Color::hex(0xd08770)),
            italic: Paint::fg(Color::hex(0xb48ead)),
            strikethrough: Paint::fg(Color::hex(0x65737e)),
            code: Paint::fg(Color::hex(0xa3be8c)).with_bg(Color::hex(0x343d46)),
            blockquote: Paint::fg(Color::hex(0x65737e)),
            blockquote_marker: Paint::fg(Color::hex(0xd08770)),
            table: Paint::fg(Color::hex(0xb48ead)),
            image: Paint::fg(Color::hex(0x96b5b4)),
            image_marker: Paint::fg(Color::hex(0xbf616a)),
            link: Paint::fg(Color::hex(0x8fa1b3)),
            list: Paint::fg(Color::hex(0xebcb8b)),
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".into(),
            background: Color::BLACK,
            text: Color::WHITE,
            headers: vec![Color::hex(0xffff00), Color::hex(0x00ffff)],
            bold: Paint::fg(Color::WHITE),
            italic: Paint::fg(Color::WHITE),
            strikethrough: Paint::fg(Color::hex(0xc0c0c0)),
            code: Paint::fg(Color::hex(0x00ff00)).with_bg(Color::hex(0x202020)),
            blockquote: Paint::fg(Color::hex(0xc0c0c0)),
            blockquote_marker: Paint::fg(Color::hex(0xff8000)),
            table: Paint::fg(Color::hex(0xff00ff)),
            image: Paint::fg(Color::hex(0x00ffff)),
            image_marker: Paint::fg(Color::hex(0xff0000)),
            link: Paint::fg(Color::hex(0x00ffff)),
            list: Paint::fg(Color::hex(0x00ff00)),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

const BUILTIN_NAMES: [&str; 12] = [
    "light",
    "dark",
    "solarized-light",
    "solarized-dark",
    "github",
    "dracula",
    "nord",
    "monokai",
    "gruvbox",
    "sepia",
    "ocean",
    "high-contrast",
];

fn builtin(name: &str) -> Option<Theme> {
    let theme = match name {
        "light" => Theme::light(),
        "dark" => Theme::dark(),
        "solarized-light" => Theme::solarized_light(),
        "solarized-dark" => Theme::solarized_dark(),
        "github" => Theme::github(),
        "dracula" => Theme::dracula(),
        "nord" => Theme::nord(),
        "monokai" => Theme::monokai(),
        "gruvbox" => Theme::gruvbox(),
        "sepia" => Theme::sepia(),
        "ocean" => Theme::ocean(),
        "high-contrast" => Theme::high_contrast(),
        _ => return None,
    };
    Some(theme)
}

/// Lowercase, trim, and use `-` as the word separator
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace('_', "-")
}

/// Name to theme lookup over built-in and loaded themes
pub struct ThemeRegistry {
    themes: HashMap<String, Theme>,
    fallback: Theme,
}

impl ThemeRegistry {
    /// Create a registry holding the built-in themes
    pub fn new() -> Self {
        let themes = BUILTIN_NAMES
            .iter()
            .filter_map(|name| builtin(name))
            .map(|theme| (theme.name.clone(), theme))
            .collect();
        Self {
            themes,
            fallback: Theme::light(),
        }
    }

    /// Add a theme, replacing any theme with the same name
    pub fn insert(&mut self, mut theme: Theme) {
        theme.name = normalize_name(&theme.name);
        self.themes.insert(theme.name.clone(), theme);
    }

    /// Get a theme by name, falling back to the default theme
    pub fn get(&self, name: &str) -> &Theme {
        let normalized = normalize_name(name);
        match self.themes.get(&normalized) {
            Some(theme) => theme,
            None => {
                tracing::debug!(requested = name, "unknown theme, using {}", DEFAULT_THEME);
                self.themes.get(DEFAULT_THEME).unwrap_or(&self.fallback)
            }
        }
    }

    /// Check if a theme with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(&normalize_name(name))
    }

    /// List registered theme names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.themes.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Load every `*.toml` theme in a directory
    ///
    /// Files that fail to parse are skipped. Returns the number loaded.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "toml") {
                continue;
            }
            match Theme::from_file(&path) {
                Ok(theme) => {
                    tracing::debug!(theme = %theme.name, path = %path.display(), "loaded theme");
                    self.insert(theme);
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping theme file: {}", e);
                }
            }
        }
        Ok(loaded)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
