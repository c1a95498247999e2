//! Configuration file support
//!
//! Loads settings from ~/.mdtint.toml (or %USERPROFILE%\.mdtint.toml on Windows)
//!
//! Example:
//! ```text
//! # mdtint configuration
//! theme = "solarized-dark"
//! font-size = 16
//! line-numbers = true
//! tab-width = 4
//! theme-dir = "/home/me/.config/mdtint/themes"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::syntax::{HighlightConfig, ThemeRegistry, DEFAULT_FONT_SIZE, DEFAULT_THEME};

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Theme name, looked up in the theme registry
    pub theme: String,
    /// Base font size in points
    pub font_size: u16,
    /// Whether to show line numbers
    pub line_numbers: bool,
    /// Tab width for display
    pub tab_width: usize,
    /// Whether to emit terminal colors
    pub color: bool,
    /// Directory of extra `*.toml` themes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_numbers: false,
            tab_width: 4,
            color: true,
            theme_dir: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".mdtint.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".mdtint.toml"))
        }
    }

    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse config file contents, clamping out-of-range values
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config.clamped())
    }

    /// Clamp font size and tab width into their supported ranges
    pub fn clamped(mut self) -> Self {
        self.font_size = self.font_size.clamp(6, 72);
        self.tab_width = self.tab_width.clamp(1, 16);
        self
    }

    /// Build the theme registry, including themes from `theme_dir`
    pub fn theme_registry(&self) -> Result<ThemeRegistry> {
        let mut registry = ThemeRegistry::new();
        if let Some(dir) = &self.theme_dir {
            registry.load_dir(dir)?;
        }
        Ok(registry)
    }

    /// Highlight settings for this config
    pub fn highlight_config(&self, registry: &ThemeRegistry) -> HighlightConfig {
        HighlightConfig::new(registry.get(&self.theme).clone(), self.font_size)
    }

    /// Save current configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let body = toml::to_string(self).map_err(|e| Error::Message(e.to_string()))?;
        let contents = format!("# mdtint configuration\n# Generated automatically\n\n{}", body);
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
theme = "nord"
font-size = 16
line-numbers = true
tab-width = 2
color = false
        "#;

        let config = Config::parse(contents).unwrap();
        assert_eq!(config.theme, "nord");
        assert_eq!(config.font_size, 16);
        assert!(config.line_numbers);
        assert_eq!(config.tab_width, 2);
        assert!(!config.color);
        assert_eq!(config.theme_dir, None);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = Config::parse("theme = \"dark\"").unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(config.tab_width, 4);
        assert!(config.color);
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_values_are_clamped() {
        let config = Config::parse("font-size = 500\ntab-width = 0").unwrap();
        assert_eq!(config.font_size, 72);
        assert_eq!(config.tab_width, 1);
    }

    #[test]
    fn test_overridden_values_are_clamped() {
        let config = Config {
            font_size: u16::MAX,
            tab_width: 100,
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.font_size, 72);
        assert_eq!(config.tab_width, 16);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(Config::parse("font-size = \"big\""), Err(Error::Toml(_))));
        assert!(Config::parse("theme = ").is_err());
    }

    #[test]
    fn test_highlight_config_falls_back_to_default_theme() {
        let registry = ThemeRegistry::new();
        let config = Config {
            theme: "missing".into(),
            ..Default::default()
        };
        let highlight = config.highlight_config(&registry);
        assert_eq!(highlight.theme.name, DEFAULT_THEME);
        assert_eq!(highlight.font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("mdtint-config-{}.toml", std::process::id()));
        let config = Config {
            theme: "gruvbox".into(),
            line_numbers: true,
            theme_dir: Some(PathBuf::from("/tmp/themes")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
