//! Error types for mdtint
//!
//! Highlighting itself never fails; these cover the ambient surface
//! (configuration, theme files, terminal output).

use thiserror::Error;

/// Result type alias for mdtint operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Invalid theme {name:?}: {reason}")]
    InvalidTheme { name: String, reason: String },

    #[error("{0}")]
    Message(String),
}
