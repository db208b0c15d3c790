//! Error type for the fallible edges of the crate.
//!
//! The animation itself never fails. Errors come from loading configuration
//! and from driving the terminal.

use std::io;
use std::path::PathBuf;

/// Errors raised while configuring or hosting a typewriter.
#[derive(Debug, thiserror::Error)]
pub enum TypewriterError {
    /// Terminal or file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// A config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A config file is not valid TOML for [`crate::config::TypewriterConfig`].
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A color string is neither hex nor a known color name.
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    /// A text attribute name is unknown.
    #[error("invalid text attribute {0:?}")]
    InvalidAttr(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TypewriterError>;
