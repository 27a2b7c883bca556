//! Settings error types.

use std::path::PathBuf;
use thiserror::Error;

/// Settings errors.
///
/// Lookups never fail; only loading and reloading a document can.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read the settings file.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML.
    #[error("failed to parse settings: {0}")]
    Parse(String),

    /// Reload was requested for a document that did not come from a file.
    #[error("settings were not loaded from a file, nothing to reload")]
    NotFileBacked,
}

pub type Result<T> = std::result::Result<T, Error>;
