//! Greeting engine error types.

use thiserror::Error;

/// Greeting engine errors.
///
/// A failed call never touches statistics or history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested language has no configured template.
    #[error("language '{code}' not supported. Available: {}", .available.join(", "))]
    UnsupportedLanguage {
        code: String,
        available: Vec<String>,
    },

    /// A custom message was blank after trimming.
    #[error("message cannot be empty")]
    EmptyMessage,
}

pub type Result<T> = std::result::Result<T, Error>;
