//! CLI error types.

use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] settings::Error),

    /// The greeting engine rejected a request.
    #[error(transparent)]
    Greeting(#[from] greeter::Error),

    /// Statistics or history could not be rendered as JSON.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
