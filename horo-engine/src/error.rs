//! Error types for horo-engine
//!
//! `Error` is `Clone` so every caller joined to one in-flight generation
//! receives the same failure. Foreign errors are therefore flattened to text.

use thiserror::Error;

use crate::content::ContentError;
use crate::zodiac::Sign;

/// Main error type for the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Content bank could not be loaded or parsed
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Content bank has no usable daily templates for the sign
    #[error("No content for sign {0}")]
    SignContentMissing(Sign),

    /// Reading store read or write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Stored payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Runtime settings invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Anything else (e.g. a generation task panicked)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the engine Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<horo_common::Error> for Error {
    fn from(err: horo_common::Error) -> Self {
        match err {
            horo_common::Error::Config(msg) => Error::Config(msg),
            horo_common::Error::InvalidInput(msg) => Error::InvalidInput(msg),
            other => Error::Persistence(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
