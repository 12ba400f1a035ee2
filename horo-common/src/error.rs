//! Errors raised while bootstrapping: config files, the root folder and the database

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Opening or migrating the SQLite database failed
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Root folder or config file could not be created or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bootstrap TOML missing or unparseable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Date text or other user-supplied value rejected
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
