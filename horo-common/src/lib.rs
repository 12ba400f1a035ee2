//! # Horo Common Library
//!
//! Shared code for the horoscope engine and its tools:
//! - Error type
//! - Bootstrap configuration and root folder resolution
//! - SQLite initialization and the settings table
//! - Calendar helpers (epoch days, ISO week boundaries)

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
