//! Content bank loading
//!
//! A content bank is the per-locale set of reading templates for every sign.

pub mod catalog;
pub mod model;
pub mod source;

use thiserror::Error;

pub use catalog::ContentCatalog;
pub use model::{ContentBank, ContentMetadata, DailyTemplate, SignContent, WeeklyTemplate};
pub use source::{ContentSource, DirectoryContentSource, StaticContentSource};

/// Content loading errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    /// Neither the requested nor the fallback locale could be read
    #[error("Content unavailable for locale '{locale}' (fallback '{fallback}' also failed)")]
    Unavailable { locale: String, fallback: String },

    /// Document was read but is not a valid content document
    #[error("Malformed content for locale '{locale}': {reason}")]
    Malformed { locale: String, reason: String },
}
