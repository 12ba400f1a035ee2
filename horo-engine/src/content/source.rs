//! Where content documents come from

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

/// File name of the zodiac document inside a locale directory
pub const ZODIAC_DOCUMENT: &str = "zodiac.json";

/// Raw document provider
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Raw document text for `locale`, `Ok(None)` when absent
    async fn read(&self, locale: &str) -> io::Result<Option<String>>;

    /// Locales this source can serve
    async fn locales(&self) -> io::Result<Vec<String>>;
}

/// Reject anything that could escape the content directory
fn is_valid_locale(locale: &str) -> bool {
    !locale.is_empty()
        && locale.len() <= 16
        && locale
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Reads `{root}/{locale}/zodiac.json`
#[derive(Debug, Clone)]
pub struct DirectoryContentSource {
    root: PathBuf,
}

impl DirectoryContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn document_path(&self, locale: &str) -> PathBuf {
        self.root.join(locale).join(ZODIAC_DOCUMENT)
    }
}

#[async_trait]
impl ContentSource for DirectoryContentSource {
    async fn read(&self, locale: &str) -> io::Result<Option<String>> {
        if !is_valid_locale(locale) {
            warn!(locale, "Rejecting invalid locale");
            return Ok(None);
        }

        let path = self.document_path(locale);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "Read content document");
                Ok(Some(text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn locales(&self) -> io::Result<Vec<String>> {
        let mut locales = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(locales),
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_valid_locale(&name) && entry.path().join(ZODIAC_DOCUMENT).is_file() {
                locales.push(name);
            }
        }

        locales.sort();
        Ok(locales)
    }
}

/// In-memory documents keyed by locale
#[derive(Debug, Clone, Default)]
pub struct StaticContentSource {
    documents: HashMap<String, String>,
}

impl StaticContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, locale: &str, text: impl Into<String>) -> Self {
        self.documents.insert(locale.to_string(), text.into());
        self
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn read(&self, locale: &str) -> io::Result<Option<String>> {
        Ok(self.documents.get(locale).cloned())
    }

    async fn locales(&self) -> io::Result<Vec<String>> {
        let mut locales: Vec<String> = self.documents.keys().cloned().collect();
        locales.sort();
        Ok(locales)
    }
}
