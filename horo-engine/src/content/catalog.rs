//! Locale-scoped content catalog
//!
//! Loads each locale's bank once and keeps it for the process lifetime, or
//! until [`ContentCatalog::invalidate`] is called.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::model::ContentBank;
use super::source::ContentSource;
use super::ContentError;

/// Why a single locale could not be loaded
#[derive(Debug)]
enum LoadFailure {
    Absent,
    Io(String),
    Malformed(ContentError),
}

pub struct ContentCatalog {
    source: Arc<dyn ContentSource>,
    default_locale: String,
    banks: RwLock<HashMap<String, Arc<ContentBank>>>,
    load_count: AtomicU64,
}

impl ContentCatalog {
    pub fn new(source: Arc<dyn ContentSource>, default_locale: impl Into<String>) -> Self {
        Self {
            source,
            default_locale: default_locale.into(),
            banks: RwLock::new(HashMap::new()),
            load_count: AtomicU64::new(0),
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Load the bank for `locale`, falling back once to the default locale
    pub async fn load(&self, locale: &str) -> Result<Arc<ContentBank>, ContentError> {
        self.load_count.fetch_add(1, Ordering::Relaxed);

        if let Some(bank) = self.banks.read().await.get(locale) {
            debug!(locale, "Content bank served from memory");
            return Ok(Arc::clone(bank));
        }

        let failure = match self.read_bank(locale).await {
            Ok(bank) => return Ok(self.remember(&[locale], bank).await),
            Err(failure) => failure,
        };

        if locale == self.default_locale {
            return Err(self.final_error(locale, failure));
        }

        warn!(
            locale,
            fallback = %self.default_locale,
            reason = ?failure,
            "Content unavailable, falling back to default locale"
        );

        let cached_default = self.banks.read().await.get(&self.default_locale).cloned();
        if let Some(bank) = cached_default {
            self.banks
                .write()
                .await
                .insert(locale.to_string(), Arc::clone(&bank));
            return Ok(bank);
        }

        match self.read_bank(&self.default_locale).await {
            Ok(bank) => Ok(self.remember(&[locale, self.default_locale.as_str()], bank).await),
            Err(failure) => Err(self.final_error(locale, failure)),
        }
    }

    /// Drop every cached bank; the next load reads from the source again
    pub async fn invalidate(&self) {
        let mut banks = self.banks.write().await;
        if !banks.is_empty() {
            info!(cached = banks.len(), "Invalidating content banks");
        }
        banks.clear();
    }

    /// Number of `load` calls so far
    pub fn load_count(&self) -> u64 {
        self.load_count.load(Ordering::Relaxed)
    }

    /// Locales the underlying source can serve
    pub async fn available_locales(&self) -> Vec<String> {
        match self.source.locales().await {
            Ok(locales) => locales,
            Err(e) => {
                warn!(error = %e, "Failed to list content locales");
                vec![self.default_locale.clone()]
            }
        }
    }

    async fn read_bank(&self, locale: &str) -> Result<ContentBank, LoadFailure> {
        let text = match self.source.read(locale).await {
            Ok(Some(text)) => text,
            Ok(None) => return Err(LoadFailure::Absent),
            Err(e) => return Err(LoadFailure::Io(e.to_string())),
        };

        let bank = ContentBank::parse(locale, &text).map_err(LoadFailure::Malformed)?;
        info!(
            locale,
            version = %bank.metadata.version,
            signs = bank.sign_count(),
            "Loaded content bank"
        );
        Ok(bank)
    }

    async fn remember(&self, locales: &[&str], bank: ContentBank) -> Arc<ContentBank> {
        let bank = Arc::new(bank);
        let mut banks = self.banks.write().await;
        for locale in locales {
            banks.insert((*locale).to_string(), Arc::clone(&bank));
        }
        bank
    }

    fn final_error(&self, locale: &str, failure: LoadFailure) -> ContentError {
        match failure {
            LoadFailure::Malformed(err) => err,
            LoadFailure::Absent | LoadFailure::Io(_) => ContentError::Unavailable {
                locale: locale.to_string(),
                fallback: self.default_locale.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::source::StaticContentSource;
    use crate::zodiac::Sign;

    const EN: &str = r#"{"metadata": {"language": "en"}, "signs": [{"id": "aries"}]}"#;
    const FR: &str = r#"{"metadata": {"language": "fr"}, "signs": [{"id": "leo"}]}"#;

    fn catalog(source: StaticContentSource) -> ContentCatalog {
        ContentCatalog::new(Arc::new(source), "en")
    }

    #[tokio::test]
    async fn test_loads_requested_locale() {
        let catalog = catalog(
            StaticContentSource::new()
                .with_document("en", EN)
                .with_document("fr", FR),
        );

        let bank = catalog.load("fr").await.unwrap();
        assert_eq!(bank.metadata.language, "fr");
        assert!(bank.sign(Sign::Leo).is_some());
    }

    #[tokio::test]
    async fn test_falls_back_to_default_locale() {
        let catalog = catalog(StaticContentSource::new().with_document("en", EN));

        let bank = catalog.load("xx").await.unwrap();
        assert_eq!(bank.locale, "en");
        assert_eq!(bank.metadata.language, "en");
    }

    #[tokio::test]
    async fn test_malformed_locale_falls_back() {
        let catalog = catalog(
            StaticContentSource::new()
                .with_document("en", EN)
                .with_document("de", "not json"),
        );

        let bank = catalog.load("de").await.unwrap();
        assert_eq!(bank.locale, "en");
    }

    #[tokio::test]
    async fn test_unavailable_when_default_missing() {
        let catalog = catalog(StaticContentSource::new().with_document("fr", FR));

        let err = catalog.load("xx").await.unwrap_err();
        assert_eq!(
            err,
            ContentError::Unavailable {
                locale: "xx".into(),
                fallback: "en".into()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_default_reported() {
        let catalog = catalog(StaticContentSource::new().with_document("en", "[1, 2"));

        let err = catalog.load("en").await.unwrap_err();
        assert!(matches!(err, ContentError::Malformed { ref locale, .. } if locale == "en"));
    }

    #[tokio::test]
    async fn test_banks_are_shared_until_invalidated() {
        let catalog = catalog(StaticContentSource::new().with_document("en", EN));

        let first = catalog.load("en").await.unwrap();
        let second = catalog.load("en").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.load_count(), 2);

        catalog.invalidate().await;
        let third = catalog.load("en").await.unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[tokio::test]
    async fn test_fallback_result_is_remembered_for_locale() {
        let catalog = catalog(StaticContentSource::new().with_document("en", EN));

        let fallback = catalog.load("xx").await.unwrap();
        let again = catalog.load("xx").await.unwrap();
        let default = catalog.load("en").await.unwrap();
        assert!(Arc::ptr_eq(&fallback, &again));
        assert!(Arc::ptr_eq(&fallback, &default));
    }

    #[tokio::test]
    async fn test_available_locales() {
        let catalog = catalog(
            StaticContentSource::new()
                .with_document("en", EN)
                .with_document("fr", FR),
        );
        assert_eq!(catalog.available_locales().await, vec!["en", "fr"]);
    }
}
