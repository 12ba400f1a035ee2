//! Read-through cache behavior: idempotence, single-flight, cancellation and
//! failure handling

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use futures::StreamExt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use horo_engine::content::{ContentCatalog, ContentError, ContentSource};
use horo_engine::store::{ReadingKind, StoredEntry};
use horo_engine::{CacheState, Error, MemoryReadingStore, ReadingCache, ReadingStore, Sign};

const DOC: &str = include_str!("../content/en/zodiac.json");

/// Source that counts reads, can be slowed down and can be swapped at runtime
struct ProbeSource {
    document: Mutex<Option<String>>,
    delay: std::time::Duration,
    reads: AtomicUsize,
}

impl ProbeSource {
    fn new(document: Option<&str>, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            document: Mutex::new(document.map(str::to_string)),
            delay: std::time::Duration::from_millis(delay_ms),
            reads: AtomicUsize::new(0),
        })
    }

    fn set_document(&self, document: &str) {
        *self.document.lock().unwrap() = Some(document.to_string());
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for ProbeSource {
    async fn read(&self, _locale: &str) -> io::Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.document.lock().unwrap().clone())
    }

    async fn locales(&self) -> io::Result<Vec<String>> {
        Ok(vec!["en".to_string()])
    }
}

/// Store whose reads or writes can be made to fail
#[derive(Default)]
struct FlakyStore {
    inner: MemoryReadingStore,
    fail_reads: bool,
    fail_writes: bool,
}

#[async_trait]
impl ReadingStore for FlakyStore {
    async fn get_by_key(&self, kind: ReadingKind, key: &str) -> horo_engine::Result<Option<StoredEntry>> {
        if self.fail_reads {
            return Err(Error::Persistence("disk unavailable".into()));
        }
        self.inner.get_by_key(kind, key).await
    }

    async fn upsert(&self, entry: StoredEntry) -> horo_engine::Result<()> {
        if self.fail_writes {
            return Err(Error::Persistence("disk full".into()));
        }
        self.inner.upsert(entry).await
    }

    async fn delete_where(&self, kind: ReadingKind, date_before: NaiveDate) -> horo_engine::Result<u64> {
        self.inner.delete_where(kind, date_before).await
    }

    async fn count_all(&self, kind: ReadingKind) -> horo_engine::Result<u64> {
        self.inner.count_all(kind).await
    }

    async fn list_for_sign(
        &self,
        kind: ReadingKind,
        sign: Sign,
        limit: usize,
    ) -> horo_engine::Result<Vec<StoredEntry>> {
        self.inner.list_for_sign(kind, sign, limit).await
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn cache_with(source: Arc<ProbeSource>, store: Arc<dyn ReadingStore>) -> ReadingCache {
    let catalog = Arc::new(ContentCatalog::new(source, "en"));
    ReadingCache::new(catalog, store)
}

#[tokio::test]
async fn test_second_request_does_not_load_content() {
    let source = ProbeSource::new(Some(DOC), 0);
    let store = Arc::new(MemoryReadingStore::new());
    let cache = cache_with(source.clone(), store.clone());

    let first: Vec<_> = cache.get_daily(Sign::Leo, date(2024, 8, 1)).collect().await;
    assert!(first[0].is_loading());
    let reading = first[1].success().cloned().expect("first request succeeds");
    assert_eq!(cache.catalog().load_count(), 1);
    assert_eq!(store.count_all(ReadingKind::Daily).await.unwrap(), 1);

    let second: Vec<_> = cache.get_daily(Sign::Leo, date(2024, 8, 1)).collect().await;
    assert_eq!(second, vec![CacheState::Loading, CacheState::Success(reading)]);
    assert_eq!(cache.catalog().load_count(), 1);
    assert_eq!(source.reads(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_requests_generate_once() {
    let source = ProbeSource::new(Some(DOC), 100);
    let store = Arc::new(MemoryReadingStore::new());
    let cache = cache_with(source.clone(), store.clone());

    let mut handles = Vec::new();
    for _ in 0..20 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache.fetch_daily(Sign::Virgo, date(2024, 9, 10)).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    assert!(ids.iter().all(|id| id == "virgo_2024-09-10"));
    assert_eq!(cache.catalog().load_count(), 1);
    assert_eq!(source.reads(), 1);
    assert_eq!(store.count_all(ReadingKind::Daily).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_keys_generate_independently() {
    let source = ProbeSource::new(Some(DOC), 20);
    let store = Arc::new(MemoryReadingStore::new());
    let cache = cache_with(source, store.clone());

    let mut handles = Vec::new();
    for offset in 0..5 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache
                .fetch_daily(Sign::Libra, date(2024, 10, 1) + Duration::days(offset))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.count_all(ReadingKind::Daily).await.unwrap(), 5);
}

#[tokio::test]
async fn test_dropped_request_still_persists() {
    let source = ProbeSource::new(Some(DOC), 100);
    let store = Arc::new(MemoryReadingStore::new());
    let cache = cache_with(source, store.clone());

    {
        let mut stream = Box::pin(cache.get_daily(Sign::Scorpio, date(2024, 11, 2)));
        assert_eq!(stream.next().await, Some(CacheState::Loading));
        // Start the generation, then abandon it
        let pending = tokio::time::timeout(std::time::Duration::from_millis(20), stream.next()).await;
        assert!(pending.is_err(), "generation should still be running");
    }

    let mut persisted = false;
    for _ in 0..50 {
        if cache.has_entry_for_date(Sign::Scorpio, date(2024, 11, 2)).await {
            persisted = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(persisted, "abandoned generation did not complete");
    assert_eq!(cache.catalog().load_count(), 1);
}

#[tokio::test]
async fn test_failure_is_not_cached() {
    let source = ProbeSource::new(None, 0);
    let store = Arc::new(MemoryReadingStore::new());
    let cache = cache_with(source.clone(), store.clone());

    let failed: Vec<_> = cache.get_daily(Sign::Pisces, date(2024, 3, 1)).collect().await;
    assert_eq!(failed.len(), 2);
    assert_eq!(
        failed[1].error(),
        Some(
            Error::Content(ContentError::Unavailable {
                locale: "en".into(),
                fallback: "en".into()
            })
            .to_string()
            .as_str()
        )
    );
    assert_eq!(store.count_all(ReadingKind::Daily).await.unwrap(), 0);
    assert!(!cache.has_entry_for_date(Sign::Pisces, date(2024, 3, 1)).await);

    source.set_document(DOC);
    let reading = cache.fetch_daily(Sign::Pisces, date(2024, 3, 1)).await.unwrap();
    assert_eq!(reading.id, "pisces_2024-03-01");
    assert_eq!(store.count_all(ReadingKind::Daily).await.unwrap(), 1);
}

#[tokio::test]
async fn test_write_failure_still_succeeds() {
    let source = ProbeSource::new(Some(DOC), 0);
    let store = Arc::new(FlakyStore {
        fail_writes: true,
        ..FlakyStore::default()
    });
    let cache = cache_with(source, store.clone());

    let states: Vec<_> = cache.get_weekly(Sign::Gemini, date(2024, 6, 5)).collect().await;
    let reading = states[1].success().expect("write failure is not fatal");
    assert_eq!(reading.week_start, date(2024, 6, 3));
    assert_eq!(store.count_all(ReadingKind::Weekly).await.unwrap(), 0);
}

#[tokio::test]
async fn test_read_failure_is_terminal_error() {
    let source = ProbeSource::new(Some(DOC), 0);
    let store = Arc::new(FlakyStore {
        fail_reads: true,
        ..FlakyStore::default()
    });
    let cache = cache_with(source.clone(), store);

    let states: Vec<_> = cache.get_daily(Sign::Aries, date(2024, 4, 1)).collect().await;
    assert_eq!(
        states,
        vec![
            CacheState::Loading,
            CacheState::Error("Persistence error: disk unavailable".into())
        ]
    );
    assert_eq!(source.reads(), 0);
    assert!(!cache.has_entry_for_today(Sign::Aries).await);
}
