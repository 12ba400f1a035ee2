//! Read-through reading cache
//!
//! Lookups go to the store first. On a miss one generation per key runs
//! (single-flight): it re-checks the store, loads the content bank for the
//! active locale, selects the reading and persists it. Failures are returned
//! to every waiter and never stored, so the next request starts over.

use async_stream::stream;
use chrono::NaiveDate;
use futures::Stream;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use horo_common::time::{now, today, week_start};

use crate::content::{ContentBank, ContentCatalog};
use crate::error::{Error, Result};
use crate::flight::FlightGroup;
use crate::reading::{daily_key, weekly_key, Reading, WeeklyReading};
use crate::selector::{select_daily, select_weekly};
use crate::state::CacheState;
use crate::store::{CacheEntry, Cacheable, ReadingKind, ReadingStore};
use crate::zodiac::Sign;

type Selector<T> = fn(&ContentBank, Sign, NaiveDate) -> Result<T>;

#[derive(Clone)]
pub struct ReadingCache {
    catalog: Arc<ContentCatalog>,
    store: Arc<dyn ReadingStore>,
    locale: Arc<RwLock<String>>,
    daily_flights: FlightGroup<Reading>,
    weekly_flights: FlightGroup<WeeklyReading>,
}

impl ReadingCache {
    pub fn new(catalog: Arc<ContentCatalog>, store: Arc<dyn ReadingStore>) -> Self {
        let locale = catalog.default_locale().to_string();
        Self {
            catalog,
            store,
            locale: Arc::new(RwLock::new(locale)),
            daily_flights: FlightGroup::new(),
            weekly_flights: FlightGroup::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<ContentCatalog> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn ReadingStore> {
        &self.store
    }

    pub async fn locale(&self) -> String {
        self.locale.read().await.clone()
    }

    /// Switch the active locale and drop every loaded bank
    ///
    /// Readings already persisted keep the text they were generated with.
    pub async fn set_locale(&self, locale: &str) {
        let mut current = self.locale.write().await;
        if *current != locale {
            info!(from = %*current, to = locale, "Changing content locale");
            *current = locale.to_string();
        }
        drop(current);
        self.catalog.invalidate().await;
    }

    /// Daily reading as a `Loading` then terminal-state stream
    pub fn get_daily(
        &self,
        sign: Sign,
        date: NaiveDate,
    ) -> impl Stream<Item = CacheState<Reading>> + Send + 'static {
        let cache = self.clone();
        stream! {
            yield CacheState::Loading;
            yield CacheState::from(cache.fetch_daily(sign, date).await);
        }
    }

    /// Weekly reading for the week containing `date`, as a state stream
    pub fn get_weekly(
        &self,
        sign: Sign,
        date: NaiveDate,
    ) -> impl Stream<Item = CacheState<WeeklyReading>> + Send + 'static {
        let cache = self.clone();
        stream! {
            yield CacheState::Loading;
            yield CacheState::from(cache.fetch_weekly(sign, date).await);
        }
    }

    pub async fn fetch_daily(&self, sign: Sign, date: NaiveDate) -> Result<Reading> {
        let key = daily_key(sign, date);
        self.fetch(key, sign, date, &self.daily_flights, select_daily)
            .await
    }

    pub async fn fetch_weekly(&self, sign: Sign, date: NaiveDate) -> Result<WeeklyReading> {
        let start = week_start(date);
        let key = weekly_key(sign, start);
        self.fetch(key, sign, start, &self.weekly_flights, select_weekly)
            .await
    }

    async fn fetch<T: Cacheable>(
        &self,
        key: String,
        sign: Sign,
        date: NaiveDate,
        flights: &FlightGroup<T>,
        select: Selector<T>,
    ) -> Result<T> {
        if let Some(entry) = lookup::<T>(self.store.as_ref(), &key).await? {
            debug!(key = %key, kind = %T::KIND, "Cache hit");
            return Ok(entry.reading);
        }

        let cache = self.clone();
        let flight_key = key.clone();
        flights
            .run(&flight_key, move || async move {
                cache.generate(key, sign, date, select).await
            })
            .await
    }

    async fn generate<T: Cacheable>(
        &self,
        key: String,
        sign: Sign,
        date: NaiveDate,
        select: Selector<T>,
    ) -> Result<T> {
        // Another flight may have finished between our miss and this one starting
        if let Some(entry) = lookup::<T>(self.store.as_ref(), &key).await? {
            debug!(key = %key, "Cache filled while waiting");
            return Ok(entry.reading);
        }

        let locale = self.locale().await;
        let bank = self.catalog.load(&locale).await?;
        let reading = select(&bank, sign, date)?;

        info!(key = %key, kind = %T::KIND, locale = %bank.locale, "Generated reading");

        if let Err(e) = self.persist(&reading).await {
            warn!(key = %key, error = %e, "Failed to persist reading, returning it uncached");
        }

        Ok(reading)
    }

    async fn persist<T: Cacheable>(&self, reading: &T) -> Result<()> {
        let entry = reading.to_entry(now())?;
        self.store.upsert(entry).await
    }

    /// Store an externally produced daily reading, bypassing generation
    ///
    /// The reading's id must be the key of its sign and date.
    pub async fn cache_horoscope(&self, reading: &Reading) -> Result<()> {
        self.store_external(reading).await
    }

    /// Store an externally produced weekly reading, bypassing generation
    ///
    /// `week_start` must be a Monday and the id must match it.
    pub async fn cache_weekly_horoscope(&self, reading: &WeeklyReading) -> Result<()> {
        if week_start(reading.week_start) != reading.week_start {
            return Err(Error::InvalidInput(format!(
                "weekly reading {} starts on {}, not a Monday",
                reading.id, reading.week_start
            )));
        }
        self.store_external(reading).await
    }

    async fn store_external<T: Cacheable>(&self, reading: &T) -> Result<()> {
        let key = reading.cache_key();
        if reading.id() != key {
            return Err(Error::InvalidInput(format!(
                "reading id '{}' does not match its key '{}'",
                reading.id(),
                key
            )));
        }
        self.persist(reading).await?;
        debug!(key = %key, kind = %T::KIND, "Cached external reading");
        Ok(())
    }

    /// Persisted daily reading by key, without generating
    pub async fn cached_daily(&self, key: &str) -> Result<Option<CacheEntry<Reading>>> {
        lookup::<Reading>(self.store.as_ref(), key).await
    }

    /// Most recent persisted daily readings for `sign`
    pub async fn recent_daily(&self, sign: Sign, limit: usize) -> Result<Vec<Reading>> {
        self.store
            .list_for_sign(ReadingKind::Daily, sign, limit)
            .await?
            .iter()
            .map(|entry| Reading::from_entry(entry).map(|decoded| decoded.reading))
            .collect()
    }

    pub async fn has_entry_for_today(&self, sign: Sign) -> bool {
        self.has_entry_for_date(sign, today()).await
    }

    pub async fn has_entry_for_date(&self, sign: Sign, date: NaiveDate) -> bool {
        self.probe(ReadingKind::Daily, &daily_key(sign, date)).await
    }

    pub async fn has_weekly_entry(&self, sign: Sign, date: NaiveDate) -> bool {
        self.probe(ReadingKind::Weekly, &weekly_key(sign, week_start(date)))
            .await
    }

    async fn probe(&self, kind: ReadingKind, key: &str) -> bool {
        match self.store.get_by_key(kind, key).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(key, kind = %kind, error = %e, "Existence probe failed");
                false
            }
        }
    }
}

async fn lookup<T: Cacheable>(store: &dyn ReadingStore, key: &str) -> Result<Option<CacheEntry<T>>> {
    match store.get_by_key(T::KIND, key).await? {
        Some(entry) => Ok(Some(T::from_entry(&entry)?)),
        None => Ok(None),
    }
}
