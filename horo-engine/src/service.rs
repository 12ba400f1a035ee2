//! Public query surface
//!
//! `HoroscopeService` bundles the cache, evictor and catalog behind the
//! operations callers use. Every query is scoped to one request; nothing here
//! retries.

use chrono::NaiveDate;
use futures::Stream;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use horo_common::time::{days_before, today};

use crate::cache::ReadingCache;
use crate::compatibility::{assess_with, Compatibility};
use crate::content::ContentCatalog;
use crate::error::{Error, Result};
use crate::evictor::CacheEvictor;
use crate::reading::{Reading, WeeklyReading};
use crate::state::CacheState;
use crate::store::{ReadingKind, ReadingStore};
use crate::zodiac::{self, Sign, SignInfo};

/// Result of a `clear_old_cache` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvictionReport {
    pub cutoff: NaiveDate,
    pub daily_deleted: u64,
    pub weekly_deleted: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub daily: u64,
    pub weekly: u64,
}

/// Longest span `get_horoscope_range` accepts
pub const MAX_RANGE_DAYS: i64 = 366;

#[derive(Clone)]
pub struct HoroscopeService {
    cache: ReadingCache,
    evictor: CacheEvictor,
}

impl HoroscopeService {
    pub fn new(catalog: Arc<ContentCatalog>, store: Arc<dyn ReadingStore>) -> Self {
        let evictor = CacheEvictor::new(Arc::clone(&store));
        Self {
            cache: ReadingCache::new(catalog, store),
            evictor,
        }
    }

    pub fn cache(&self) -> &ReadingCache {
        &self.cache
    }

    pub fn evictor(&self) -> &CacheEvictor {
        &self.evictor
    }

    pub fn get_daily_horoscope(
        &self,
        sign: Sign,
        date: NaiveDate,
    ) -> impl Stream<Item = CacheState<Reading>> + Send + 'static {
        self.cache.get_daily(sign, date)
    }

    /// `week_start` may be any date in the week; it is normalized to Monday
    pub fn get_weekly_horoscope(
        &self,
        sign: Sign,
        week_start: NaiveDate,
    ) -> impl Stream<Item = CacheState<WeeklyReading>> + Send + 'static {
        self.cache.get_weekly(sign, week_start)
    }

    /// Daily reading for someone born on `birthdate`
    pub fn get_user_daily_horoscope(
        &self,
        birthdate: NaiveDate,
        date: NaiveDate,
    ) -> impl Stream<Item = CacheState<Reading>> + Send + 'static {
        let sign = zodiac::resolve(birthdate);
        debug!(%birthdate, %sign, "Resolved sign from birthdate");
        self.cache.get_daily(sign, date)
    }

    /// Terminal state of each day in `start..=end`
    pub async fn get_horoscope_range(
        &self,
        sign: Sign,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CacheState<Reading>>> {
        if end < start {
            return Err(Error::InvalidInput(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
        if (end - start).num_days() >= MAX_RANGE_DAYS {
            return Err(Error::InvalidInput(format!(
                "range longer than {} days",
                MAX_RANGE_DAYS
            )));
        }

        let mut states = Vec::new();
        let mut date = start;
        while date <= end {
            states.push(CacheState::from(self.cache.fetch_daily(sign, date).await));
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        Ok(states)
    }

    /// Persisted daily reading by id; `None` when it was never cached
    pub async fn get_horoscope_by_id(&self, id: &str) -> Result<Option<Reading>> {
        Ok(self.cache.cached_daily(id).await?.map(|entry| entry.reading))
    }

    /// Most recent cached daily readings for `sign`, newest first
    pub async fn get_cached_horoscopes(&self, sign: Sign, limit: usize) -> Result<Vec<Reading>> {
        self.cache.recent_daily(sign, limit).await
    }

    pub async fn has_todays_horoscope(&self, sign: Sign) -> bool {
        self.cache.has_entry_for_today(sign).await
    }

    /// Compatibility using the active bank's list when it has one
    pub async fn get_compatibility(&self, a: Sign, b: Sign) -> Compatibility {
        let locale = self.cache.locale().await;
        let from_bank = match self.cache.catalog().load(&locale).await {
            Ok(bank) => bank
                .sign(a)
                .map(|content| content.compatible_signs.clone())
                .filter(|signs| !signs.is_empty()),
            Err(e) => {
                debug!(error = %e, "Content unavailable for compatibility, using static table");
                None
            }
        };

        match from_bank {
            Some(compatible) => assess_with(a, b, &compatible),
            None => assess_with(a, b, a.compatible_signs()),
        }
    }

    /// Delete readings older than `days_to_keep` days (daily by date, weekly by week start)
    pub async fn clear_old_cache(&self, days_to_keep: u32) -> Result<EvictionReport> {
        let cutoff = days_before(today(), u64::from(days_to_keep));
        let daily_deleted = self.evictor.evict_older_than(cutoff).await?;
        let weekly_deleted = self.evictor.evict_weekly_older_than(cutoff).await?;

        info!(%cutoff, daily_deleted, weekly_deleted, "Cleared old cache");
        Ok(EvictionReport {
            cutoff,
            daily_deleted,
            weekly_deleted,
        })
    }

    pub fn resolve_sign(&self, date: NaiveDate) -> Sign {
        zodiac::resolve(date)
    }

    pub fn sign_info(&self, sign: Sign) -> SignInfo {
        zodiac::info(sign)
    }

    pub async fn set_locale(&self, locale: &str) {
        self.cache.set_locale(locale).await
    }

    pub async fn cache_stats(&self) -> Result<CacheStats> {
        let store = self.cache.store();
        Ok(CacheStats {
            daily: store.count_all(ReadingKind::Daily).await?,
            weekly: store.count_all(ReadingKind::Weekly).await?,
        })
    }
}
