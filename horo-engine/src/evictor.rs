//! Retention-based eviction
//!
//! Staleness is judged by a reading's subject date (reading date or week
//! start), not by when it was generated.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info};

use horo_common::time::{days_before, today, week_start};

use crate::error::Result;
use crate::store::{ReadingKind, ReadingStore};

/// How long readings are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub daily_days: u32,
    pub weekly_weeks: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            daily_days: 30,
            weekly_weeks: 8,
        }
    }
}

impl RetentionPolicy {
    /// Daily readings dated before this are stale
    ///
    /// A retention reaching past the calendar's start keeps everything.
    pub fn daily_cutoff(&self, today: NaiveDate) -> NaiveDate {
        days_before(today, u64::from(self.daily_days))
    }

    /// Weekly readings starting before this are stale
    pub fn weekly_cutoff(&self, today: NaiveDate) -> NaiveDate {
        days_before(week_start(today), u64::from(self.weekly_weeks) * 7)
    }
}

#[derive(Clone)]
pub struct CacheEvictor {
    store: Arc<dyn ReadingStore>,
}

impl CacheEvictor {
    pub fn new(store: Arc<dyn ReadingStore>) -> Self {
        Self { store }
    }

    /// Delete daily readings dated strictly before `cutoff`
    pub async fn evict_older_than(&self, cutoff: NaiveDate) -> Result<u64> {
        let deleted = self.store.delete_where(ReadingKind::Daily, cutoff).await?;
        info!(%cutoff, deleted, "Evicted daily readings");
        Ok(deleted)
    }

    /// Delete weekly readings whose week starts strictly before `cutoff`
    pub async fn evict_weekly_older_than(&self, cutoff: NaiveDate) -> Result<u64> {
        let deleted = self.store.delete_where(ReadingKind::Weekly, cutoff).await?;
        info!(%cutoff, deleted, "Evicted weekly readings");
        Ok(deleted)
    }

    /// Apply `retention` relative to `today`, returning (daily, weekly) counts
    pub async fn evict_with(&self, retention: RetentionPolicy, today: NaiveDate) -> Result<(u64, u64)> {
        let daily = self.evict_older_than(retention.daily_cutoff(today)).await?;
        let weekly = self
            .evict_weekly_older_than(retention.weekly_cutoff(today))
            .await?;
        Ok((daily, weekly))
    }

    /// Evict on a fixed period until the returned task is aborted
    ///
    /// The first pass runs immediately. Failures are logged and the loop
    /// continues with the next tick.
    pub fn spawn_periodic(self, period: std::time::Duration, retention: RetentionPolicy) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = interval(period);
            loop {
                tick.tick().await;
                debug!(?retention, "Periodic eviction pass");
                if let Err(e) = self.evict_with(retention, today()).await {
                    error!(error = %e, "Periodic eviction failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryReadingStore, StoredEntry};
    use chrono::{Duration, Utc};

    fn entry(kind: ReadingKind, date: NaiveDate) -> StoredEntry {
        StoredEntry {
            key: format!("aries_{}_{}", kind, date),
            kind,
            sign: crate::zodiac::Sign::Aries,
            subject_date: date,
            payload: "{}".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_retention_cutoffs() {
        let policy = RetentionPolicy::default();
        // Thursday
        let day = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        assert_eq!(policy.daily_cutoff(day), NaiveDate::from_ymd_opt(2024, 2, 13).unwrap());
        assert_eq!(policy.weekly_cutoff(day), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[tokio::test]
    async fn test_huge_retention_keeps_everything() {
        let policy = RetentionPolicy {
            daily_days: u32::MAX,
            weekly_weeks: u32::MAX,
        };
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(policy.daily_cutoff(day), NaiveDate::MIN);
        assert_eq!(policy.weekly_cutoff(day), NaiveDate::MIN);

        let store = Arc::new(MemoryReadingStore::new());
        let ancient = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        store.upsert(entry(ReadingKind::Daily, ancient)).await.unwrap();
        store.upsert(entry(ReadingKind::Weekly, week_start(ancient))).await.unwrap();

        let evictor = CacheEvictor::new(store.clone());
        assert_eq!(evictor.evict_with(policy, day).await.unwrap(), (0, 0));
        assert_eq!(store.count_all(ReadingKind::Daily).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_evict_boundary() {
        let store = Arc::new(MemoryReadingStore::new());
        let today = today();
        let old = today - Duration::days(31);
        let recent = today - Duration::days(29);
        store.upsert(entry(ReadingKind::Daily, old)).await.unwrap();
        store.upsert(entry(ReadingKind::Daily, recent)).await.unwrap();

        let evictor = CacheEvictor::new(store.clone());
        let deleted = evictor
            .evict_older_than(today - Duration::days(30))
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        let survivors = store
            .list_for_sign(ReadingKind::Daily, crate::zodiac::Sign::Aries, 10)
            .await
            .unwrap();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].subject_date, recent);
    }

    #[tokio::test]
    async fn test_periodic_eviction_runs_immediately() {
        let store = Arc::new(MemoryReadingStore::new());
        let stale = today() - Duration::days(400);
        store.upsert(entry(ReadingKind::Daily, stale)).await.unwrap();
        store.upsert(entry(ReadingKind::Weekly, week_start(stale))).await.unwrap();

        let handle = CacheEvictor::new(store.clone())
            .spawn_periodic(std::time::Duration::from_secs(3600), RetentionPolicy::default());

        for _ in 0..50 {
            if store.count_all(ReadingKind::Daily).await.unwrap() == 0
                && store.count_all(ReadingKind::Weekly).await.unwrap() == 0
            {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_eq!(store.count_all(ReadingKind::Daily).await.unwrap(), 0);
        assert_eq!(store.count_all(ReadingKind::Weekly).await.unwrap(), 0);
    }
}
