//! Persistent reading store
//!
//! Readings are persisted as JSON payloads next to the columns eviction and
//! listing need (sign, subject date, creation time). The store is the single
//! source of truth for cached readings.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::reading::{daily_key, weekly_key, Reading, WeeklyReading};
use crate::zodiac::Sign;

pub use memory::MemoryReadingStore;
pub use sqlite::SqliteReadingStore;

/// Which family of readings an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    Daily,
    Weekly,
}

impl ReadingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingKind::Daily => "daily",
            ReadingKind::Weekly => "weekly",
        }
    }
}

impl std::fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-level representation of a persisted reading
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub key: String,
    pub kind: ReadingKind,
    pub sign: Sign,
    /// Reading date (daily) or week start (weekly); eviction compares this
    pub subject_date: NaiveDate,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

/// A decoded reading plus the time it was first persisted
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub reading: T,
    pub created_at: DateTime<Utc>,
}

/// Reading types the cache can persist
pub trait Cacheable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ReadingKind;

    /// Key derived from sign and subject date; the only key a reading is stored under
    fn cache_key(&self) -> String;
    /// Id carried in the payload
    fn id(&self) -> &str;
    fn sign(&self) -> Sign;
    fn subject_date(&self) -> NaiveDate;

    fn to_entry(&self, created_at: DateTime<Utc>) -> Result<StoredEntry> {
        Ok(StoredEntry {
            key: self.cache_key(),
            kind: Self::KIND,
            sign: self.sign(),
            subject_date: self.subject_date(),
            payload: serde_json::to_string(self)?,
            created_at,
        })
    }

    fn from_entry(entry: &StoredEntry) -> Result<CacheEntry<Self>> {
        Ok(CacheEntry {
            reading: serde_json::from_str(&entry.payload)?,
            created_at: entry.created_at,
        })
    }
}

impl Cacheable for Reading {
    const KIND: ReadingKind = ReadingKind::Daily;

    fn cache_key(&self) -> String {
        daily_key(self.sign, self.date)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn sign(&self) -> Sign {
        self.sign
    }

    fn subject_date(&self) -> NaiveDate {
        self.date
    }
}

impl Cacheable for WeeklyReading {
    const KIND: ReadingKind = ReadingKind::Weekly;

    fn cache_key(&self) -> String {
        weekly_key(self.sign, self.week_start)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn sign(&self) -> Sign {
        self.sign
    }

    fn subject_date(&self) -> NaiveDate {
        self.week_start
    }
}

/// Keyed storage for persisted readings
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn get_by_key(&self, kind: ReadingKind, key: &str) -> Result<Option<StoredEntry>>;

    /// Insert or replace the entry with the same key
    async fn upsert(&self, entry: StoredEntry) -> Result<()>;

    /// Delete entries whose subject date is strictly before `date_before`
    async fn delete_where(&self, kind: ReadingKind, date_before: NaiveDate) -> Result<u64>;

    async fn count_all(&self, kind: ReadingKind) -> Result<u64>;

    /// Most recent entries for `sign`, newest subject date first
    async fn list_for_sign(
        &self,
        kind: ReadingKind,
        sign: Sign,
        limit: usize,
    ) -> Result<Vec<StoredEntry>>;
}
