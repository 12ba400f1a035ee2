//! In-memory reading store for tests and `--memory` runs

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{ReadingKind, ReadingStore, StoredEntry};
use crate::error::Result;
use crate::zodiac::Sign;

#[derive(Debug, Default)]
pub struct MemoryReadingStore {
    entries: RwLock<HashMap<(ReadingKind, String), StoredEntry>>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn get_by_key(&self, kind: ReadingKind, key: &str) -> Result<Option<StoredEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .get(&(kind, key.to_string()))
            .cloned())
    }

    async fn upsert(&self, entry: StoredEntry) -> Result<()> {
        self.entries
            .write()
            .await
            .insert((entry.kind, entry.key.clone()), entry);
        Ok(())
    }

    async fn delete_where(&self, kind: ReadingKind, date_before: NaiveDate) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(k, _), entry| *k != kind || entry.subject_date >= date_before);
        Ok((before - entries.len()) as u64)
    }

    async fn count_all(&self, kind: ReadingKind) -> Result<u64> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|(k, _)| *k == kind)
            .count() as u64)
    }

    async fn list_for_sign(
        &self,
        kind: ReadingKind,
        sign: Sign,
        limit: usize,
    ) -> Result<Vec<StoredEntry>> {
        let entries = self.entries.read().await;
        let mut matching: Vec<StoredEntry> = entries
            .values()
            .filter(|entry| entry.kind == kind && entry.sign == sign)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.subject_date.cmp(&a.subject_date));
        matching.truncate(limit);
        Ok(matching)
    }
}
