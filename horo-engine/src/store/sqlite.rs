//! SQLite reading store
//!
//! Tables are created by `horo_common::db::init_database`. Daily and weekly
//! readings share a layout and live in separate tables.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::{ReadingKind, ReadingStore, StoredEntry};
use crate::error::{Error, Result};
use crate::zodiac::Sign;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct SqliteReadingStore {
    pool: SqlitePool,
}

impl SqliteReadingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn table(kind: ReadingKind) -> &'static str {
    match kind {
        ReadingKind::Daily => "daily_readings",
        ReadingKind::Weekly => "weekly_readings",
    }
}

fn entry_from_row(kind: ReadingKind, row: &sqlx::sqlite::SqliteRow) -> Result<StoredEntry> {
    let key: String = row.try_get("id")?;
    let sign: String = row.try_get("sign")?;
    let subject_date: String = row.try_get("subject_date")?;
    let payload: String = row.try_get("payload")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    let sign = sign
        .parse::<Sign>()
        .map_err(|e| Error::Persistence(format!("row {}: {}", key, e)))?;
    let subject_date = NaiveDate::parse_from_str(&subject_date, DATE_FORMAT)
        .map_err(|e| Error::Persistence(format!("row {}: bad subject_date: {}", key, e)))?;

    Ok(StoredEntry {
        key,
        kind,
        sign,
        subject_date,
        payload,
        created_at,
    })
}

#[async_trait]
impl ReadingStore for SqliteReadingStore {
    async fn get_by_key(&self, kind: ReadingKind, key: &str) -> Result<Option<StoredEntry>> {
        let sql = format!(
            "SELECT id, sign, subject_date, payload, created_at FROM {} WHERE id = ?",
            table(kind)
        );
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| entry_from_row(kind, &row)).transpose()
    }

    async fn upsert(&self, entry: StoredEntry) -> Result<()> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, sign, subject_date, payload, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                sign = excluded.sign,
                subject_date = excluded.subject_date,
                payload = excluded.payload,
                created_at = excluded.created_at
            "#,
            table(entry.kind)
        );
        sqlx::query(&sql)
            .bind(&entry.key)
            .bind(entry.sign.id())
            .bind(entry.subject_date.format(DATE_FORMAT).to_string())
            .bind(&entry.payload)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await?;

        debug!(key = %entry.key, kind = %entry.kind, "Upserted reading");
        Ok(())
    }

    async fn delete_where(&self, kind: ReadingKind, date_before: NaiveDate) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE subject_date < ?", table(kind));
        let result = sqlx::query(&sql)
            .bind(date_before.format(DATE_FORMAT).to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_all(&self, kind: ReadingKind) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table(kind));
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn list_for_sign(
        &self,
        kind: ReadingKind,
        sign: Sign,
        limit: usize,
    ) -> Result<Vec<StoredEntry>> {
        let sql = format!(
            r#"
            SELECT id, sign, subject_date, payload, created_at FROM {}
            WHERE sign = ?
            ORDER BY subject_date DESC
            LIMIT ?
            "#,
            table(kind)
        );
        let rows = sqlx::query(&sql)
            .bind(sign.id())
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| entry_from_row(kind, row)).collect()
    }
}
