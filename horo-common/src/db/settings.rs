//! Key/value settings table
//!
//! Plain string storage. Which keys exist and what their defaults are is up
//! to the crate that reads them; a NULL value reads as absent.

use crate::Result;
use sqlx::SqlitePool;

/// Create the settings table
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Read a setting value
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|(value,)| value))
}

/// Write a setting value
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;

    #[tokio::test]
    async fn test_table_starts_empty() {
        let pool = init_memory_database().await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_set_overwrites_value() {
        let pool = init_memory_database().await.unwrap();

        set_setting(&pool, "content_locale", "en").await.unwrap();
        set_setting(&pool, "content_locale", "fr").await.unwrap();

        let stored = get_setting(&pool, "content_locale").await.unwrap();
        assert_eq!(stored.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_null_value_reads_as_absent() {
        let pool = init_memory_database().await.unwrap();

        sqlx::query("INSERT INTO settings (key, value) VALUES ('daily_retention_days', NULL)")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(get_setting(&pool, "daily_retention_days").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_missing_setting() {
        let pool = init_memory_database().await.unwrap();
        assert_eq!(get_setting(&pool, "no_such_key").await.unwrap(), None);
    }
}
