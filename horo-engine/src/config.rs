//! Runtime settings
//!
//! Read from the `settings` table. A missing or unparseable value falls back
//! to its built-in default, which is written back so the table stays complete.

use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::warn;

use horo_common::config::DEFAULT_LOCALE;
use horo_common::db::settings::{get_setting, set_setting};

use crate::error::Result;
use crate::evictor::RetentionPolicy;

pub const CONTENT_LOCALE_KEY: &str = "content_locale";
pub const DAILY_RETENTION_KEY: &str = "daily_retention_days";
pub const WEEKLY_RETENTION_KEY: &str = "weekly_retention_weeks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub content_locale: String,
    pub retention: RetentionPolicy,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            content_locale: DEFAULT_LOCALE.to_string(),
            retention: RetentionPolicy::default(),
        }
    }
}

impl RuntimeSettings {
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let defaults = Self::default();

        let content_locale = match get_setting(pool, CONTENT_LOCALE_KEY).await? {
            Some(locale) if !locale.trim().is_empty() => locale.trim().to_string(),
            _ => {
                set_setting(pool, CONTENT_LOCALE_KEY, &defaults.content_locale).await?;
                defaults.content_locale
            }
        };

        let daily_days =
            load_number(pool, DAILY_RETENTION_KEY, defaults.retention.daily_days).await?;
        let weekly_weeks =
            load_number(pool, WEEKLY_RETENTION_KEY, defaults.retention.weekly_weeks).await?;

        Ok(Self {
            content_locale,
            retention: RetentionPolicy {
                daily_days,
                weekly_weeks,
            },
        })
    }
}

async fn load_number<T>(pool: &SqlitePool, key: &str, default: T) -> Result<T>
where
    T: FromStr + ToString + Copy,
{
    match get_setting(pool, key).await? {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(key, value = %raw, "Invalid setting, restoring default");
                set_setting(pool, key, &default.to_string()).await?;
                Ok(default)
            }
        },
        None => {
            set_setting(pool, key, &default.to_string()).await?;
            Ok(default)
        }
    }
}
