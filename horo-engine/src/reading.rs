//! Materialized readings
//!
//! A reading is produced once per key by the selector, persisted by the cache
//! and never modified afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::zodiac::Sign;

/// Identity key of a daily reading: `{sign}_{YYYY-MM-DD}`
pub fn daily_key(sign: Sign, date: NaiveDate) -> String {
    format!("{}_{}", sign.id(), date.format("%Y-%m-%d"))
}

/// Identity key of a weekly reading: `{sign}_week_{YYYY-MM-DD}` (week start)
pub fn weekly_key(sign: Sign, week_start: NaiveDate) -> String {
    format!("{}_week_{}", sign.id(), week_start.format("%Y-%m-%d"))
}

/// Daily reading for one (sign, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub sign: Sign,
    pub date: NaiveDate,
    pub general: String,
    pub love: String,
    pub career: String,
    pub health: String,
    pub lucky_number: u32,
    pub lucky_color: String,
    pub compatibility: Sign,
    pub mood: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Reading strength, 0.0 to 1.0
    pub intensity: f32,
}

/// Sections of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoroscopeCategory {
    General,
    Love,
    Career,
    Health,
}

impl HoroscopeCategory {
    pub fn display_name(self) -> &'static str {
        match self {
            HoroscopeCategory::General => "General",
            HoroscopeCategory::Love => "Love & Relationships",
            HoroscopeCategory::Career => "Career & Finance",
            HoroscopeCategory::Health => "Health & Wellness",
        }
    }
}

impl Reading {
    /// One-line overview, e.g. "Today brings upbeat energy for Leo. ..."
    pub fn summary(&self) -> String {
        format!(
            "Today brings {} energy for {}. {}",
            self.mood.to_lowercase(),
            self.sign.display_name(),
            self.general
        )
    }

    pub fn category(&self, category: HoroscopeCategory) -> &str {
        match category {
            HoroscopeCategory::General => &self.general,
            HoroscopeCategory::Love => &self.love,
            HoroscopeCategory::Career => &self.career,
            HoroscopeCategory::Health => &self.health,
        }
    }
}

/// Weekly reading for one (sign, Monday-to-Sunday week)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReading {
    pub id: String,
    pub sign: Sign,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub general: String,
    pub love: String,
    pub career: String,
    pub health: String,
    #[serde(default)]
    pub lucky_days: Vec<String>,
    #[serde(default)]
    pub challenging_days: Vec<String>,
    pub overall_trend: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Energy level for the week, 0.0 to 1.0
    pub intensity: f32,
}

impl WeeklyReading {
    /// Whether `date` falls inside this week (inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.week_start <= date && date <= self.week_end
    }

    pub fn category(&self, category: HoroscopeCategory) -> &str {
        match category {
            HoroscopeCategory::General => &self.general,
            HoroscopeCategory::Love => &self.love,
            HoroscopeCategory::Career => &self.career,
            HoroscopeCategory::Health => &self.health,
        }
    }
}
