//! Content document schema and the parsed content bank
//!
//! The schema is forward compatible: unknown fields are ignored and list
//! fields (including the whole `weekly` section) default to empty.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use super::ContentError;
use crate::zodiac::Sign;

/// On-disk document, one per locale
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDocument {
    #[serde(default)]
    pub metadata: ContentMetadata,
    pub signs: Vec<SignDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub item_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignDocument {
    pub id: String,
    #[serde(default)]
    pub date_range: String,
    #[serde(default)]
    pub element: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub ruling_planet: String,
    #[serde(default)]
    pub lucky_numbers: Vec<u32>,
    #[serde(default)]
    pub lucky_colors: Vec<String>,
    #[serde(default)]
    pub compatible_signs: Vec<String>,
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub predictions: Predictions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Predictions {
    #[serde(default)]
    pub daily: Vec<DailyTemplate>,
    #[serde(default)]
    pub weekly: Vec<WeeklyTemplate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub seed: i64,
    pub general: String,
    pub love: String,
    pub career: String,
    pub health: String,
    pub lucky_number: u32,
    pub lucky_color: String,
    pub compatibility: String,
    pub mood: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub week_number: u32,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    pub general: String,
    pub love: String,
    pub career: String,
    pub health: String,
    #[serde(default)]
    pub lucky_days: Vec<String>,
    #[serde(default)]
    pub challenging_days: Vec<String>,
    #[serde(default)]
    pub overall_trend: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Per-sign content of a bank
#[derive(Debug, Clone, Default)]
pub struct SignContent {
    pub description: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub compatible_signs: Vec<Sign>,
    pub lucky_numbers: Vec<u32>,
    pub lucky_colors: Vec<String>,
    pub daily: Vec<DailyTemplate>,
    pub weekly: Vec<WeeklyTemplate>,
}

/// Parsed, immutable content for one locale
#[derive(Debug, Clone)]
pub struct ContentBank {
    pub locale: String,
    pub metadata: ContentMetadata,
    signs: HashMap<Sign, SignContent>,
}

impl ContentBank {
    /// Parse a content document
    ///
    /// Signs with unknown ids are skipped; so are unknown compatible-sign
    /// references. The first entry wins when a sign appears twice.
    pub fn parse(locale: &str, text: &str) -> Result<Self, ContentError> {
        let document: ContentDocument =
            serde_json::from_str(text).map_err(|e| ContentError::Malformed {
                locale: locale.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self::from_document(locale, document))
    }

    pub fn from_document(locale: &str, document: ContentDocument) -> Self {
        let mut signs = HashMap::new();

        for doc in document.signs {
            let sign = match doc.id.parse::<Sign>() {
                Ok(sign) => sign,
                Err(_) => {
                    warn!(locale, id = %doc.id, "Skipping unknown sign in content document");
                    continue;
                }
            };
            if signs.contains_key(&sign) {
                warn!(locale, %sign, "Duplicate sign in content document, keeping first");
                continue;
            }

            let compatible_signs = doc
                .compatible_signs
                .iter()
                .filter_map(|id| id.parse::<Sign>().ok())
                .collect();

            signs.insert(
                sign,
                SignContent {
                    description: doc.description,
                    strengths: doc.strengths,
                    weaknesses: doc.weaknesses,
                    compatible_signs,
                    lucky_numbers: doc.lucky_numbers,
                    lucky_colors: doc.lucky_colors,
                    daily: doc.predictions.daily,
                    weekly: doc.predictions.weekly,
                },
            );
        }

        Self {
            locale: locale.to_string(),
            metadata: document.metadata,
            signs,
        }
    }

    pub fn sign(&self, sign: Sign) -> Option<&SignContent> {
        self.signs.get(&sign)
    }

    pub fn daily_templates(&self, sign: Sign) -> &[DailyTemplate] {
        self.sign(sign).map(|c| c.daily.as_slice()).unwrap_or(&[])
    }

    pub fn weekly_templates(&self, sign: Sign) -> &[WeeklyTemplate] {
        self.sign(sign).map(|c| c.weekly.as_slice()).unwrap_or(&[])
    }

    /// Number of signs with content
    pub fn sign_count(&self) -> usize {
        self.signs.len()
    }
}
