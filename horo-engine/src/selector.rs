//! Deterministic template selection
//!
//! Index choice depends only on the date and the template count, so a reading
//! regenerated from the same bank is identical to the one first produced.

use chrono::NaiveDate;
use horo_common::time::{epoch_day, week_end, week_start};
use tracing::{debug, warn};

use crate::content::{ContentBank, DailyTemplate, WeeklyTemplate};
use crate::error::{Error, Result};
use crate::reading::{daily_key, weekly_key, Reading, WeeklyReading};
use crate::zodiac::Sign;

const FALLBACK_WEEKLY_GENERAL: &str = "This week brings opportunities for growth and self-reflection.";
const FALLBACK_WEEKLY_LOVE: &str = "Relationships benefit from open communication and understanding.";
const FALLBACK_WEEKLY_CAREER: &str = "Professional matters require patience and strategic thinking.";
const FALLBACK_WEEKLY_HEALTH: &str = "Focus on balance between activity and rest for optimal well-being.";
const FALLBACK_WEEKLY_INTENSITY: f32 = 0.5;

/// Intensity derived from the template index: 0.5, 0.6, ... 0.9
pub fn intensity_for_index(index: usize) -> f32 {
    0.5 + 0.1 * (index % 5) as f32
}

/// Daily template index for `date` among `len` templates
pub fn daily_index(date: NaiveDate, len: usize) -> usize {
    epoch_day(date).rem_euclid(len as i64) as usize
}

/// Weekly template index for the week starting `week_start` among `len` templates
pub fn weekly_index(week_start: NaiveDate, len: usize) -> usize {
    epoch_day(week_start).div_euclid(7).rem_euclid(len as i64) as usize
}

/// Materialize the daily reading for `sign` on `date`
pub fn select_daily(bank: &ContentBank, sign: Sign, date: NaiveDate) -> Result<Reading> {
    let templates = bank.daily_templates(sign);
    if templates.is_empty() {
        return Err(Error::SignContentMissing(sign));
    }

    let index = daily_index(date, templates.len());
    debug!(%sign, %date, index, templates = templates.len(), "Selected daily template");

    Ok(daily_from_template(&templates[index], sign, date, index))
}

fn daily_from_template(
    template: &DailyTemplate,
    sign: Sign,
    date: NaiveDate,
    index: usize,
) -> Reading {
    let compatibility = match template.compatibility.parse::<Sign>() {
        Ok(other) => other,
        Err(_) => {
            let fallback = sign.compatible_signs().first().copied().unwrap_or(sign);
            warn!(
                %sign,
                template = %template.id,
                reference = %template.compatibility,
                %fallback,
                "Unknown compatibility reference in template"
            );
            fallback
        }
    };

    Reading {
        id: daily_key(sign, date),
        sign,
        date,
        general: template.general.clone(),
        love: template.love.clone(),
        career: template.career.clone(),
        health: template.health.clone(),
        lucky_number: template.lucky_number,
        lucky_color: template.lucky_color.clone(),
        compatibility,
        mood: template.mood.clone(),
        tags: template.tags.clone(),
        intensity: intensity_for_index(index),
    }
}

/// Materialize the weekly reading for the Monday-to-Sunday week containing `date`
///
/// A sign without weekly templates gets generic text instead of an error.
pub fn select_weekly(bank: &ContentBank, sign: Sign, date: NaiveDate) -> Result<WeeklyReading> {
    let start = week_start(date);
    let templates = bank.weekly_templates(sign);

    if templates.is_empty() {
        debug!(%sign, week_start = %start, "No weekly templates, using generic reading");
        return Ok(generic_weekly(sign, start));
    }

    let index = weekly_index(start, templates.len());
    debug!(%sign, week_start = %start, index, "Selected weekly template");

    Ok(weekly_from_template(&templates[index], sign, start, index))
}

fn weekly_from_template(
    template: &WeeklyTemplate,
    sign: Sign,
    start: NaiveDate,
    index: usize,
) -> WeeklyReading {
    WeeklyReading {
        id: weekly_key(sign, start),
        sign,
        week_start: start,
        week_end: week_end(start),
        general: template.general.clone(),
        love: template.love.clone(),
        career: template.career.clone(),
        health: template.health.clone(),
        lucky_days: template.lucky_days.clone(),
        challenging_days: template.challenging_days.clone(),
        overall_trend: template.overall_trend.clone(),
        tags: template.tags.clone(),
        intensity: intensity_for_index(index),
    }
}

fn generic_weekly(sign: Sign, start: NaiveDate) -> WeeklyReading {
    WeeklyReading {
        id: weekly_key(sign, start),
        sign,
        week_start: start,
        week_end: week_end(start),
        general: FALLBACK_WEEKLY_GENERAL.to_string(),
        love: FALLBACK_WEEKLY_LOVE.to_string(),
        career: FALLBACK_WEEKLY_CAREER.to_string(),
        health: FALLBACK_WEEKLY_HEALTH.to_string(),
        lucky_days: vec!["Tuesday".to_string(), "Friday".to_string()],
        challenging_days: vec!["Wednesday".to_string()],
        overall_trend: "Positive".to_string(),
        tags: vec![
            "growth".to_string(),
            "balance".to_string(),
            "opportunity".to_string(),
        ],
        intensity: FALLBACK_WEEKLY_INTENSITY,
    }
}
