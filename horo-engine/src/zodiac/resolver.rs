//! Date to sign resolution

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

use super::sign::{Element, Quality, Sign};

/// Returned when no interval matches; unreachable with the fixed table
pub const DEFAULT_SIGN: Sign = Sign::Aries;

/// Map a calendar date to its sign
///
/// Total: every valid date matches exactly one interval. Should the table ever
/// leave a gap, [`DEFAULT_SIGN`] is returned and the anomaly logged.
pub fn resolve(date: NaiveDate) -> Sign {
    let month = date.month();
    let day = date.day();

    let found = Sign::ALL
        .into_iter()
        .find(|sign| interval_contains(*sign, month, day));

    match found {
        Some(sign) => sign,
        None => {
            warn!(%date, default = %DEFAULT_SIGN, "No sign interval matched date");
            DEFAULT_SIGN
        }
    }
}

fn interval_contains(sign: Sign, month: u32, day: u32) -> bool {
    let data = sign.data();
    let (start, end) = (data.start, data.end);

    if sign.wraps_year() {
        (month == start.month && day >= start.day) || (month == end.month && day <= end.day)
    } else {
        (month == start.month && day >= start.day)
            || (month == end.month && day <= end.day)
            || (start.month < month && month < end.month)
    }
}

/// Descriptive attributes of a sign
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignInfo {
    pub sign: Sign,
    pub symbol: &'static str,
    pub date_range: String,
    pub element: Element,
    pub quality: Quality,
    pub ruling_planet: &'static str,
    pub compatible_signs: Vec<Sign>,
    pub strengths: Vec<&'static str>,
    pub challenges: Vec<&'static str>,
}

/// Pure lookup of a sign's attributes
pub fn info(sign: Sign) -> SignInfo {
    let data = sign.data();
    SignInfo {
        sign,
        symbol: data.symbol,
        date_range: sign.date_range(),
        element: data.element,
        quality: data.quality,
        ruling_planet: data.ruling_planet,
        compatible_signs: data.compatible.to_vec(),
        strengths: data.strengths.to_vec(),
        challenges: data.challenges.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_wraparound_dates() {
        assert_eq!(resolve(date(2024, 12, 31)), Sign::Capricorn);
        assert_eq!(resolve(date(2025, 1, 1)), Sign::Capricorn);
        assert_eq!(resolve(date(2024, 12, 22)), Sign::Capricorn);
        assert_eq!(resolve(date(2025, 1, 19)), Sign::Capricorn);
        assert_eq!(resolve(date(2025, 1, 20)), Sign::Aquarius);
        assert_eq!(resolve(date(2024, 12, 21)), Sign::Sagittarius);
    }

    #[test]
    fn test_every_boundary() {
        for sign in Sign::ALL {
            let data = sign.data();
            assert_eq!(resolve(date(2024, data.start.month, data.start.day)), sign);
            assert_eq!(resolve(date(2024, data.end.month, data.end.day)), sign);
        }
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(resolve(date(2024, 2, 29)), Sign::Pisces);
    }

    #[test]
    fn test_partition_covers_leap_year_exactly_once() {
        let mut day = date(2024, 1, 1);
        let mut counted = 0;
        while day.year() == 2024 {
            let matches = Sign::ALL
                .into_iter()
                .filter(|s| interval_contains(*s, day.month(), day.day()))
                .count();
            assert_eq!(matches, 1, "{} matched {} signs", day, matches);
            counted += 1;
            day = day.succ_opt().unwrap();
        }
        assert_eq!(counted, 366);
    }

    #[test]
    fn test_info_lookup() {
        let scorpio = info(Sign::Scorpio);
        assert_eq!(scorpio.element, Element::Water);
        assert_eq!(scorpio.quality, Quality::Fixed);
        assert_eq!(scorpio.ruling_planet, "Mars/Pluto");
        assert!(scorpio.compatible_signs.contains(&Sign::Pisces));
        assert!(scorpio.strengths.contains(&"Loyal"));
        assert!(scorpio.challenges.contains(&"Secretive"));
    }
}
