//! Converts the age shown next to a search result into seconds.
//!
//! The site renders ages in the session's locale. With the German locale the
//! tool pins via the `PREF` cookie, recent uploads read "vor 3 Stunden" and
//! older ones fall back to an absolute "15.01.2023". Months and years are
//! counted as 30 and 360 days.
use crate::error::ParseError;
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 12 * MONTH;

static RELATIVE_AGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bvor ([0-9]+) (\w+)").expect("relative age pattern"));

/// Seconds per unit word; singular and plural share a multiplier.
fn unit_seconds(unit: &str) -> Option<u64> {
    let seconds = match unit {
        "Sekunde" | "Sekunden" => 1,
        "Minute" | "Minuten" => MINUTE,
        "Stunde" | "Stunden" => HOUR,
        "Tag" | "Tagen" => DAY,
        "Woche" | "Wochen" => WEEK,
        "Monat" | "Monaten" => MONTH,
        "Jahr" | "Jahren" => YEAR,
        _ => return None,
    };
    Some(seconds)
}

/// Normalise `text` against the local calendar date.
///
/// ```
/// use tally_youtube::age::normalize_age;
///
/// assert_eq!(normalize_age("vor 3 Stunden").unwrap(), 10_800);
/// assert!(normalize_age("vor 5 Lichtjahren").is_err());
/// ```
pub fn normalize_age(text: &str) -> Result<u64, ParseError> {
    normalize_age_at(text, Local::now().date_naive())
}

/// Normalise `text` as seen on `today`.
///
/// Absolute dates count whole days only; a date after `today` yields 0.
pub fn normalize_age_at(text: &str, today: NaiveDate) -> Result<u64, ParseError> {
    let text = text.trim();

    if let Some(caps) = RELATIVE_AGE.captures(text) {
        let count: u64 = caps[1]
            .parse()
            .map_err(|_| ParseError::AgeOverflow(text.to_string()))?;
        let unit = &caps[2];
        let per_unit = unit_seconds(unit).ok_or_else(|| ParseError::UnknownAgeUnit {
            unit: unit.to_string(),
            text: text.to_string(),
        })?;
        return count
            .checked_mul(per_unit)
            .ok_or_else(|| ParseError::AgeOverflow(text.to_string()));
    }

    let published = NaiveDate::parse_from_str(text, "%d.%m.%Y")
        .map_err(|_| ParseError::UnrecognizedAge(text.to_string()))?;
    let days = (today - published).num_days().max(0) as u64;
    Ok(days * DAY)
}
