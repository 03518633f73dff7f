//! Bout date parsing and canonicalization.
//!
//! Detail pages split a bout date into a year fragment (`2025`) and a
//! month/day fragment (`Oct 25`). Everything downstream of extraction uses
//! the canonical `YYYY-MM-DD` form.

use chrono::NaiveDate;

use crate::error::AppError;

/// Canonical output format.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Format of the concatenated `<month/day> <year>` fragments.
///
/// `%B` accepts both abbreviated and full month names when parsing.
pub const SOURCE_FORMAT: &str = "%B %d %Y";

/// Parse the two date fragments of a bout row.
pub fn parse_fragments(year: &str, month_day: &str) -> Result<NaiveDate, AppError> {
    let joined = format!("{} {}", month_day.trim(), year.trim());
    NaiveDate::parse_from_str(&joined, SOURCE_FORMAT)
        .map_err(|e| AppError::MalformedBoutRow(format!("unparseable date '{joined}': {e}")))
}

/// Parse a date in either canonical or source (`Mon DD YYYY`) form.
pub fn parse_lenient(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, CANONICAL_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, SOURCE_FORMAT))
        .map_err(|e| AppError::MalformedBoutRow(format!("unparseable date '{raw}': {e}")))
}

/// Normalize a date string to `YYYY-MM-DD`. Idempotent on canonical input.
pub fn normalize(raw: &str) -> Result<String, AppError> {
    Ok(parse_lenient(raw)?.format(CANONICAL_FORMAT).to_string())
}

/// Serde adapter: writes canonical dates, reads either form.
pub mod canonical {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(super::CANONICAL_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_lenient(&raw).map_err(serde::de::Error::custom)
    }
}
