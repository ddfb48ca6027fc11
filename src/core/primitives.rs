use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::core::types::RowRejection;

pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a row date.
///
/// Accepts plain `YYYY-MM-DD` and full RFC 3339 timestamps; for the latter the
/// UTC calendar date is kept.
#[must_use]
pub fn parse_observation_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, WIRE_DATE_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|time| time.naive_utc().date())
}

pub(crate) fn parse_observation_value(raw: &serde_json::Value) -> Result<f64, RowRejection> {
    let value = match raw {
        serde_json::Value::Number(number) => {
            number.as_f64().ok_or(RowRejection::UnparsableValue)?
        }
        serde_json::Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| RowRejection::UnparsableValue)?,
        _ => return Err(RowRejection::UnparsableValue),
    };
    if !value.is_finite() {
        return Err(RowRejection::NonFiniteValue);
    }
    Ok(value)
}

/// Seconds since the unix epoch at UTC midnight of `date`.
#[must_use]
pub fn date_to_unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
