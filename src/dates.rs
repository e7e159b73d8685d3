use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::diagnostics::Diagnostics;

/// Wire format GitHub accepts for `since`/`until` filters.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot parse \"{input}\" as a date or timestamp")]
pub struct DateParseError {
    pub input: String,
}

/// Parses either `YYYY-MM-DDTHH:MM:SSZ` or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse(raw: &str) -> Result<DateTime<Utc>, DateParseError> {
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, CANONICAL_FORMAT) {
        return Ok(timestamp.and_utc());
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| DateParseError {
            input: raw.to_string(),
        })
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(CANONICAL_FORMAT).to_string()
}

/// Converts a loosely formatted date into the canonical wire string.
///
/// Bad input never fails the caller: it is reported as a warning and treated
/// as "no filter".
pub fn normalize(raw: Option<&str>, diagnostics: &dyn Diagnostics) -> Option<String> {
    let Some(raw) = raw else {
        diagnostics.warn("cannot convert an absent date to a timestamp, filter ignored");
        return None;
    };

    match parse(raw) {
        Ok(timestamp) => Some(format_timestamp(&timestamp)),
        Err(err) => {
            diagnostics.warn(&format!("{}, filter ignored", err));
            None
        }
    }
}
