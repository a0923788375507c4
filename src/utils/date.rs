use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::errors::{AppError, Result};

/// ISO 8601 layouts carrying an offset, `%#z` also takes `Z` and offsets without a colon
const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];
/// Naive date-time layouts accepted, interpreted as UTC
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];
/// Date-only layouts accepted, interpreted as midnight UTC
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a release date.
///
/// This is the single rule used for both the stored marker and the vendor records, so they are always comparable:
/// - RFC 3339 and ISO 8601 timestamps keep their offset, seconds are optional
/// - naive timestamps and plain dates are taken as UTC
pub fn parse_release_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.with_timezone(&Utc));
    }
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(date_time) = DateTime::parse_from_str(value, format) {
            return Ok(date_time.with_timezone(&Utc));
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(date_time.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }
    }

    Err(AppError::DateParse(value.to_owned()))
}
