use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("unable to parse date {0:?}")]
pub struct DateError(pub String);

// Date-times without an offset are read as UTC
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parses a date expression as written in front matter.
///
/// Offsets are honoured and converted to UTC. Date-times without an offset
/// and plain dates are taken as UTC, so the result does not depend on the
/// host time zone. A plain date maps to midnight.
pub fn parse_date(buf: &str) -> Result<DateTime<Utc>, DateError> {
    let s = buf.trim();
    if s.is_empty() {
        return Err(DateError(buf.to_string()));
    }

    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Ok(d.with_timezone(&Utc));
    }

    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Ok(d.with_timezone(&Utc));
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(d.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(d) = d.and_hms_opt(0, 0, 0) {
                return Ok(d.and_utc());
            }
        }
    }

    Err(DateError(buf.to_string()))
}

pub fn format_date(date_time: &DateTime<Utc>) -> String {
    date_time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
