//! Display formatting for raw bill fields.
//!
//! Bills are stored with an ISO date and a raw status keyword. The list view
//! shows them as a short French date label (`"4 Avr. 04"`) and a localized
//! status label.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::bill::BillStatus;
use crate::error::FormatError;

/// Three-letter French month labels, capitalized.
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Naive date-time layouts, tried in order.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Date-time layouts carrying a UTC offset that RFC 3339 parsing misses
/// (no seconds).
const OFFSET_LAYOUTS: [&str; 1] = ["%Y-%m-%dT%H:%M%:z"];

/// Parse a timestamp with an explicit offset. A trailing `Z` is read as
/// `+00:00`.
fn parse_offset_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp);
    }
    let zulu;
    let value = match value.strip_suffix(['Z', 'z']) {
        Some(local) => {
            zulu = format!("{local}+00:00");
            zulu.as_str()
        }
        None => value,
    };
    OFFSET_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(value, layout).ok())
}

fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
}

/// Parse a raw bill date into the calendar date it was written with.
///
/// Accepts a calendar date (`2022-03-01`), a naive date-time
/// (`2022-03-01T10:30:00`) or a timestamp with an offset
/// (`2022-03-01T10:30:00Z`, `2022-03-01T23:00-05:00`). Offset timestamps
/// keep their local date. Surrounding whitespace is ignored.
pub fn parse_date(raw: &str) -> Result<NaiveDate, FormatError> {
    let value = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Some(timestamp) = parse_offset_datetime(value) {
        return Ok(timestamp.date_naive());
    }
    if let Some(timestamp) = parse_naive_datetime(value) {
        return Ok(timestamp.date());
    }

    Err(FormatError::InvalidDate(raw.to_owned()))
}

/// Parse a raw bill date into an instant, for chronological comparison.
///
/// Accepts the same inputs as [`parse_date`]. A calendar date is midnight
/// UTC, a naive date-time is read as UTC, and an offset timestamp is
/// converted to UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, FormatError> {
    let value = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    if let Some(timestamp) = parse_offset_datetime(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Some(timestamp) = parse_naive_datetime(value) {
        return Ok(timestamp.and_utc());
    }

    Err(FormatError::InvalidDate(raw.to_owned()))
}

/// Format a raw bill date as `"<day> <Mon>. <yy>"`, e.g. `"2004-04-04"` →
/// `"4 Avr. 04"`.
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    let date = parse_date(raw)?;
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year().rem_euclid(100)
    ))
}

/// Map a raw status keyword to its display label.
///
/// `pending` → `"En attente"`, `accepted` → `"Accepté"`, anything else →
/// `"Refusé"`.
pub fn format_status(raw: &str) -> &'static str {
    BillStatus::from_raw(raw).label()
}
