//! Timestamp interpretation.
//!
//! Bare `YYYY-MM-DD` dates are read in a fixed UTC+02:00 offset. Whether a bare date means
//! the start of that day or the start of the next one depends on which side of a range it
//! bounds, which decides whether same-day events count as "on or before".

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use crate::errors::{DebtError, Result};

/// offset applied to bare dates and offset-less timestamps
pub const LOCAL_OFFSET_SECONDS: i32 = 2 * 60 * 60;

/// which end of a range a bare date stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    /// 00:00 local on the date itself
    Start,
    /// 00:00 local on the following date
    EndExclusive,
}

pub fn local_offset() -> FixedOffset {
    FixedOffset::east_opt(LOCAL_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// `YYYY-MM-DD` shape only; the calendar is not consulted
pub fn is_date_only(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// strict `YYYY-MM-DD` match that is also a real calendar date
pub fn parse_date_only(value: &str) -> Option<NaiveDate> {
    if !is_date_only(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// midnight local time on `date`
pub fn date_start(date: NaiveDate) -> Result<DateTime<Utc>> {
    local_offset()
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| DebtError::InvalidDate {
            message: format!("{} has no local midnight", date),
        })
}

/// midnight local time on the day after `date`
pub fn date_end_exclusive(date: NaiveDate) -> Result<DateTime<Utc>> {
    Ok(date_start(date)? + Duration::days(1))
}

pub fn date_bound(date: NaiveDate, bound: DayBound) -> Result<DateTime<Utc>> {
    match bound {
        DayBound::Start => date_start(date),
        DayBound::EndExclusive => date_end_exclusive(date),
    }
}

/// parse a timestamp field, resolving bare dates against `bound`
pub fn parse_instant(field: &str, value: &str, bound: DayBound) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Some(date) = parse_date_only(trimmed) {
        return date_bound(date, bound);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    // ISO-8601 allows the seconds to be left off an offset timestamp
    for format in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    if let Some(utc) = trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        if let Ok(naive) = NaiveDateTime::parse_from_str(utc, "%Y-%m-%dT%H:%M") {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            if let Some(dt) = local_offset().from_local_datetime(&naive).single() {
                return Ok(dt.with_timezone(&Utc));
            }
        }
    }

    Err(DebtError::timestamp(field, value))
}
