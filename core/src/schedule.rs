//! Class meeting times for building a semester calendar.

use std::fmt;

use chrono::{DateTime, Days, Local, TimeDelta, TimeZone};

use crate::error::ApiError;

/// Start and end of one class meeting as RFC 3339 strings.
pub fn class_span<Tz>(start: &DateTime<Tz>, length_minutes: i64) -> (String, String)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let end = start.clone() + TimeDelta::minutes(length_minutes);
    (start.to_rfc3339(), end.to_rfc3339())
}

/// The first meeting of the semester in local time.
pub fn first_class(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<DateTime<Local>, ApiError> {
    Local
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_else(|| {
            ApiError::InvalidArgument(format!(
                "{year}-{month:02}-{day:02} {hour:02}:{minute:02} is not a unique local time"
            ))
        })
}

/// Meeting times for a twice-weekly class (Monday/Wednesday or
/// Tuesday/Thursday): alternately two and five days apart, wall-clock time
/// preserved.
///
/// Fails if a meeting falls on a wall-clock time that does not exist or is
/// ambiguous in `Tz`, or lies outside the representable range.
pub fn twice_weekly<Tz: TimeZone>(start: DateTime<Tz>, count: usize) -> Result<Vec<DateTime<Tz>>, ApiError> {
    let mut meetings = Vec::with_capacity(count);
    let mut current = start;
    for i in 0..count {
        if i > 0 {
            let gap = if i % 2 == 1 { 2 } else { 5 };
            current = current.clone().checked_add_days(Days::new(gap)).ok_or_else(|| {
                ApiError::InvalidArgument(format!(
                    "meeting {} falls {gap} days after {}, which has no single local time",
                    i + 1,
                    current.naive_local()
                ))
            })?;
        }
        meetings.push(current.clone());
    }
    Ok(meetings)
}
