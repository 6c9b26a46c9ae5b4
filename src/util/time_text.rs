//! Text codec for LFG start times.
//!
//! Members type start times as `YYYY-MM-DD:HH-MM`, optionally prefixed with an IANA zone
//! name (`Europe/Berlin:2025-12-24:20-30`). The same shape, always zone-qualified and
//! without zero padding, is what the `lfg.datetime` column stores. It is only guaranteed
//! to round-trip through this module, it is not ISO 8601.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::{config::DAY_SECONDS, error::time_text::TimeTextError};

/// Parses `[zone:]YYYY-MM-DD:HH-MM` into a zone-aware instant.
///
/// The two-part form is interpreted in `default_zone`; the three-part form uses the
/// named zone. Seconds are always zero. Local times that fall into a DST fold resolve
/// to the earlier instant.
///
/// # Arguments
/// - `text` - The text to parse, surrounding whitespace is ignored
/// - `default_zone` - Zone for the two-part form
///
/// # Returns
/// - `Ok(DateTime<Tz>)` - The parsed instant in its zone
/// - `Err(TimeTextError)` - Wrong part count, non-integer component, unknown zone, or a
///   local time that does not exist
pub fn parse(text: &str, default_zone: Tz) -> Result<DateTime<Tz>, TimeTextError> {
    let parts: Vec<&str> = text.trim().split(':').collect();

    let (zone, date, time) = match parts.as_slice() {
        [date, time] => (default_zone, *date, *time),
        [zone, date, time] => (
            zone.parse::<Tz>()
                .map_err(|_| TimeTextError::UnknownZone(zone.to_string()))?,
            *date,
            *time,
        ),
        _ => return Err(TimeTextError::PartCount(parts.len())),
    };

    let [year, month, day] = components::<3>(date)?;
    let [hour, minute] = components::<2>(time)?;

    let naive = NaiveDate::from_ymd_opt(year, to_u32(month)?, to_u32(day)?)
        .zip(NaiveTime::from_hms_opt(to_u32(hour)?, to_u32(minute)?, 0))
        .map(|(date, time)| date.and_time(time))
        .ok_or_else(|| TimeTextError::InvalidDateTime(format!("{}:{}", date, time)))?;

    zone.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| TimeTextError::InvalidDateTime(naive.to_string()))
}

/// Formats an instant as `zone:year-month-day:hour-minute` without zero padding.
pub fn format(instant: &DateTime<Tz>) -> String {
    format!(
        "{}:{}-{}-{}:{}-{}",
        instant.timezone().name(),
        instant.year(),
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute()
    )
}

/// Long-form local date and time for display, e.g. `2025년 12월 24일 20시 30분 (Asia/Seoul)`.
pub fn humanize(instant: &DateTime<Tz>) -> String {
    format!(
        "{}년 {}월 {}일 {}시 {}분 ({})",
        instant.year(),
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute(),
        instant.timezone().name()
    )
}

/// Whole seconds from `now` until `instant`, floored, negative once `instant` has passed.
pub fn seconds_until(instant: &DateTime<Tz>, now: DateTime<Utc>) -> i64 {
    let delta = instant.signed_duration_since(now);
    let seconds = delta.num_seconds();

    // num_seconds truncates toward zero
    if delta < TimeDelta::seconds(seconds) {
        seconds - 1
    } else {
        seconds
    }
}

/// Renders a signed number of seconds as `in 1d 2h 5m` or `3h 0m ago`.
pub fn humanize_duration(seconds: i64) -> String {
    let magnitude = seconds.unsigned_abs() as i64;
    let days = magnitude / DAY_SECONDS;
    let hours = (magnitude % DAY_SECONDS) / 3600;
    let minutes = (magnitude % 3600) / 60;

    let body = if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    };

    if seconds < 0 {
        format!("{} ago", body)
    } else {
        format!("in {}", body)
    }
}

fn components<const N: usize>(text: &str) -> Result<[i32; N], TimeTextError> {
    let values = text
        .split('-')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| TimeTextError::InvalidComponent(part.to_string()))
        })
        .collect::<Result<Vec<i32>, _>>()?;

    values
        .try_into()
        .map_err(|_| TimeTextError::InvalidComponent(text.to_string()))
}

fn to_u32(value: i32) -> Result<u32, TimeTextError> {
    u32::try_from(value).map_err(|_| TimeTextError::InvalidComponent(value.to_string()))
}
