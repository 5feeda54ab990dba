//! Shared timezone lookup, offset math and offset formatting.
//!
//! Both the converter and the detector resolve identifiers and read offsets
//! through these helpers, so there is one place that decides what counts as
//! a valid identifier.

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::{OffsetName, Tz};

use crate::error::{Result, TzError};

/// Resolve an IANA identifier (or `"UTC"`) against the compiled tz database.
///
/// Matching is exact: empty strings, surrounding whitespace and wrong case
/// are all rejected.
///
/// # Errors
/// Returns `TzError::InvalidTimezone` if the identifier does not resolve.
pub fn parse_timezone(timezone: &str) -> Result<Tz> {
    if timezone.is_empty() || timezone.trim() != timezone {
        return Err(TzError::InvalidTimezone(timezone.to_string()));
    }
    timezone
        .parse::<Tz>()
        .map_err(|_| TzError::InvalidTimezone(timezone.to_string()))
}

/// Whether `timezone` names a zone in the tz database.
pub fn is_valid_timezone(timezone: &str) -> bool {
    parse_timezone(timezone).is_ok()
}

/// UTC offset of `tz` at `instant`, in minutes east of UTC.
pub fn utc_offset_minutes(tz: Tz, instant: DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&instant.naive_utc())
        .fix()
        .local_minus_utc()
        / 60
}

/// Signed minutes to add to a `from` wall clock to get the `to` wall clock.
pub fn offset_between(from: Tz, to: Tz, instant: DateTime<Utc>) -> i32 {
    utc_offset_minutes(to, instant) - utc_offset_minutes(from, instant)
}

/// Short name for the zone's offset at `instant`, e.g. `EST` or `CEST`.
///
/// Zones whose tz data carries only a numeric abbreviation get a
/// `GMT+5:30` style name instead.
pub fn abbreviation(tz: Tz, instant: DateTime<Utc>) -> String {
    let offset = tz.offset_from_utc_datetime(&instant.naive_utc());
    match offset.abbreviation() {
        Some(abbr) if !abbr.starts_with(['+', '-']) => abbr.to_string(),
        _ => gmt_name(utc_offset_minutes(tz, instant)),
    }
}

fn gmt_name(minutes: i32) -> String {
    if minutes == 0 {
        return "GMT".to_string();
    }
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    match abs % 60 {
        0 => format!("GMT{}{}", sign, abs / 60),
        m => format!("GMT{}{}:{:02}", sign, abs / 60, m),
    }
}

/// Render minutes east of UTC as `+HH:MM` / `-HH:MM`.
pub fn format_utc_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// Render a signed offset for display: `+2h`, `-6h`, `+5h 30m`.
///
/// The sign is always present; zero renders as `+0h`.
pub fn format_timezone_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let abs = offset_minutes.unsigned_abs();
    let (hours, minutes) = (abs / 60, abs % 60);
    if minutes == 0 {
        format!("{}{}h", sign, hours)
    } else {
        format!("{}{}h {}m", sign, hours, minutes)
    }
}
