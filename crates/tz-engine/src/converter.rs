//! Wall-clock conversion between IANA timezones.
//!
//! All functions here are pure: they take every input explicitly and read
//! only the compiled tz database. The string-level functions never fail; on
//! an unresolvable timezone or malformed time they hand back the input
//! unchanged, so a display degrades to "no conversion" instead of breaking.
//!
//! A date-less time is anchored to the reference instant's calendar date in
//! the source zone. Results therefore reflect the DST state of that date,
//! and a weekly schedule converted today may shift by an hour after the next
//! transition. Callers holding a concrete booking date should use the `_at`
//! variants with that date.

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::dst::DstPolicy;
use crate::error::Result;
use crate::offset::{self, parse_timezone};
use crate::schedule::{AvailabilityRange, TimeSlot};
use crate::wallclock::WallClockTime;

pub use crate::offset::format_timezone_offset;

/// A converted wall-clock time and the number of days it moved.
///
/// `day_offset` is `1` when converting pushed the time past midnight into the
/// next day, `-1` when it fell back into the previous day, `0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedTime {
    pub time: WallClockTime,
    pub day_offset: i32,
}

/// Convert a wall-clock time from one timezone to another at `reference`.
///
/// This is the fallible core under every other conversion in this module.
///
/// # Arguments
/// - `time` -- Wall-clock time in `from`
/// - `from` -- Source IANA timezone (e.g., "Africa/Lagos")
/// - `to` -- Target IANA timezone (e.g., "America/New_York")
/// - `reference` -- Instant whose date (in `from`) anchors the conversion
/// - `policy` -- How to resolve times inside a DST gap
///
/// # Errors
/// Returns `TzError::InvalidTimezone` if either identifier does not resolve,
/// or `TzError::NonexistentLocalTime` for a gap time under `DstPolicy::Skip`.
pub fn convert_wall_clock(
    time: WallClockTime,
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
    policy: DstPolicy,
) -> Result<ConvertedTime> {
    let from_tz = parse_timezone(from)?;
    let to_tz = parse_timezone(to)?;

    if from == to {
        return Ok(ConvertedTime {
            time,
            day_offset: 0,
        });
    }

    let anchor = reference.with_timezone(&from_tz).date_naive();
    let instant = policy.resolve(from_tz, anchor.and_time(time.to_naive_time()))?;
    let rendered = instant.with_timezone(&to_tz).naive_local();

    Ok(ConvertedTime {
        time: rendered.time().into(),
        day_offset: (rendered.date() - anchor).num_days() as i32,
    })
}

/// Convert an `HH:MM` string and report any day rollover, anchored to now.
///
/// # Errors
/// Returns `TzError::InvalidTime` for a malformed time, otherwise the same
/// errors as [`convert_wall_clock`].
pub fn convert_time_detailed(time: &str, from: &str, to: &str) -> Result<ConvertedTime> {
    convert_time_detailed_at(time, from, to, Utc::now())
}

/// [`convert_time_detailed`] anchored to an explicit reference instant.
///
/// # Errors
/// Same as [`convert_time_detailed`].
pub fn convert_time_detailed_at(
    time: &str,
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> Result<ConvertedTime> {
    let parsed: WallClockTime = time.parse()?;
    convert_wall_clock(parsed, from, to, reference, DstPolicy::default())
}

/// Convert an `HH:MM` wall-clock time from `from` to `to`, anchored to today.
///
/// Returns `time` unchanged if either timezone is invalid or the time cannot
/// be parsed. Converting within the same timezone returns the time as-is.
///
/// ```
/// use tz_engine::converter::convert_time;
///
/// assert_eq!(convert_time("14:00", "UTC", "UTC"), "14:00");
/// assert_eq!(convert_time("14:00", "Invalid/TZ", "UTC"), "14:00");
/// ```
pub fn convert_time(time: &str, from: &str, to: &str) -> String {
    convert_time_at(time, from, to, Utc::now())
}

/// [`convert_time`] anchored to an explicit reference instant.
pub fn convert_time_at(time: &str, from: &str, to: &str, reference: DateTime<Utc>) -> String {
    let parsed: WallClockTime = match time.parse() {
        Ok(t) => t,
        Err(e) => {
            warn!("convert_time: {}; returning input unchanged", e);
            return time.to_string();
        }
    };

    match convert_wall_clock(parsed, from, to, reference, DstPolicy::default()) {
        Ok(converted) => converted.time.to_string(),
        Err(e) => {
            warn!(
                "convert_time {} from {} to {}: {}; returning input unchanged",
                time, from, to, e
            );
            time.to_string()
        }
    }
}

/// Convert a value that is already known-good, keeping it on failure.
fn convert_or_keep(
    time: WallClockTime,
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> ConvertedTime {
    convert_wall_clock(time, from, to, reference, DstPolicy::default()).unwrap_or_else(|e| {
        debug!("keeping {} unconverted: {}", time, e);
        ConvertedTime {
            time,
            day_offset: 0,
        }
    })
}

fn warn_if_unresolvable(op: &str, from: &str, to: &str) {
    for tz in [from, to] {
        if parse_timezone(tz).is_err() {
            warn!("{}: invalid timezone {:?}; times left unconverted", op, tz);
        }
    }
}

/// An availability range after conversion, with how far each end moved.
///
/// `range.day` is the source day. The offsets say which day each converted
/// time actually falls on relative to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedRange {
    pub range: AvailabilityRange,
    pub start_day_offset: i32,
    pub end_day_offset: i32,
}

impl ConvertedRange {
    /// Whether the converted range runs past midnight, e.g. 18:00-02:00.
    pub fn wraps_midnight(&self) -> bool {
        self.end_day_offset > self.start_day_offset
    }
}

fn convert_ranges(
    op: &str,
    ranges: &[AvailabilityRange],
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> Vec<ConvertedRange> {
    warn_if_unresolvable(op, from, to);

    ranges
        .iter()
        .map(|range| {
            let start = convert_or_keep(range.start_time, from, to, reference);
            let end = convert_or_keep(range.end_time, from, to, reference);
            ConvertedRange {
                range: AvailabilityRange {
                    start_time: start.time,
                    end_time: end.time,
                    timezone: Some(to.to_string()),
                    ..range.clone()
                },
                start_day_offset: start.day_offset,
                end_day_offset: end.day_offset,
            }
        })
        .collect()
}

/// Convert every range's start and end time from `from` to `to`.
///
/// Returns a new vector of the same length and order. Each range keeps its
/// `day` and extra fields; its `timezone` is set to `to`.
pub fn convert_availability(
    ranges: &[AvailabilityRange],
    from: &str,
    to: &str,
) -> Vec<AvailabilityRange> {
    convert_availability_at(ranges, from, to, Utc::now())
}

/// [`convert_availability`] anchored to an explicit reference instant.
pub fn convert_availability_at(
    ranges: &[AvailabilityRange],
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> Vec<AvailabilityRange> {
    convert_ranges("convert_availability", ranges, from, to, reference)
        .into_iter()
        .map(|converted| converted.range)
        .collect()
}

/// Like [`convert_availability`], but reports the day shift of both ends.
pub fn convert_availability_detailed(
    ranges: &[AvailabilityRange],
    from: &str,
    to: &str,
) -> Vec<ConvertedRange> {
    convert_availability_detailed_at(ranges, from, to, Utc::now())
}

/// [`convert_availability_detailed`] anchored to an explicit reference instant.
pub fn convert_availability_detailed_at(
    ranges: &[AvailabilityRange],
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> Vec<ConvertedRange> {
    convert_ranges("convert_availability_detailed", ranges, from, to, reference)
}

/// Like [`convert_availability`], but moves each range's `day` to the day
/// its converted start falls on.
///
/// Monday 23:00-23:30 UTC becomes Tuesday 08:00-08:30 in Tokyo. A range
/// whose end alone crosses midnight keeps its day and comes back with
/// `end_time < start_time`.
pub fn convert_availability_with_rollover(
    ranges: &[AvailabilityRange],
    from: &str,
    to: &str,
) -> Vec<AvailabilityRange> {
    convert_availability_with_rollover_at(ranges, from, to, Utc::now())
}

/// [`convert_availability_with_rollover`] anchored to an explicit reference instant.
pub fn convert_availability_with_rollover_at(
    ranges: &[AvailabilityRange],
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> Vec<AvailabilityRange> {
    convert_ranges("convert_availability_with_rollover", ranges, from, to, reference)
        .into_iter()
        .map(|converted| AvailabilityRange {
            day: converted.range.day.shifted(converted.start_day_offset),
            ..converted.range
        })
        .collect()
}

/// Convert every slot's time from `from` to `to`, keeping its `day`.
pub fn convert_time_slots(slots: &[TimeSlot], from: &str, to: &str) -> Vec<TimeSlot> {
    convert_time_slots_at(slots, from, to, Utc::now())
}

/// [`convert_time_slots`] anchored to an explicit reference instant.
pub fn convert_time_slots_at(
    slots: &[TimeSlot],
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> Vec<TimeSlot> {
    warn_if_unresolvable("convert_time_slots", from, to);

    slots
        .iter()
        .map(|slot| TimeSlot {
            time: convert_or_keep(slot.time, from, to, reference).time,
            timezone: Some(to.to_string()),
            ..slot.clone()
        })
        .collect()
}

/// Like [`convert_time_slots`], but moves each slot's `day` when the
/// conversion crosses midnight.
///
/// Monday 23:30 UTC becomes Tuesday 08:30 in Tokyo rather than Monday 08:30.
pub fn convert_time_slots_with_rollover(
    slots: &[TimeSlot],
    from: &str,
    to: &str,
) -> Vec<TimeSlot> {
    convert_time_slots_with_rollover_at(slots, from, to, Utc::now())
}

/// [`convert_time_slots_with_rollover`] anchored to an explicit reference instant.
pub fn convert_time_slots_with_rollover_at(
    slots: &[TimeSlot],
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> Vec<TimeSlot> {
    warn_if_unresolvable("convert_time_slots_with_rollover", from, to);

    slots
        .iter()
        .map(|slot| {
            let converted = convert_or_keep(slot.time, from, to, reference);
            TimeSlot {
                day: slot.day.shifted(converted.day_offset),
                time: converted.time,
                timezone: Some(to.to_string()),
                ..slot.clone()
            }
        })
        .collect()
}

/// Minutes to add to a `from` wall clock to get the `to` wall clock, now.
///
/// Returns `0` if either timezone is invalid. That hides misconfigured
/// identifiers from the caller; a warning is logged instead.
pub fn get_timezone_offset(from: &str, to: &str) -> i32 {
    get_timezone_offset_at(from, to, Utc::now())
}

/// [`get_timezone_offset`] at an explicit instant.
pub fn get_timezone_offset_at(from: &str, to: &str, instant: DateTime<Utc>) -> i32 {
    match (parse_timezone(from), parse_timezone(to)) {
        (Ok(from_tz), Ok(to_tz)) => offset::offset_between(from_tz, to_tz, instant),
        (Err(e), _) | (_, Err(e)) => {
            warn!("get_timezone_offset {} -> {}: {}; using 0", from, to, e);
            0
        }
    }
}

/// [`get_timezone_offset`] in hours, fractional for half-hour zones.
pub fn get_timezone_offset_hours(from: &str, to: &str) -> f64 {
    get_timezone_offset(from, to) as f64 / 60.0
}

/// [`get_timezone_offset_hours`] at an explicit instant.
pub fn get_timezone_offset_hours_at(from: &str, to: &str, instant: DateTime<Utc>) -> f64 {
    get_timezone_offset_at(from, to, instant) as f64 / 60.0
}

/// Exact identifier comparison.
///
/// `"Europe/Paris"` and `"Europe/Berlin"` share an offset but are different
/// zones, and are reported as such.
pub fn is_same_timezone(tz1: &str, tz2: &str) -> bool {
    tz1 == tz2
}

/// Check a previously computed conversion against a fresh one.
///
/// Useful for cached conversions that may have gone stale across a DST
/// transition. Times are compared by value, so `"9:00"` matches `"09:00"`.
pub fn validate_conversion(original: &str, converted: &str, from: &str, to: &str) -> bool {
    validate_conversion_at(original, converted, from, to, Utc::now())
}

/// [`validate_conversion`] anchored to an explicit reference instant.
pub fn validate_conversion_at(
    original: &str,
    converted: &str,
    from: &str,
    to: &str,
    reference: DateTime<Utc>,
) -> bool {
    let expected = convert_time_at(original, from, to, reference);
    match (
        expected.parse::<WallClockTime>(),
        converted.parse::<WallClockTime>(),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => expected == converted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    fn t(s: &str) -> WallClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn core_conversion_reports_rollover() {
        let policy = DstPolicy::default();
        let c = convert_wall_clock(t("23:30"), "UTC", "Asia/Tokyo", jan(), policy).unwrap();
        assert_eq!((c.time, c.day_offset), (t("08:30"), 1));

        let c =
            convert_wall_clock(t("01:00"), "UTC", "America/Los_Angeles", jan(), policy).unwrap();
        assert_eq!((c.time, c.day_offset), (t("17:00"), -1));
    }

    #[test]
    fn same_zone_short_circuit_matches_full_path_output() {
        assert_eq!(convert_time_at("9:05", "Europe/Paris", "Europe/Paris", jan()), "09:05");
        assert_eq!(convert_time_at("garbage", "UTC", "UTC", jan()), "garbage");
    }

    #[test]
    fn skip_policy_rejects_gap_times() {
        // 2026-03-08 is spring-forward day in New York.
        let reference = Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap();
        let skipped =
            convert_wall_clock(t("02:30"), "America/New_York", "UTC", reference, DstPolicy::Skip);
        assert!(skipped.is_err());
        // The default policy moves to 03:00 EDT.
        assert_eq!(convert_time_at("02:30", "America/New_York", "UTC", reference), "07:00");
    }
}
