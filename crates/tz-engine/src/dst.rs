//! DST transition policies for resolving local wall-clock times.
//!
//! A local time maps to zero instants inside a spring-forward gap and to two
//! instants inside a fall-back overlap. The policy decides which instant (if
//! any) a wall-clock value stands for.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, TzError};

/// Longest gap we search across when shifting forward. Real gaps are at most
/// a couple of hours; a day covers historical date-line changes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Policy for handling local times that fall during DST transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Reject times in the DST gap (e.g., 2:30 AM during spring forward)
    Skip,
    /// Move to the first valid local time after the gap
    #[default]
    ShiftForward,
    /// Keep the wall clock reading and apply the offset in force before the gap
    WallClock,
}

impl DstPolicy {
    /// Resolve a naive local date-time in `tz` to a UTC instant.
    ///
    /// Ambiguous times (fall-back overlap) always resolve to the earlier
    /// instant, whatever the policy.
    ///
    /// # Errors
    /// Returns `TzError::NonexistentLocalTime` for a gap time under `Skip`, or
    /// if no valid time follows within a day under `ShiftForward`.
    pub fn resolve(&self, tz: Tz, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => self.resolve_gap(tz, local),
        }
    }

    fn resolve_gap(&self, tz: Tz, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        let nonexistent = || TzError::NonexistentLocalTime {
            time: local.format("%Y-%m-%dT%H:%M").to_string(),
            timezone: tz.name().to_string(),
        };

        match self {
            DstPolicy::Skip => Err(nonexistent()),
            DstPolicy::ShiftForward => (1..=MAX_GAP_MINUTES)
                .find_map(|m| tz.from_local_datetime(&(local + Duration::minutes(m))).earliest())
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(nonexistent),
            DstPolicy::WallClock => {
                // A day earlier is safely before the transition for any zone.
                let before = tz
                    .offset_from_utc_datetime(&(local - Duration::days(1)))
                    .fix();
                Ok((local - Duration::seconds(before.local_minus_utc() as i64)).and_utc())
            }
        }
    }
}
