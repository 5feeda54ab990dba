//! # tz-engine
//!
//! Timezone conversion and detection for cross-timezone scheduling.
//!
//! Converting a bare "14:00" between zones looks trivial and is easy to get
//! wrong: half-hour and 45-minute offsets, DST gaps, and times that roll over
//! midnight. This crate does that math on top of the IANA rules compiled into
//! `chrono-tz`, and resolves which timezone a user is in through a fallback
//! chain that always produces an answer.
//!
//! The conversion and detection functions never fail for recoverable
//! conditions. An unknown timezone leaves a time unconverted, yields a zero
//! offset, or falls back to UTC, and the reason is logged through `log`.
//!
//! ## Modules
//!
//! - [`converter`] — Wall-clock, availability and slot conversion; offsets
//! - [`detector`] — Detection chain, `TimezoneInfo`, validation, common zones
//! - [`preference`] — Effective timezone per user over a profile store
//! - [`wallclock`] — `WallClockTime` (`HH:MM`), `Weekday` and `DayName`
//! - [`schedule`] — `AvailabilityRange` and `TimeSlot`
//! - [`dst`] — DST gap/overlap resolution policies
//! - [`offset`] — Shared lookup, offset math and formatting
//! - [`catalog`] — Curated timezone list and display names
//! - [`geo`] — IP-based network lookup
//! - [`config`] — Detector configuration
//! - [`error`] — Error types

pub mod catalog;
pub mod config;
pub mod converter;
pub mod detector;
pub mod dst;
pub mod error;
pub mod geo;
pub mod offset;
pub mod preference;
pub mod schedule;
pub mod wallclock;

pub use config::DetectorConfig;
pub use converter::{
    convert_availability, convert_availability_detailed, convert_availability_with_rollover,
    convert_time, convert_time_detailed, convert_time_slots, convert_time_slots_with_rollover,
    format_timezone_offset, get_timezone_offset, get_timezone_offset_hours, is_same_timezone,
    validate_conversion, ConvertedRange, ConvertedTime,
};
pub use detector::{
    detect, get_common_timezones, get_timezone_info, is_valid_timezone, Detector, TimezoneInfo,
    TimezoneSource,
};
pub use dst::DstPolicy;
pub use error::TzError;
pub use preference::{InMemoryProfileStore, ProfileStore, TimezonePreference, TimezonePreferences};
pub use schedule::{AvailabilityRange, TimeSlot};
pub use wallclock::{DayName, WallClockTime, Weekday};
