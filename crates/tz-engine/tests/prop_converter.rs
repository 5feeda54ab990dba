//! Property-based tests for conversion and offsets using proptest.
//!
//! These check invariants that hold for any valid timezone pair and time,
//! not just the worked examples in `converter_tests.rs`.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use tz_engine::converter::{
    convert_availability_at, convert_time_at, convert_wall_clock, get_timezone_offset_at,
};
use tz_engine::{AvailabilityRange, DstPolicy, WallClockTime, Weekday};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_timezone() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("UTC"),
        Just("America/New_York"),
        Just("America/Los_Angeles"),
        Just("America/St_Johns"),
        Just("Europe/London"),
        Just("Africa/Lagos"),
        Just("Asia/Kolkata"),
        Just("Asia/Kathmandu"),
        Just("Asia/Tokyo"),
        Just("Australia/Adelaide"),
        Just("Pacific/Auckland"),
    ]
}

fn arb_time() -> impl Strategy<Value = WallClockTime> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| WallClockTime::new(h, m).unwrap())
}

fn arb_weekday() -> impl Strategy<Value = Weekday> {
    (0usize..7).prop_map(|i| Weekday::ALL[i])
}

/// Reference instants well away from any DST transition in the zones above.
fn arb_reference() -> impl Strategy<Value = DateTime<Utc>> {
    prop_oneof![
        Just(Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap()),
        Just(Utc.with_ymd_and_hms(2026, 6, 20, 12, 0, 0).unwrap()),
        Just(Utc.with_ymd_and_hms(2027, 8, 10, 12, 0, 0).unwrap()),
    ]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn same_timezone_is_identity(
        tz in arb_timezone(),
        time in arb_time(),
        reference in arb_reference(),
    ) {
        let s = time.to_string();
        prop_assert_eq!(convert_time_at(&s, tz, tz, reference), s);
    }

    #[test]
    fn offset_is_antisymmetric(
        a in arb_timezone(),
        b in arb_timezone(),
        reference in arb_reference(),
    ) {
        prop_assert_eq!(
            get_timezone_offset_at(a, b, reference),
            -get_timezone_offset_at(b, a, reference)
        );
    }

    #[test]
    fn conversion_matches_offset_shift(
        a in arb_timezone(),
        b in arb_timezone(),
        time in arb_time(),
        reference in arb_reference(),
    ) {
        let offset = get_timezone_offset_at(a, b, reference);
        let converted = convert_wall_clock(time, a, b, reference, DstPolicy::default()).unwrap();
        let (expected, days) = time.shifted(offset);
        prop_assert_eq!(converted.time, expected);
        prop_assert_eq!(converted.day_offset, days);
    }

    #[test]
    fn round_trip_returns_original(
        a in arb_timezone(),
        b in arb_timezone(),
        time in arb_time(),
        reference in arb_reference(),
    ) {
        let s = time.to_string();
        let there = convert_time_at(&s, a, b, reference);
        prop_assert_eq!(convert_time_at(&there, b, a, reference), s);
    }

    #[test]
    fn availability_preserves_shape(
        days in prop::collection::vec(arb_weekday(), 0..10),
        a in arb_timezone(),
        b in arb_timezone(),
        reference in arb_reference(),
    ) {
        let ranges: Vec<AvailabilityRange> = days
            .iter()
            .map(|d| AvailabilityRange::new(
                *d,
                WallClockTime::new(9, 0).unwrap(),
                WallClockTime::new(17, 0).unwrap(),
            ))
            .collect();

        let converted = convert_availability_at(&ranges, a, b, reference);

        prop_assert_eq!(converted.len(), ranges.len());
        for (before, after) in ranges.iter().zip(&converted) {
            prop_assert_eq!(&before.day, &after.day);
            prop_assert_eq!(after.timezone.as_deref(), Some(b));
        }
    }

    #[test]
    fn invalid_source_never_changes_time(time in arb_time(), b in arb_timezone()) {
        let s = time.to_string();
        prop_assert_eq!(convert_time_at(&s, "Invalid/TZ", b, Utc::now()), s);
    }
}
