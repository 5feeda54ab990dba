//! Weekly availability ranges and discrete time slots.
//!
//! These are the shapes booking and conflict logic hand to the converter.
//! They serialize in the host application's JSON shape (`startTime`,
//! `endTime`, the day spelled as it arrived). Fields the engine does not know
//! about are kept in `extra` and carried through conversion untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::wallclock::{DayName, WallClockTime};

/// A recurring weekly window, e.g. "Tuesday 09:00-17:00".
///
/// `start_time < end_time` is assumed by callers but not checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRange {
    pub day: DayName,
    #[serde(rename = "startTime", alias = "start_time")]
    pub start_time: WallClockTime,
    #[serde(rename = "endTime", alias = "end_time")]
    pub end_time: WallClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AvailabilityRange {
    pub fn new(
        day: impl Into<DayName>,
        start_time: WallClockTime,
        end_time: WallClockTime,
    ) -> Self {
        Self {
            day: day.into(),
            start_time,
            end_time,
            timezone: None,
            extra: Map::new(),
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// A single bookable point in the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: DayName,
    pub time: WallClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimeSlot {
    pub fn new(day: impl Into<DayName>, time: WallClockTime) -> Self {
        Self {
            day: day.into(),
            time,
            timezone: None,
            extra: Map::new(),
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallclock::Weekday;

    #[test]
    fn host_shape_serializes_back_unchanged() {
        let json = r#"{"day":"Tuesday","startTime":"09:00","endTime":"17:30","tutorId":42}"#;
        let range: AvailabilityRange = serde_json::from_str(json).unwrap();
        assert_eq!(range.day, Weekday::Tuesday);
        assert_eq!(range.end_time.to_string(), "17:30");
        assert_eq!(range.timezone, None);
        assert_eq!(range.extra.get("tutorId"), Some(&Value::from(42)));

        assert_eq!(serde_json::to_string(&range).unwrap(), json);
    }

    #[test]
    fn snake_case_keys_are_accepted_on_input() {
        let json = r#"{"day":"monday","start_time":"08:00","end_time":"09:00"}"#;
        let range: AvailabilityRange = serde_json::from_str(json).unwrap();
        assert_eq!(range.start_time.to_string(), "08:00");

        let out = serde_json::to_value(&range).unwrap();
        assert_eq!(out["startTime"], "08:00");
        assert!(out.get("start_time").is_none());
        assert!(out.get("timezone").is_none());
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert!(serde_json::from_str::<TimeSlot>(r#"{"day":"monday"}"#).is_err());
        assert!(serde_json::from_str::<TimeSlot>(r#"{"day":"monday","time":"25:00"}"#).is_err());
        assert!(serde_json::from_str::<TimeSlot>(r#"{"day":"someday","time":"10:00"}"#).is_err());
        assert!(serde_json::from_str::<TimeSlot>(r#"{"day":"monday","time":10}"#).is_err());
    }
}
