//! Date-less wall-clock values: a time of day and a day of the week.
//!
//! Weekly availability is expressed as "Tuesday 14:00" without a calendar
//! date. These types carry exactly that, and serialize to the same string
//! forms the surrounding application stores (`"14:00"`, `"Tuesday"`).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TzError};

const MINUTES_PER_DAY: i32 = 24 * 60;

/// A local time of day with minute precision, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallClockTime {
    hour: u8,
    minute: u8,
}

impl WallClockTime {
    /// Midnight, `00:00`.
    pub const MIDNIGHT: WallClockTime = WallClockTime { hour: 0, minute: 0 };

    /// Build a time from its components.
    ///
    /// # Errors
    /// Returns `TzError::InvalidTime` if `hour > 23` or `minute > 59`.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(TzError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Build a time from minutes since midnight, wrapping modulo 24h.
    ///
    /// Negative values wrap backwards, so `-30` is `23:30`.
    pub fn from_minutes(minutes: i32) -> Self {
        let m = minutes.rem_euclid(MINUTES_PER_DAY);
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Minutes elapsed since midnight (0..1440).
    pub fn minutes_since_midnight(&self) -> i32 {
        self.hour as i32 * 60 + self.minute as i32
    }

    /// Shift by a signed number of minutes, wrapping modulo 24h.
    ///
    /// Returns the shifted time and the number of whole days crossed, so a
    /// caller can tell that `23:30 + 60` landed on the following day.
    pub fn shifted(&self, minutes: i32) -> (Self, i32) {
        let total = self.minutes_since_midnight() + minutes;
        (
            Self::from_minutes(total),
            total.div_euclid(MINUTES_PER_DAY),
        )
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // Components are range-checked on construction.
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for WallClockTime {
    /// Truncates seconds and sub-second precision.
    fn from(t: NaiveTime) -> Self {
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }
}

impl fmt::Display for WallClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for WallClockTime {
    type Err = TzError;

    /// Parse `H:MM` or `HH:MM`, tolerating a trailing `:SS` which is dropped.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TzError::InvalidTime(s.to_string());

        let mut parts = s.split(':');
        let hour = parts.next().ok_or_else(invalid)?;
        let minute = parts.next().ok_or_else(invalid)?;
        if let Some(second) = parts.next() {
            if second.len() != 2 || !second.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        let hour_ok = (1..=2).contains(&hour.len()) && hour.bytes().all(|b| b.is_ascii_digit());
        let minute_ok = minute.len() == 2 && minute.bytes().all(|b| b.is_ascii_digit());
        if !hour_ok || !minute_ok {
            return Err(invalid());
        }

        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl Serialize for WallClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A day of the week, as used by weekly availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Days since Monday (0..7).
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn succ(&self) -> Self {
        self.shifted(1)
    }

    pub fn pred(&self) -> Self {
        self.shifted(-1)
    }

    /// Move by a signed number of days, wrapping around the week.
    pub fn shifted(&self, days: i32) -> Self {
        let idx = (self.index() as i32 + days).rem_euclid(7);
        Self::ALL[idx as usize]
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = TzError;

    /// Case-insensitive full names and three-letter abbreviations.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|day| {
                day.as_str() == lower || (lower.len() == 3 && day.as_str().starts_with(&lower))
            })
            .ok_or_else(|| TzError::InvalidWeekday(s.to_string()))
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A weekday as the caller wrote it.
///
/// Schedules arrive with whatever spelling the host application uses
/// (`"Tuesday"`, `"tue"`, `"TUESDAY"`). The parsed [`Weekday`] drives
/// arithmetic; the original text is what serializes back out. Shifting keeps
/// the spelling style, so `"Tue"` moved one day becomes `"Wed"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayName {
    weekday: Weekday,
    text: String,
}

impl DayName {
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// The spelling this day serializes as.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Move by a signed number of days, keeping case and abbreviation style.
    pub fn shifted(&self, days: i32) -> Self {
        if days.rem_euclid(7) == 0 {
            return self.clone();
        }
        let weekday = self.weekday.shifted(days);
        let text = self.text.trim();
        let name = if text.len() == 3 {
            &weekday.as_str()[..3]
        } else {
            weekday.as_str()
        };

        let text = if text.len() > 1 && text.chars().all(|c| c.is_ascii_uppercase()) {
            name.to_ascii_uppercase()
        } else if text.starts_with(|c: char| c.is_ascii_uppercase()) {
            let mut title = name.to_string();
            title[..1].make_ascii_uppercase();
            title
        } else {
            name.to_string()
        };

        Self { weekday, text }
    }
}

impl From<Weekday> for DayName {
    fn from(weekday: Weekday) -> Self {
        Self {
            weekday,
            text: weekday.as_str().to_string(),
        }
    }
}

impl PartialEq<Weekday> for DayName {
    fn eq(&self, other: &Weekday) -> bool {
        self.weekday == *other
    }
}

impl fmt::Display for DayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for DayName {
    type Err = TzError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self {
            weekday: s.parse()?,
            text: s.to_string(),
        })
    }
}

impl Serialize for DayName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for DayName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_renders_zero_padded() {
        let t: WallClockTime = "9:05".parse().unwrap();
        assert_eq!(t.to_string(), "09:05");
        let t: WallClockTime = "14:00:59".parse().unwrap();
        assert_eq!(t.to_string(), "14:00");
    }

    #[test]
    fn rejects_out_of_range_and_malformed() {
        for bad in ["24:00", "12:60", "", "12", "1200", "ab:cd", "12:5", "12:00:00:00", " 12:00"] {
            assert!(bad.parse::<WallClockTime>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn shifted_reports_day_crossings() {
        let t = WallClockTime::new(23, 30).unwrap();
        assert_eq!(t.shifted(60), (WallClockTime::new(0, 30).unwrap(), 1));
        let t = WallClockTime::new(0, 15).unwrap();
        assert_eq!(t.shifted(-30), (WallClockTime::new(23, 45).unwrap(), -1));
        assert_eq!(t.shifted(0), (t, 0));
    }

    #[test]
    fn weekday_wraps_around_the_week() {
        assert_eq!(Weekday::Sunday.succ(), Weekday::Monday);
        assert_eq!(Weekday::Monday.pred(), Weekday::Sunday);
        assert_eq!(Weekday::Wednesday.shifted(-10), Weekday::Sunday);
    }

    #[test]
    fn weekday_parsing_is_case_insensitive() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("THU".parse::<Weekday>().unwrap(), Weekday::Thursday);
        assert!("funday".parse::<Weekday>().is_err());
        assert!("t".parse::<Weekday>().is_err());
    }

    #[test]
    fn serde_uses_string_forms() {
        let value = (Weekday::Friday, WallClockTime::new(7, 5).unwrap());
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["friday","07:05"]"#);
        let back: (Weekday, WallClockTime) = serde_json::from_str(r#"["Fri","7:05"]"#).unwrap();
        assert_eq!(back, (Weekday::Friday, WallClockTime::new(7, 5).unwrap()));
    }

    #[test]
    fn day_name_keeps_the_callers_spelling() {
        let day: DayName = serde_json::from_str(r#""Tuesday""#).unwrap();
        assert_eq!(day, Weekday::Tuesday);
        assert_eq!(serde_json::to_string(&day).unwrap(), r#""Tuesday""#);
        assert_eq!(DayName::from(Weekday::Friday).as_str(), "friday");
        assert!("Funday".parse::<DayName>().is_err());
    }

    #[test]
    fn shifted_day_name_follows_the_original_style() {
        let shift = |s: &str, days| s.parse::<DayName>().unwrap().shifted(days).to_string();
        assert_eq!(shift("Tuesday", 1), "Wednesday");
        assert_eq!(shift("sunday", 1), "monday");
        assert_eq!(shift("MON", -1), "SUN");
        assert_eq!(shift("Sat", 1), "Sun");
        assert_eq!(shift("thu", -1), "wed");
        assert_eq!(shift("  Friday ", 0), "  Friday ");
    }
}
