//! Resolve and describe a user's timezone.
//!
//! Resolution is a fixed chain: explicit override, then the platform's
//! reported zone, then an IP-based network lookup, then UTC. Every step
//! degrades to the next instead of failing, and the returned
//! [`TimezoneInfo::source`] tells the caller how confident the answer is.
//! A `default` source means nothing could be detected and the caller may want
//! to ask the user.
//!
//! A platform answer of `UTC` is treated as inconclusive (it is also what a
//! misconfigured host reports), so it always triggers the network step. A
//! user who really is on UTC therefore costs one lookup.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::config::DetectorConfig;
use crate::error::{Result, TzError};
use crate::geo::{GeoLocator, HttpGeoLocator};
use crate::offset::{self, parse_timezone};

pub use crate::catalog::get_common_timezones;
pub use crate::offset::is_valid_timezone;

const UTC: &str = "UTC";

/// Identifiers that mean UTC and are reported by platforms as such.
const UTC_ALIASES: &[&str] = &[
    "UTC",
    "UCT",
    "Etc/UTC",
    "Etc/UCT",
    "Etc/Universal",
    "Universal",
    "Etc/Zulu",
    "Zulu",
    "GMT",
    "Etc/GMT",
    "Etc/GMT0",
    "Etc/GMT+0",
    "Etc/GMT-0",
    "Etc/Greenwich",
];

/// How a timezone came to be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezoneSource {
    /// Detected from the platform or the network.
    Auto,
    /// Chosen explicitly by the user.
    Manual,
    /// Nothing was detected; UTC was assumed.
    Default,
}

impl fmt::Display for TimezoneSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimezoneSource::Auto => "auto",
            TimezoneSource::Manual => "manual",
            TimezoneSource::Default => "default",
        })
    }
}

impl std::str::FromStr for TimezoneSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(TimezoneSource::Auto),
            "manual" => Ok(TimezoneSource::Manual),
            "default" => Ok(TimezoneSource::Default),
            other => Err(format!(
                "unknown timezone source '{}' (expected auto, manual or default)",
                other
            )),
        }
    }
}

/// A snapshot description of a timezone at one instant.
///
/// Offsets and DST flags are only valid for the instant they were computed
/// at; derive a new one rather than keeping this across a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimezoneInfo {
    /// The identifier, exactly as requested.
    pub timezone: String,
    pub source: TimezoneSource,
    /// Minutes east of UTC.
    pub offset_minutes: i32,
    pub display_name: String,
    pub abbreviation: String,
    /// DST is in effect at the instant this was computed.
    pub is_dst: bool,
    /// The zone's January and July offsets differ in the reference year.
    pub observes_dst: bool,
    /// `+HH:MM` / `-HH:MM`.
    pub utc_offset_string: String,
}

/// Describe `timezone` as of now, tagged with `source`.
///
/// Never fails. An unresolvable identifier yields a zero-offset, `UTC`
/// abbreviated description that still carries the identifier as given.
pub fn get_timezone_info(timezone: &str, source: TimezoneSource) -> TimezoneInfo {
    get_timezone_info_at(timezone, source, Utc::now())
}

/// [`get_timezone_info`] at an explicit instant.
pub fn get_timezone_info_at(
    timezone: &str,
    source: TimezoneSource,
    instant: DateTime<Utc>,
) -> TimezoneInfo {
    let tz = match parse_timezone(timezone) {
        Ok(tz) => tz,
        Err(e) => {
            warn!("get_timezone_info: {}; returning degraded info", e);
            return TimezoneInfo {
                timezone: timezone.to_string(),
                source,
                offset_minutes: 0,
                display_name: timezone.to_string(),
                abbreviation: UTC.to_string(),
                is_dst: false,
                observes_dst: false,
                utc_offset_string: offset::format_utc_offset(0),
            };
        }
    };

    let offset_minutes = offset::utc_offset_minutes(tz, instant);
    TimezoneInfo {
        timezone: timezone.to_string(),
        source,
        offset_minutes,
        display_name: catalog::display_name(timezone),
        abbreviation: offset::abbreviation(tz, instant),
        is_dst: in_dst(tz, instant),
        observes_dst: observes_dst(tz, instant.year()),
        utc_offset_string: offset::format_utc_offset(offset_minutes),
    }
}

fn in_dst(tz: Tz, instant: DateTime<Utc>) -> bool {
    !tz.offset_from_utc_datetime(&instant.naive_utc())
        .dst_offset()
        .is_zero()
}

/// Compare the offsets on January 1st and July 1st of `year`.
fn observes_dst(tz: Tz, year: i32) -> bool {
    let at = |month| {
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| offset::utc_offset_minutes(tz, dt.and_utc()))
    };
    match (at(1), at(7)) {
        (Some(jan), Some(jul)) => jan != jul,
        _ => false,
    }
}

/// The host's notion of its own timezone.
pub trait PlatformTimezone: Send + Sync {
    /// The reported identifier. May be anything; the detector validates it.
    fn timezone(&self) -> Result<String>;
}

/// Reads the `TZ` environment variable, then the OS setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimezone;

impl SystemTimezone {
    /// Interpret a `TZ` value: `:America/Chicago`, a zoneinfo path, or a
    /// bare identifier.
    fn from_tz_var(raw: &str) -> Option<String> {
        let value = raw.trim().trim_start_matches(':');
        let value = match value.find("zoneinfo/") {
            Some(idx) => &value[idx + "zoneinfo/".len()..],
            None => value,
        };
        (!value.is_empty()).then(|| value.to_string())
    }
}

impl PlatformTimezone for SystemTimezone {
    fn timezone(&self) -> Result<String> {
        if let Some(tz) = std::env::var("TZ").ok().as_deref().and_then(Self::from_tz_var) {
            if is_valid_timezone(&tz) {
                debug!("platform timezone from TZ: {}", tz);
                return Ok(tz);
            }
            debug!("ignoring unusable TZ value {:?}", tz);
        }
        iana_time_zone::get_timezone()
            .map_err(|e| TzError::Detection(format!("OS timezone unavailable: {}", e)))
    }
}

/// Validate a platform report, mapping every UTC spelling and every failure
/// to `"UTC"`.
fn detect_from(platform: &dyn PlatformTimezone) -> String {
    match platform.timezone() {
        Ok(tz) if UTC_ALIASES.contains(&tz.as_str()) => UTC.to_string(),
        Ok(tz) if is_valid_timezone(&tz) => tz,
        Ok(tz) => {
            debug!("platform reported unknown timezone {:?}", tz);
            UTC.to_string()
        }
        Err(e) => {
            debug!("platform detection failed: {}", e);
            UTC.to_string()
        }
    }
}

/// The timezone this process's host reports, or `"UTC"` if it cannot say.
pub fn detect() -> String {
    detect_from(&SystemTimezone)
}

/// Runs the detection chain against injectable sources.
pub struct Detector {
    platform: Box<dyn PlatformTimezone>,
    geo: Option<Box<dyn GeoLocator>>,
    config: DetectorConfig,
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("geo", &self.geo.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl Detector {
    /// Detector over the host platform and the configured HTTP endpoint.
    ///
    /// If the HTTP client cannot be built the network step is dropped and a
    /// warning is logged.
    pub fn new(config: DetectorConfig) -> Self {
        let geo: Option<Box<dyn GeoLocator>> = if config.geo.enabled {
            match HttpGeoLocator::new(&config.geo) {
                Ok(locator) => Some(Box::new(locator)),
                Err(e) => {
                    warn!("network timezone lookup disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Self {
            platform: Box::new(SystemTimezone),
            geo,
            config,
        }
    }

    /// Detector over caller-supplied sources.
    ///
    /// `geo` is still skipped when `config.geo.enabled` is false.
    pub fn with_sources(
        platform: Box<dyn PlatformTimezone>,
        geo: Option<Box<dyn GeoLocator>>,
        config: DetectorConfig,
    ) -> Self {
        Self {
            platform,
            geo,
            config,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The platform-reported timezone, or `"UTC"`.
    pub fn detect(&self) -> String {
        detect_from(self.platform.as_ref())
    }

    /// Platform, then network, then UTC.
    ///
    /// The network step runs only when the platform says UTC, makes one
    /// attempt, and is abandoned after the configured timeout.
    pub async fn detect_with_fallback(&self) -> TimezoneInfo {
        let platform = self.detect();
        if platform != UTC {
            debug!("detected {} from platform", platform);
            return get_timezone_info(&platform, TimezoneSource::Auto);
        }

        match self.lookup_network().await {
            Ok(tz) => {
                debug!("detected {} from network lookup", tz);
                get_timezone_info(&tz, TimezoneSource::Auto)
            }
            Err(e) => {
                debug!("falling back to UTC: {}", e);
                get_timezone_info(UTC, TimezoneSource::Default)
            }
        }
    }

    /// The full chain, starting from an explicit user choice.
    ///
    /// A valid `override_tz` wins with `source = manual`. An invalid one is
    /// logged and ignored.
    pub async fn resolve(&self, override_tz: Option<&str>) -> TimezoneInfo {
        if let Some(tz) = override_tz {
            if is_valid_timezone(tz) {
                return get_timezone_info(tz, TimezoneSource::Manual);
            }
            warn!("ignoring invalid timezone override {:?}", tz);
        }
        self.detect_with_fallback().await
    }

    async fn lookup_network(&self) -> Result<String> {
        let geo = match &self.geo {
            Some(geo) if self.config.geo.enabled => geo,
            _ => return Err(TzError::Detection("network lookup disabled".to_string())),
        };

        let timeout = self.config.geo.timeout();
        let tz = tokio::time::timeout(timeout, geo.lookup())
            .await
            .map_err(|_| {
                TzError::Detection(format!("network lookup timed out after {:?}", timeout))
            })??;

        // Locators are trusted to validate, but a bad one must not leak through.
        parse_timezone(&tz)?;
        Ok(tz)
    }
}
