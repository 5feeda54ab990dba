//! Per-user timezone preference on top of an external profile store.
//!
//! The store owns persistence. This module decides which stored value is in
//! effect: an explicit override, else the last detected zone, else UTC.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::converter;
use crate::detector::{get_timezone_info, Detector, TimezoneInfo, TimezoneSource};
use crate::error::{Result, TzError};
use crate::offset::parse_timezone;

/// The profile fields the engine reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimezonePreference {
    /// Explicit user choice. Wins over everything else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_timezone: Option<String>,
    /// Last result of the detection chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_timezone: Option<String>,
    /// Source reported alongside `detected_timezone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TimezoneSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Key-value storage for [`TimezonePreference`] records, keyed by user id.
pub trait ProfileStore: Send + Sync {
    /// The stored preference, or an empty one for an unknown user.
    fn load(&self, user_id: &str) -> Result<TimezonePreference>;

    fn save(&self, user_id: &str, preference: &TimezonePreference) -> Result<()>;
}

/// A [`ProfileStore`] that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    records: RwLock<HashMap<String, TimezonePreference>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self, user_id: &str) -> Result<TimezonePreference> {
        let records = self
            .records
            .read()
            .map_err(|_| TzError::Store("profile store lock poisoned".to_string()))?;
        Ok(records.get(user_id).cloned().unwrap_or_default())
    }

    fn save(&self, user_id: &str, preference: &TimezonePreference) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| TzError::Store("profile store lock poisoned".to_string()))?;
        records.insert(user_id.to_string(), preference.clone());
        Ok(())
    }
}

/// Resolves and updates users' effective timezones.
#[derive(Debug)]
pub struct TimezonePreferences<S: ProfileStore> {
    store: S,
}

impl<S: ProfileStore> TimezonePreferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The timezone in effect for `user_id`.
    ///
    /// Override (`manual`), then detected value (`auto`), then UTC
    /// (`default`). Stored values that no longer resolve are skipped, and a
    /// failing store is treated as an empty profile.
    pub fn effective_timezone(&self, user_id: &str) -> TimezoneInfo {
        let preference = self.store.load(user_id).unwrap_or_else(|e| {
            warn!("loading timezone preference for {}: {}", user_id, e);
            TimezonePreference::default()
        });

        if let Some(tz) = usable(preference.override_timezone.as_deref()) {
            return get_timezone_info(tz, TimezoneSource::Manual);
        }
        if let Some(tz) = usable(preference.detected_timezone.as_deref()) {
            let source = preference.source.unwrap_or(TimezoneSource::Auto);
            return get_timezone_info(tz, source);
        }
        get_timezone_info("UTC", TimezoneSource::Default)
    }

    /// Record an explicit timezone choice.
    ///
    /// # Errors
    /// Returns `TzError::InvalidTimezone` for an unresolvable identifier, or
    /// the store's error if saving fails.
    pub fn set_override(&self, user_id: &str, timezone: &str) -> Result<TimezoneInfo> {
        parse_timezone(timezone)?;
        let mut preference = self.store.load(user_id)?;
        preference.override_timezone = Some(timezone.to_string());
        preference.updated_at = Some(Utc::now());
        self.store.save(user_id, &preference)?;
        Ok(get_timezone_info(timezone, TimezoneSource::Manual))
    }

    /// Drop the explicit choice, returning the user to detection.
    ///
    /// # Errors
    /// Returns the store's error if loading or saving fails.
    pub fn clear_override(&self, user_id: &str) -> Result<()> {
        let mut preference = self.store.load(user_id)?;
        preference.override_timezone = None;
        preference.updated_at = Some(Utc::now());
        self.store.save(user_id, &preference)
    }

    /// Run the detection chain and store its answer.
    ///
    /// The override, if any, is left alone; the returned info is the
    /// detection result, not necessarily the effective timezone.
    ///
    /// # Errors
    /// Returns the store's error if loading or saving fails.
    pub async fn refresh_detected(
        &self,
        user_id: &str,
        detector: &Detector,
    ) -> Result<TimezoneInfo> {
        let info = detector.detect_with_fallback().await;
        let mut preference = self.store.load(user_id)?;
        preference.detected_timezone = Some(info.timezone.clone());
        preference.source = Some(info.source);
        preference.updated_at = Some(Utc::now());
        self.store.save(user_id, &preference)?;
        Ok(info)
    }

    /// Convert a time stored in `from_tz` into the user's effective zone.
    pub fn to_user_time(&self, user_id: &str, time: &str, from_tz: &str) -> String {
        let user_tz = self.effective_timezone(user_id).timezone;
        converter::convert_time(time, from_tz, &user_tz)
    }

    /// Convert a time the user entered into `to_tz`.
    pub fn from_user_time(&self, user_id: &str, time: &str, to_tz: &str) -> String {
        let user_tz = self.effective_timezone(user_id).timezone;
        converter::convert_time(time, &user_tz, to_tz)
    }
}

fn usable(tz: Option<&str>) -> Option<&str> {
    match tz {
        Some(tz) if parse_timezone(tz).is_ok() => Some(tz),
        Some(tz) => {
            warn!("stored timezone {:?} no longer resolves; skipping", tz);
            None
        }
        None => None,
    }
}
