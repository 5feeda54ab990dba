//! Detector configuration.
//!
//! Defaults are usable as-is. A TOML file and `TZ_ENGINE_*` environment
//! variables can override them, in that order.
//!
//! ```toml
//! [geo]
//! enabled = true
//! endpoint = "https://ipapi.co/json/"
//! timeout_ms = 3000
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TzError};

pub const DEFAULT_GEO_ENDPOINT: &str = "https://ipapi.co/json/";
pub const DEFAULT_GEO_TIMEOUT_MS: u64 = 3000;

pub const ENV_GEO_ENDPOINT: &str = "TZ_ENGINE_GEO_ENDPOINT";
pub const ENV_GEO_TIMEOUT_MS: &str = "TZ_ENGINE_GEO_TIMEOUT_MS";
pub const ENV_GEO_ENABLED: &str = "TZ_ENGINE_GEO_ENABLED";

/// Settings for the detection fallback chain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default)]
    pub geo: GeoSettings,
}

/// IP-based lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoSettings {
    /// When false, the chain goes straight from platform detection to UTC.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// URL returning JSON with a `timezone` field.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Upper bound on the whole lookup. Exceeding it counts as failure.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    DEFAULT_GEO_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_GEO_TIMEOUT_MS
}

impl Default for GeoSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl GeoSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl DetectorConfig {
    /// Config with the network lookup turned off.
    pub fn offline() -> Self {
        let mut config = Self::default();
        config.geo.enabled = false;
        config
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `TzError::Config` if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TzError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// Returns `TzError::Config` on invalid TOML or a zero timeout.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DetectorConfig = toml::from_str(content)
            .map_err(|e| TzError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `TZ_ENGINE_*` environment variables.
    ///
    /// # Errors
    /// Returns `TzError::Config` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `TZ_ENGINE_*` environment variables on top of `self`.
    ///
    /// # Errors
    /// Returns `TzError::Config` if a variable is set to an unparseable value.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (the environment, in
    /// practice).
    ///
    /// # Errors
    /// Returns `TzError::Config` if a value is present but unparseable.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_GEO_ENDPOINT) {
            self.geo.endpoint = endpoint;
        }
        if let Some(raw) = lookup(ENV_GEO_TIMEOUT_MS) {
            self.geo.timeout_ms = raw.trim().parse().map_err(|_| {
                TzError::Config(format!("{} must be an integer, got {:?}", ENV_GEO_TIMEOUT_MS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_GEO_ENABLED) {
            self.geo.enabled = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(TzError::Config(format!(
                        "{} must be a boolean, got {:?}",
                        ENV_GEO_ENABLED, raw
                    )))
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.geo.timeout_ms == 0 {
            return Err(TzError::Config("geo.timeout_ms must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = DetectorConfig::default();
        assert!(config.geo.enabled);
        assert_eq!(config.geo.endpoint, DEFAULT_GEO_ENDPOINT);
        assert_eq!(config.geo.timeout(), Duration::from_secs(3));
        assert!(!DetectorConfig::offline().geo.enabled);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DetectorConfig::from_toml("[geo]\ntimeout_ms = 500\n").unwrap();
        assert_eq!(config.geo.timeout_ms, 500);
        assert!(config.geo.enabled);
        assert_eq!(config.geo.endpoint, DEFAULT_GEO_ENDPOINT);

        let empty = DetectorConfig::from_toml("").unwrap();
        assert_eq!(empty, DetectorConfig::default());
    }

    #[test]
    fn rejects_bad_toml_and_zero_timeout() {
        assert!(matches!(DetectorConfig::from_toml("[geo"), Err(TzError::Config(_))));
        assert!(matches!(
            DetectorConfig::from_toml("[geo]\ntimeout_ms = 0\n"),
            Err(TzError::Config(_))
        ));
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[geo]\nenabled = false\nendpoint = \"http://127.0.0.1:9/\"").unwrap();
        let config = DetectorConfig::from_file(file.path()).unwrap();
        assert!(!config.geo.enabled);
        assert_eq!(config.geo.endpoint, "http://127.0.0.1:9/");

        assert!(matches!(
            DetectorConfig::from_file("/nonexistent/tz-engine.toml"),
            Err(TzError::Config(_))
        ));
    }

    #[test]
    fn overrides_layer_on_top() {
        let vars: HashMap<&str, &str> = [
            (ENV_GEO_ENDPOINT, "http://localhost/tz"),
            (ENV_GEO_TIMEOUT_MS, "250"),
            (ENV_GEO_ENABLED, "off"),
        ]
        .into_iter()
        .collect();
        let config = DetectorConfig::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.geo.endpoint, "http://localhost/tz");
        assert_eq!(config.geo.timeout_ms, 250);
        assert!(!config.geo.enabled);
    }

    #[test]
    fn bad_override_values_are_errors() {
        let result = DetectorConfig::default()
            .with_overrides(|k| (k == ENV_GEO_TIMEOUT_MS).then(|| "soon".to_string()));
        assert!(matches!(result, Err(TzError::Config(_))));

        let result = DetectorConfig::default()
            .with_overrides(|k| (k == ENV_GEO_ENABLED).then(|| "maybe".to_string()));
        assert!(matches!(result, Err(TzError::Config(_))));
    }
}
