//! Network (IP-based) timezone lookup.
//!
//! The endpoint is called with no parameters and is expected to answer with
//! a JSON object carrying a `timezone` field, e.g. `{"timezone":"Asia/Tokyo"}`.
//! Anything else is a failure: non-2xx status, unreadable body, missing field,
//! or an identifier the tz database does not know.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::config::GeoSettings;
use crate::error::{Result, TzError};
use crate::offset::parse_timezone;

/// A source that can guess the caller's timezone from the network.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Look up the caller's timezone. Implementations make a single attempt.
    async fn lookup(&self) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    timezone: Option<String>,
}

/// [`GeoLocator`] backed by an HTTP JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpGeoLocator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGeoLocator {
    /// Build a locator for `settings.endpoint`, with the request timeout set
    /// to `settings.timeout_ms`.
    ///
    /// # Errors
    /// Returns `TzError::Detection` if the HTTP client cannot be built.
    pub fn new(settings: &GeoSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| TzError::Detection(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn lookup(&self) -> Result<String> {
        debug!("geo lookup: GET {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| TzError::Detection(format!("Geo request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TzError::Detection(format!("Geo lookup returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TzError::Detection(format!("Failed to read geo response: {}", e)))?;

        parse_geo_body(&body)
    }
}

/// Extract and validate the `timezone` field of a geo response body.
fn parse_geo_body(body: &str) -> Result<String> {
    let parsed: GeoResponse = serde_json::from_str(body)
        .map_err(|e| TzError::Detection(format!("Malformed geo response: {}", e)))?;

    let timezone = parsed
        .timezone
        .ok_or_else(|| TzError::Detection("Geo response has no timezone field".to_string()))?;

    parse_timezone(&timezone).map_err(|_| {
        TzError::Detection(format!("Geo lookup returned unknown timezone {:?}", timezone))
    })?;

    Ok(timezone)
}
