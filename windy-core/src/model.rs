use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point on the globe in degrees. Range checking is left to the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One hourly reading: Unix seconds paired with the surface value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: i64,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Readings for one parameter, in upstream order.
pub type ParameterSeries = Vec<Reading>;

/// Decoded response body, kept exactly as the API returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResponse(pub serde_json::Value);

impl From<serde_json::Value> for RawResponse {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Named views derived from one response.
///
/// Per-parameter maps are keyed by parameter name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub current_temperature: f64,
    pub current_forecast: BTreeMap<String, Reading>,
    pub tomorrow_forecast: BTreeMap<String, Reading>,
    pub day_after_tomorrow_forecast: BTreeMap<String, Reading>,
    pub week_forecast: BTreeMap<String, ParameterSeries>,
}
