use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    error::ForecastError,
    model::{Coordinate, RawResponse},
};

use super::ForecastSource;

pub const MODEL: &str = "gfs";
pub const SURFACE_LEVEL: &str = "surface";

/// Client for the Windy point-forecast endpoint.
#[derive(Clone)]
pub struct WindyClient {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl std::fmt::Debug for WindyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindyClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/point-forecast/v2`.
#[derive(Debug, Serialize)]
struct PointForecastRequest<'a> {
    lat: f64,
    lon: f64,
    model: &'a str,
    parameters: &'a [&'a str],
    levels: [&'a str; 1],
    key: &'a str,
}

impl WindyClient {
    pub fn new(api_key: String, endpoint: String, timeout_secs: u64) -> Result<Self, ForecastError> {
        let http = Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;

        Ok(Self { api_key, endpoint, http })
    }
}

#[async_trait]
impl ForecastSource for WindyClient {
    #[instrument(
        skip(self, coordinate, parameters, horizon_days),
        fields(lat = %coordinate.lat, lon = %coordinate.lon, horizon_days = horizon_days)
    )]
    async fn fetch(
        &self,
        coordinate: Coordinate,
        parameters: &[&str],
        horizon_days: u8,
    ) -> Result<RawResponse, ForecastError> {
        let payload = PointForecastRequest {
            lat: coordinate.lat,
            lon: coordinate.lon,
            model: MODEL,
            parameters,
            levels: [SURFACE_LEVEL],
            key: &self.api_key,
        };

        debug!(endpoint = %self.endpoint, ?parameters, "Requesting point forecast");

        let res = self.http.post(&self.endpoint).json(&payload).send().await?;

        let status = res.status();
        debug!(%status, "Point forecast response received");

        if status != StatusCode::OK {
            // The status is the failure; an unreadable body must not mask it.
            let body = res.text().await.unwrap_or_default();
            return Err(ForecastError::RequestFailed {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|e| ForecastError::MalformedResponse {
            parameter: None,
            reason: format!("body is not valid JSON: {e}"),
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
