//! Core library for the `windy` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The point-forecast source and its Windy.com implementation
//! - Extraction of hourly series into forecast views
//!
//! It is used by `windy-cli`, but can also be reused by other binaries or services.

use chrono::{DateTime, Utc};

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::ForecastError;
pub use extract::{build_bundle, extract_series};
pub use model::{Coordinate, ForecastBundle, ParameterSeries, RawResponse, Reading};
pub use provider::{ForecastSource, provider_from_config, windy::WindyClient};

/// Parameters requested by [`get_forecasts`].
pub const DEFAULT_PARAMETERS: [&str; 3] = ["temp", "precip", "wind"];

/// Longest horizon the free tier returns in one response.
pub const FREE_TIER_DAYS: u8 = 7;

/// Fetch once for `coordinate` and derive every view relative to `now`.
pub async fn get_forecasts(
    source: &dyn ForecastSource,
    coordinate: Coordinate,
    now: DateTime<Utc>,
) -> Result<ForecastBundle, ForecastError> {
    let raw = source.fetch(coordinate, &DEFAULT_PARAMETERS, FREE_TIER_DAYS).await?;
    build_bundle(&raw, &DEFAULT_PARAMETERS, now)
}
