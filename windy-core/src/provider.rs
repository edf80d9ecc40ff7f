use crate::{
    Config,
    error::ForecastError,
    model::{Coordinate, RawResponse},
    provider::windy::WindyClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod windy;

/// Anything that can answer a point-forecast request with a raw response.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    /// One attempt, no retry. `horizon_days` is informational only.
    async fn fetch(
        &self,
        coordinate: Coordinate,
        parameters: &[&str],
        horizon_days: u8,
    ) -> Result<RawResponse, ForecastError>;
}

/// Construct the Windy source from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let api_key = config.require_api_key()?;
    let client = WindyClient::new(api_key, config.endpoint.clone(), config.timeout_secs)?;

    Ok(Box::new(client))
}
