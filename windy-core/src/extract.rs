//! Turns a raw point-forecast response into per-parameter series and the
//! derived forecast views.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::{
    error::ForecastError,
    model::{ForecastBundle, ParameterSeries, RawResponse, Reading},
};

/// Parameter whose first reading becomes `current_temperature`.
pub const TEMPERATURE: &str = "temp";

/// Seven days of hourly readings.
pub const WEEK_HOURS: usize = 7 * 24;

#[derive(Debug, Deserialize)]
struct RawSeries {
    hours: Option<Vec<i64>>,
    surface: Option<Vec<f64>>,
}

/// Zips `raw[parameter].hours` with `raw[parameter].surface` by position.
pub fn extract_series(raw: &RawResponse, parameter: &str) -> Result<ParameterSeries, ForecastError> {
    let entry = raw
        .0
        .get(parameter)
        .ok_or_else(|| ForecastError::malformed(parameter, "parameter missing from response"))?;

    let series = RawSeries::deserialize(entry)
        .map_err(|e| ForecastError::malformed(parameter, e.to_string()))?;

    let hours = series
        .hours
        .ok_or_else(|| ForecastError::malformed(parameter, "missing key `hours`"))?;
    let surface = series
        .surface
        .ok_or_else(|| ForecastError::malformed(parameter, "missing key `surface`"))?;

    if hours.len() != surface.len() {
        return Err(ForecastError::malformed(
            parameter,
            format!("{} timestamps but {} values", hours.len(), surface.len()),
        ));
    }

    Ok(hours.into_iter().zip(surface).map(|(t, v)| Reading::new(t, v)).collect())
}

/// Builds every view for `parameters` relative to `now`.
///
/// Views are filled one at a time across all parameters, so the first
/// failing view aborts the whole bundle.
pub fn build_bundle(
    raw: &RawResponse,
    parameters: &[&str],
    now: DateTime<Utc>,
) -> Result<ForecastBundle, ForecastError> {
    let tomorrow = cutoff(now, 1)?;
    let day_after_tomorrow = cutoff(now, 2)?;

    let temperature = extract_series(raw, TEMPERATURE)?;
    let current_temperature = first(&temperature, TEMPERATURE)?.value;

    let mut series = Vec::with_capacity(parameters.len());
    let mut current_forecast = BTreeMap::new();
    for &parameter in parameters {
        let readings = extract_series(raw, parameter)?;
        current_forecast.insert(parameter.to_string(), first(&readings, parameter)?);
        series.push((parameter, readings));
    }

    let tomorrow_forecast = series
        .iter()
        .map(|(p, s)| Ok((p.to_string(), first_after(s, p, tomorrow)?)))
        .collect::<Result<_, ForecastError>>()?;

    let day_after_tomorrow_forecast = series
        .iter()
        .map(|(p, s)| Ok((p.to_string(), first_after(s, p, day_after_tomorrow)?)))
        .collect::<Result<_, ForecastError>>()?;

    let week_forecast = series.iter().map(|(p, s)| (p.to_string(), week(s))).collect();

    tracing::debug!(parameters = parameters.len(), "Built forecast bundle");

    Ok(ForecastBundle {
        current_temperature,
        current_forecast,
        tomorrow_forecast,
        day_after_tomorrow_forecast,
        week_forecast,
    })
}

/// `now` plus `days`, as Unix seconds.
fn cutoff(now: DateTime<Utc>, days: i64) -> Result<i64, ForecastError> {
    now.checked_add_signed(TimeDelta::days(days))
        .map(|t| t.timestamp())
        .ok_or(ForecastError::HorizonOutOfRange { now, days })
}

fn first(series: &[Reading], parameter: &str) -> Result<Reading, ForecastError> {
    series
        .first()
        .copied()
        .ok_or_else(|| ForecastError::EmptySeries { parameter: parameter.to_string() })
}

/// Earliest-positioned reading strictly after `cutoff` (Unix seconds).
fn first_after(series: &[Reading], parameter: &str, cutoff: i64) -> Result<Reading, ForecastError> {
    series
        .iter()
        .find(|r| r.timestamp > cutoff)
        .copied()
        .ok_or_else(|| ForecastError::NoMatchingEntry { parameter: parameter.to_string(), cutoff })
}

fn week(series: &[Reading]) -> ParameterSeries {
    series.iter().take(WEEK_HOURS).copied().collect()
}
