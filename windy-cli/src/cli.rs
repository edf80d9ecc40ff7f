use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use windy_core::{Config, Coordinate, ForecastBundle, Reading, get_forecasts, provider_from_config};

const NYC_LAT: f64 = 40.7128;
const NYC_LON: f64 = -74.0060;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "windy", version, about = "Windy.com point forecasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Windy API key in the config file.
    Configure,

    /// Show the forecast for a coordinate.
    Show {
        #[arg(long, default_value_t = NYC_LAT, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, default_value_t = NYC_LON, allow_negative_numbers = true)]
        lon: f64,

        /// Print the whole bundle as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, json } => show(Coordinate::new(lat, lon), json).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("Windy API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    cfg.set_api_key(key.trim().to_string());
    let path = cfg.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

async fn show(coordinate: Coordinate, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let source = provider_from_config(&cfg)?;

    let bundle = get_forecasts(source.as_ref(), coordinate, Utc::now())
        .await
        .with_context(|| format!("Forecast for ({}, {}) failed", coordinate.lat, coordinate.lon))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else {
        print!("{}", render(&bundle));
    }

    Ok(())
}

fn render(bundle: &ForecastBundle) -> String {
    let mut lines = vec![format!("Current temperature: {}", bundle.current_temperature)];

    if let Some(r) = bundle.tomorrow_forecast.get("temp") {
        lines.push(format!("Tomorrow's temperature: {} ({})", r.value, when(r)));
    }
    if let Some(r) = bundle.day_after_tomorrow_forecast.get("temp") {
        lines.push(format!("Day after tomorrow's temperature: {} ({})", r.value, when(r)));
    }

    lines.push("Now:".to_string());
    lines.extend(bundle.current_forecast.iter().map(|(param, r)| format!("  {param}: {}", r.value)));
    lines.extend(
        bundle
            .week_forecast
            .iter()
            .map(|(param, series)| format!("Week {param}: {} hourly readings", series.len())),
    );

    lines.join("\n") + "\n"
}

fn when(reading: &Reading) -> String {
    reading
        .time()
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| reading.timestamp.to_string())
}
