use anyhow::{Context, Result, anyhow};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use forecast_core::{Config, ForecastError, Units, When};
use inquire::{Password, PasswordDisplayMode, Select};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "forecast.io weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and default units in the config file.
    Configure,

    /// Show the forecast for a location.
    Show {
        /// API key for forecast.io; overrides FORECAST_API_KEY and the config file.
        #[arg(long = "api-key")]
        api_key: Option<String>,

        /// Latitude for the requested location.
        #[arg(long, default_value_t = 37.8267, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude for the requested location.
        #[arg(long, default_value_t = -122.423, allow_negative_numbers = true)]
        lon: f64,

        /// Comma separated list of blocks to exclude.
        #[arg(long, default_value = "")]
        exclude: String,

        /// Units to return values in; defaults to the configured units.
        #[arg(long)]
        units: Option<String>,

        /// Request hourly data for 7 days instead of 2.
        #[arg(long)]
        extend: bool,

        /// Point in time: Unix seconds, RFC 3339, or any string forecast.io accepts.
        #[arg(long)]
        at: Option<String>,

        /// Print the report as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show {
                api_key,
                lat,
                lon,
                exclude,
                units,
                extend,
                at,
                json,
            } => {
                let config = Config::load()?;
                let conn = config.connection(api_key.as_deref())?;
                if let Some(units) = units {
                    conn.set_units(&units).await.map_err(explain)?;
                }

                let excludes: Vec<&str> = exclude.split(',').collect();
                debug!(lat, lon, ?excludes, extend, ?at, "fetching forecast");

                let mut report = match at {
                    Some(at) => {
                        let excludes: Vec<&str> =
                            excludes.into_iter().filter(|e| !e.is_empty()).collect();
                        conn.forecast_at_time(lat, lon, parse_when(&at), &excludes)
                            .await
                            .map_err(explain)?
                    }
                    None => conn
                        .forecast(lat, lon, &excludes, extend)
                        .await
                        .map_err(explain)?,
                };
                report.normalize_times();

                if json {
                    let out = serde_json::to_string_pretty(&report)
                        .context("Failed to serialize report")?;
                    println!("{out}");
                } else {
                    print!("{}", render::report(&report, conn.api_calls().await));
                }
            }
        }

        Ok(())
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("forecast.io API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let current = config.units()?;
    let start = Units::all().iter().position(|u| *u == current).unwrap_or_default();
    let units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    config.set_api_key(api_key);
    config.set_units(units);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Add a usage hint to errors caused by bad flag values.
fn explain(err: ForecastError) -> anyhow::Error {
    if err.is_validation() {
        anyhow!("{err}\nHint: check the --units and --exclude values.")
    } else {
        anyhow::Error::new(err).context("Failed to fetch forecast")
    }
}

/// Interpret `--at`: integers are Unix seconds, RFC 3339 is converted, anything
/// else is sent to the service as typed.
pub fn parse_when(raw: &str) -> When {
    if let Ok(ts) = raw.parse::<i64>() {
        return When::Unix(ts);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return When::from(dt);
    }
    When::Raw(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parse_when_unix_seconds() {
        assert_eq!(parse_when("1609459200"), When::Unix(1_609_459_200));
        assert_eq!(parse_when("-60"), When::Unix(-60));
    }

    #[test]
    fn parse_when_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_when("2021-01-01T01:00:00+01:00"), When::Time(expected));
    }

    #[test]
    fn parse_when_falls_back_to_raw() {
        assert_eq!(
            parse_when("2013-05-06T12:00:00-0400"),
            When::Raw("2013-05-06T12:00:00-0400".into())
        );
    }

    #[test]
    fn show_defaults() {
        let cli = Cli::parse_from(["forecast", "show"]);
        match cli.command {
            Command::Show {
                lat,
                lon,
                exclude,
                units,
                extend,
                at,
                ..
            } => {
                assert_eq!(lat, 37.8267);
                assert_eq!(lon, -122.423);
                assert!(exclude.is_empty());
                assert!(units.is_none());
                assert!(!extend);
                assert!(at.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::parse_from([
            "forecast", "show", "--lat", "-33.86", "--lon", "151.2", "--exclude",
            "minutely,alerts", "--units", "si", "--extend",
        ]);
        match cli.command {
            Command::Show {
                lat,
                lon,
                exclude,
                units,
                extend,
                ..
            } => {
                assert_eq!(lat, -33.86);
                assert_eq!(lon, 151.2);
                assert_eq!(exclude, "minutely,alerts");
                assert_eq!(units.as_deref(), Some("si"));
                assert!(extend);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn validation_errors_get_a_hint() {
        let err = explain(ForecastError::InvalidExclude("weekly".into()));
        let msg = err.to_string();

        assert!(msg.contains("'weekly'"));
        assert!(msg.contains("Hint: check the --units and --exclude values."));
    }

    #[test]
    fn other_errors_keep_their_source() {
        let err = explain(ForecastError::Status {
            status: 500,
            body: "boom".into(),
        });

        assert_eq!(err.to_string(), "Failed to fetch forecast");
        let source = err
            .downcast_ref::<ForecastError>()
            .expect("source must be the forecast error");
        assert!(!source.is_validation());
    }
}
