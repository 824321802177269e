//! Data model of a forecast.io response.
//!
//! Every raw Unix timestamp keeps its wire name and has a paired structured
//! field (`time`, `sunrise`, ...) that stays `None` until
//! [`Report::normalize_times`] is called. Structured fields serialize under
//! `<wire name>Utc` and are omitted while unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod times;

pub use times::{NormalizeTimes, unix_to_utc};

/// Root of a forecast.io response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name of the requested location.
    pub timezone: String,
    /// Offset from UTC in hours. Fractional for zones like Asia/Kolkata.
    #[serde(default)]
    pub offset: f64,
    pub currently: Option<Currently>,
    pub minutely: Option<DataBlock<MinuteData>>,
    pub hourly: Option<DataBlock<HourData>>,
    pub daily: Option<DataBlock<DayData>>,
    pub alerts: Option<Vec<Alert>>,
    pub flags: Option<Flags>,
}

impl Report {
    /// Parse a raw response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// A summary plus samples ordered by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DataBlock<T> {
    pub summary: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub data: Vec<T>,
}

/// Measurements shared by current, hourly and daily samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub summary: Option<String>,
    /// Machine-readable summary such as `clear-day` or `partly-cloudy-night`.
    pub icon: Option<String>,
    pub precip_intensity: Option<f64>,
    /// Between 0 and 1.
    pub precip_probability: Option<f64>,
    pub dew_point: Option<f64>,
    /// Relative humidity, between 0 and 1.
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    /// Degrees from true north the wind blows from. Absent when there is no wind.
    pub wind_bearing: Option<f64>,
    pub visibility: Option<f64>,
    /// Fraction of sky covered, between 0 and 1.
    pub cloud_cover: Option<f64>,
    /// Sea-level pressure in millibars (hectopascals for `si`).
    pub pressure: Option<f64>,
    /// Columnar ozone density in Dobson units.
    pub ozone: Option<f64>,
    pub uv_index: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currently {
    #[serde(rename = "time")]
    pub time_unix: i64,
    #[serde(skip_deserializing, rename = "timeUtc", skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub nearest_storm_distance: Option<f64>,
    pub nearest_storm_bearing: Option<f64>,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    #[serde(flatten)]
    pub conditions: Conditions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteData {
    #[serde(rename = "time")]
    pub time_unix: i64,
    #[serde(skip_deserializing, rename = "timeUtc", skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub precip_intensity: Option<f64>,
    pub precip_probability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourData {
    #[serde(rename = "time")]
    pub time_unix: i64,
    #[serde(skip_deserializing, rename = "timeUtc", skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    /// `rain`, `snow` or `sleet`.
    pub precip_type: Option<String>,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    #[serde(flatten)]
    pub conditions: Conditions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayData {
    #[serde(rename = "time")]
    pub time_unix: i64,
    #[serde(skip_deserializing, rename = "timeUtc", skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,

    #[serde(rename = "sunriseTime")]
    pub sunrise_unix: Option<i64>,
    #[serde(skip_deserializing, rename = "sunriseUtc", skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<DateTime<Utc>>,
    #[serde(rename = "sunsetTime")]
    pub sunset_unix: Option<i64>,
    #[serde(skip_deserializing, rename = "sunsetUtc", skip_serializing_if = "Option::is_none")]
    pub sunset: Option<DateTime<Utc>>,

    /// Fraction of the lunation: 0 new moon, 0.5 full moon.
    pub moon_phase: Option<f64>,
    pub precip_type: Option<String>,

    pub precip_intensity_max: Option<f64>,
    #[serde(rename = "precipIntensityMaxTime")]
    pub precip_intensity_max_time_unix: Option<i64>,
    #[serde(
        skip_deserializing,
        rename = "precipIntensityMaxTimeUtc",
        skip_serializing_if = "Option::is_none"
    )]
    pub precip_intensity_max_time: Option<DateTime<Utc>>,

    pub temperature_min: Option<f64>,
    #[serde(rename = "temperatureMinTime")]
    pub temperature_min_time_unix: Option<i64>,
    #[serde(
        skip_deserializing,
        rename = "temperatureMinTimeUtc",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_min_time: Option<DateTime<Utc>>,

    pub temperature_max: Option<f64>,
    #[serde(rename = "temperatureMaxTime")]
    pub temperature_max_time_unix: Option<i64>,
    #[serde(
        skip_deserializing,
        rename = "temperatureMaxTimeUtc",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_max_time: Option<DateTime<Utc>>,

    pub apparent_temperature_min: Option<f64>,
    #[serde(rename = "apparentTemperatureMinTime")]
    pub apparent_temperature_min_time_unix: Option<i64>,
    #[serde(
        skip_deserializing,
        rename = "apparentTemperatureMinTimeUtc",
        skip_serializing_if = "Option::is_none"
    )]
    pub apparent_temperature_min_time: Option<DateTime<Utc>>,

    pub apparent_temperature_max: Option<f64>,
    #[serde(rename = "apparentTemperatureMaxTime")]
    pub apparent_temperature_max_time_unix: Option<i64>,
    #[serde(
        skip_deserializing,
        rename = "apparentTemperatureMaxTimeUtc",
        skip_serializing_if = "Option::is_none"
    )]
    pub apparent_temperature_max_time: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub conditions: Conditions,
}

/// A severe weather advisory issued for the requested location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    #[serde(rename = "expires")]
    pub expires_unix: i64,
    #[serde(skip_deserializing, rename = "expiresUtc", skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    pub description: String,
    pub uri: String,
}

/// Metadata about the sources behind a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Flags {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub isd_stations: Vec<String>,
    #[serde(default)]
    pub madis_stations: Vec<String>,
    #[serde(default)]
    pub datapoint_stations: Vec<String>,
    #[serde(default)]
    pub darksky_stations: Vec<String>,
    /// Units the values were actually reported in.
    #[serde(default)]
    pub units: String,
}
