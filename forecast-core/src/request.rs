use chrono::{DateTime, TimeZone, Utc};
use std::{fmt, str::FromStr};

use crate::error::ForecastError;

/// Measurement system the service uses for every numeric field in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    Us,
    Si,
    Ca,
    Uk,
    /// Pick units based on the requested location.
    #[default]
    Auto,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Us => "us",
            Units::Si => "si",
            Units::Ca => "ca",
            Units::Uk => "uk",
            Units::Auto => "auto",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Us, Units::Si, Units::Ca, Units::Uk, Units::Auto]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ForecastError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Units::all()
            .iter()
            .copied()
            .find(|u| u.as_str() == value)
            .ok_or_else(|| ForecastError::InvalidUnits(value.to_string()))
    }
}

/// A report block the service can be asked to leave out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclude {
    Currently,
    Minutely,
    Hourly,
    Daily,
    Alerts,
    Flags,
}

impl Exclude {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclude::Currently => "currently",
            Exclude::Minutely => "minutely",
            Exclude::Hourly => "hourly",
            Exclude::Daily => "daily",
            Exclude::Alerts => "alerts",
            Exclude::Flags => "flags",
        }
    }

    pub const fn all() -> &'static [Exclude] {
        &[
            Exclude::Currently,
            Exclude::Minutely,
            Exclude::Hourly,
            Exclude::Daily,
            Exclude::Alerts,
            Exclude::Flags,
        ]
    }
}

impl fmt::Display for Exclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exclude {
    type Err = ForecastError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Exclude::all()
            .iter()
            .copied()
            .find(|e| e.as_str() == value)
            .ok_or_else(|| ForecastError::InvalidExclude(value.to_string()))
    }
}

/// How empty entries in an exclude list are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmptyExcludes {
    Skip,
    Reject,
}

/// Validate every entry of `excludes`, returning the typed list in input order.
pub(crate) fn parse_excludes<S: AsRef<str>>(
    excludes: &[S],
    empty: EmptyExcludes,
) -> Result<Vec<Exclude>, ForecastError> {
    let mut parsed = Vec::with_capacity(excludes.len());

    for raw in excludes {
        let raw = raw.as_ref();
        if raw.is_empty() && empty == EmptyExcludes::Skip {
            continue;
        }
        parsed.push(raw.parse()?);
    }

    Ok(parsed)
}

/// The point in time a forecast is requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum When {
    Time(DateTime<Utc>),
    /// Seconds since the Unix epoch.
    Unix(i64),
    /// Passed through to the URL untouched, e.g. `2013-05-06T12:00:00-0400`.
    Raw(String),
}

impl When {
    /// The `{time}` segment of the request path.
    pub fn to_path_segment(&self) -> String {
        match self {
            When::Time(dt) => dt.timestamp().to_string(),
            When::Unix(ts) => ts.to_string(),
            When::Raw(raw) => raw.clone(),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for When {
    fn from(value: DateTime<Tz>) -> Self {
        When::Time(value.with_timezone(&Utc))
    }
}

impl From<i64> for When {
    fn from(value: i64) -> Self {
        When::Unix(value)
    }
}

impl From<String> for When {
    fn from(value: String) -> Self {
        When::Raw(value)
    }
}

impl From<&str> for When {
    fn from(value: &str) -> Self {
        When::Raw(value.to_string())
    }
}

/// Everything needed to build a single request URL.
#[derive(Debug, Clone)]
pub(crate) struct ForecastRequest<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub when: Option<&'a When>,
    pub units: Units,
    pub excludes: &'a [Exclude],
    pub extend_hourly: bool,
}

impl ForecastRequest<'_> {
    pub fn url(&self, base_url: &str, api_key: &str) -> String {
        let mut url = format!(
            "{}/{}/{:.6},{:.6}",
            base_url.trim_end_matches('/'),
            api_key,
            self.latitude,
            self.longitude
        );

        if let Some(when) = self.when {
            url.push(',');
            url.push_str(&when.to_path_segment());
        }

        let excludes = self
            .excludes
            .iter()
            .map(Exclude::as_str)
            .collect::<Vec<_>>()
            .join(",");
        url.push_str(&format!("?units={}&exclude={}", self.units, excludes));

        if self.extend_hourly {
            url.push_str("&extend=hourly");
        }

        url
    }
}
