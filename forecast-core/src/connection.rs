use reqwest::header::HeaderMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{
    error::ForecastError,
    report::Report,
    request::{EmptyExcludes, ForecastRequest, Units, When, parse_excludes},
    transport::{HttpResponse, ReqwestTransport, Transport},
};

/// Service origin every request is built from.
pub const DEFAULT_BASE_URL: &str = "https://api.forecast.io/forecast";

/// Response header carrying today's cumulative call count for the API key.
pub const API_CALLS_HEADER: &str = "x-forecast-api-calls";

#[derive(Debug, Default)]
struct ConnectionState {
    units: Units,
    api_calls: u64,
}

/// A configured client for the forecast.io API.
///
/// Reads of the unit setting and call counter share the lock. Changing units
/// and both fetch operations hold it exclusively for their whole duration,
/// network call included, so fetches through one `Connection` never overlap.
/// Share a connection across tasks with `Arc`.
#[derive(Debug)]
pub struct Connection {
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
    state: RwLock<ConnectionState>,
}

impl Connection {
    /// Create a connection using `auto` units. The key is sent as-is.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: Arc::new(ReqwestTransport::new()),
            state: RwLock::new(ConnectionState::default()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Start from `units` instead of `auto`.
    pub fn with_units(mut self, units: Units) -> Self {
        self.state.get_mut().units = units;
        self
    }

    pub async fn units(&self) -> Units {
        self.state.read().await.units
    }

    /// Calls made today with this connection's key, as of the last response
    /// that reported it. Zero until then.
    pub async fn api_calls(&self) -> u64 {
        self.state.read().await.api_calls
    }

    /// Switch to one of `us`, `si`, `ca`, `uk` or `auto`. Anything else is
    /// rejected and the current setting is kept.
    pub async fn set_units(&self, units: &str) -> Result<(), ForecastError> {
        let units: Units = units.parse()?;
        self.state.write().await.units = units;
        Ok(())
    }

    /// Fetch the forecast for "now" at the given location.
    ///
    /// Empty entries in `excludes` are ignored. With `extend_hourly` the
    /// hourly block covers seven days instead of two.
    pub async fn forecast<S: AsRef<str>>(
        &self,
        latitude: f64,
        longitude: f64,
        excludes: &[S],
        extend_hourly: bool,
    ) -> Result<Report, ForecastError> {
        let excludes = parse_excludes(excludes, EmptyExcludes::Skip)?;

        let mut state = self.state.write().await;
        let request = ForecastRequest {
            latitude,
            longitude,
            when: None,
            units: state.units,
            excludes: &excludes,
            extend_hourly,
        };

        self.execute(&mut state, &request).await
    }

    /// Fetch observed or forecast conditions for a specific point in time.
    ///
    /// Every entry in `excludes` must name a block; unlike [`forecast`],
    /// empty strings are rejected. A [`When::Raw`] value is not checked
    /// locally.
    ///
    /// [`forecast`]: Connection::forecast
    pub async fn forecast_at_time<S: AsRef<str>>(
        &self,
        latitude: f64,
        longitude: f64,
        when: impl Into<When>,
        excludes: &[S],
    ) -> Result<Report, ForecastError> {
        let excludes = parse_excludes(excludes, EmptyExcludes::Reject)?;
        let when = when.into();

        let mut state = self.state.write().await;
        let request = ForecastRequest {
            latitude,
            longitude,
            when: Some(&when),
            units: state.units,
            excludes: &excludes,
            extend_hourly: false,
        };

        self.execute(&mut state, &request).await
    }

    async fn execute(
        &self,
        state: &mut ConnectionState,
        request: &ForecastRequest<'_>,
    ) -> Result<Report, ForecastError> {
        let url = request.url(&self.base_url, &self.api_key);
        debug!(url = %self.logged_url(request), "requesting forecast");

        let res = self.transport.get(&url).await.map_err(ForecastError::Transport)?;
        debug!(status = res.status, bytes = res.body.len(), "forecast.io responded");

        // Recorded before the status and body are checked: the call was counted
        // by the service either way.
        if let Some(calls) = api_calls_from(&res.headers) {
            state.api_calls = calls;
        }

        check_status(&res)?;

        Ok(Report::from_json(&res.body)?)
    }

    /// The request URL with the key segment masked, for logging.
    fn logged_url(&self, request: &ForecastRequest<'_>) -> String {
        request.url(&self.base_url, "<redacted>")
    }
}

fn api_calls_from(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(API_CALLS_HEADER)?;
    let parsed = value.to_str().ok().and_then(|v| v.trim().parse().ok());

    if parsed.is_none() {
        warn!(value = ?value, "ignoring unparsable call-count header");
    }
    parsed
}

fn check_status(res: &HttpResponse) -> Result<(), ForecastError> {
    if res.is_success() {
        return Ok(());
    }

    Err(ForecastError::Status {
        status: res.status,
        body: truncate_body(&res.body),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
