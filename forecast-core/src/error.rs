use thiserror::Error;

/// Boxed error produced by a [`Transport`](crate::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid units requested: '{0}'. Supported units: us, si, ca, uk, auto.")]
    InvalidUnits(String),

    #[error(
        "Invalid exclude requested: '{0}'. Supported excludes: currently, minutely, hourly, daily, alerts, flags."
    )]
    InvalidExclude(String),

    /// The request never produced a response. The source is the transport's own error.
    #[error("Request to forecast.io failed")]
    Transport(#[source] BoxError),

    #[error("forecast.io returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse forecast.io response JSON")]
    Parse(#[from] serde_json::Error),
}

impl ForecastError {
    /// True for errors raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUnits(_) | Self::InvalidExclude(_))
    }
}
