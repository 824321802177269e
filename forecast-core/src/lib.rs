//! Client library for the forecast.io weather API.
//!
//! This crate defines:
//! - [`Connection`]: API key, unit setting and call counter behind one lock
//! - Request validation (units, excluded blocks, point in time)
//! - The [`Report`] data model and its timestamp normalization
//! - On-disk configuration used by `forecast-cli`
//!
//! ```no_run
//! # async fn run() -> Result<(), forecast_core::ForecastError> {
//! use forecast_core::Connection;
//!
//! let conn = Connection::new("API_KEY");
//! conn.set_units("si").await?;
//!
//! let mut report = conn.forecast(37.8267, -122.423, &["minutely"], false).await?;
//! report.normalize_times();
//! println!("calls today: {}", conn.api_calls().await);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod report;
pub mod request;
pub mod transport;

pub use config::Config;
pub use connection::{API_CALLS_HEADER, Connection, DEFAULT_BASE_URL};
pub use error::{BoxError, ForecastError};
pub use report::{
    Alert, Conditions, Currently, DataBlock, DayData, Flags, HourData, MinuteData, NormalizeTimes,
    Report,
};
pub use request::{Exclude, Units, When};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
