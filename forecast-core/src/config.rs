use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::Arc, time::Duration};

use crate::{Connection, ReqwestTransport, Units};

/// Environment variable consulted for the API key when no flag is given.
pub const API_KEY_ENV: &str = "FORECAST_API_KEY";

/// Request timeout used when the config file does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings stored on disk between runs.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "si"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,

    /// One of `us`, `si`, `ca`, `uk`, `auto`. Defaults to `auto` when absent.
    pub units: Option<String>,

    /// Whole-request timeout in seconds. Defaults to 30.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("io", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_units(&mut self, units: Units) {
        self.units = Some(units.as_str().to_string());
    }

    /// Stored units, validated.
    pub fn units(&self) -> Result<Units> {
        match self.units.as_deref() {
            None => Ok(Units::default()),
            Some(raw) => raw.parse().context("Invalid `units` in config file"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Resolve the API key: explicit flag, then `FORECAST_API_KEY`, then the config file.
    pub fn resolve_api_key(&self, flag: Option<&str>) -> Result<String> {
        let env = std::env::var(API_KEY_ENV).ok();
        self.pick_api_key(flag, env.as_deref())
    }

    fn pick_api_key(&self, flag: Option<&str>, env: Option<&str>) -> Result<String> {
        flag.or(env)
            .or(self.api_key.as_deref())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: pass --api-key, set {API_KEY_ENV}, or run `forecast configure`."
                )
            })
    }

    /// Build a connection with the resolved key, the configured units and a
    /// client that gives up after [`Config::timeout`].
    pub fn connection(&self, api_key_flag: Option<&str>) -> Result<Connection> {
        let api_key = self.resolve_api_key(api_key_flag)?;
        let units = self.units()?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Connection::new(api_key)
            .with_units(units)
            .with_transport(Arc::new(ReqwestTransport::with_client(http))))
    }
}
