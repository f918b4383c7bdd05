//! Bridge configuration.
//!
//! Read once at startup from an optional TOML file; every field has a default
//! except the API key.

use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Top-level configuration structure
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub remote: RemoteConfig,
    pub device: DeviceConfig,
    pub poll: PollConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| Error::ConfigRead {
            path: path.to_path_buf(),
            err,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::ConfigParse)
    }

    /// Replaces file values with the ones given on the command line.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(base_url) = overrides.base_url {
            self.remote.base_url = base_url;
        }
        if let Some(api_key) = overrides.api_key {
            self.remote.api_key = Some(api_key);
        }
        if let Some(addr) = overrides.broadcast_address {
            self.device.broadcast_address = addr;
        }
        if let Some(interval) = overrides.poll_interval_ms {
            self.poll.interval_ms = interval;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// The API key, if one was configured.
    pub fn api_key(&self) -> Result<&str> {
        match self.remote.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::MissingApiKey),
        }
    }
}

/// Values that take precedence over the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub broadcast_address: Option<Ipv4Addr>,
    pub poll_interval_ms: Option<u64>,
    pub log_level: Option<LogLevel>,
}

/// Mood server connection.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://moodmanager.me/api".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Local network settings for finding and driving the bulb.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    pub broadcast_address: Ipv4Addr,
    pub discovery_window_ms: u64,
    pub command_timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            broadcast_address: Ipv4Addr::BROADCAST,
            discovery_window_ms: 5000,
            command_timeout_ms: 1000,
        }
    }
}

impl DeviceConfig {
    pub fn discovery_window(&self) -> Duration {
        Duration::from_millis(self.discovery_window_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Loop timing.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollConfig {
    pub interval_ms: u64,
    /// Wait used instead of `interval_ms` after the search status endpoint answers with an error status
    pub error_backoff_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            error_backoff_ms: 5000,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}

#[derive(
    Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: LogLevel,
}
