//! Dashboard configuration.
//!
//! Values come from `OPTIFLOW_*` environment variables with defaults for
//! anything unset. Builders on [`DashboardConfig`] override single values in
//! code and tests.
//!
//! # Example
//!
//! ```
//! use optiflow_dashboard::config::DashboardConfig;
//! use std::time::Duration;
//!
//! let config = DashboardConfig::default()
//!     .with_poll_interval(Duration::from_secs(5))
//!     .with_narrow_viewport_width(768);
//! assert_eq!(config.poll_interval, Duration::from_secs(5));
//! ```

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Polling period variable (seconds)
pub const ENV_POLL_INTERVAL: &str = "OPTIFLOW_POLL_INTERVAL_SECS";
/// Sidebar auto-close threshold variable (pixels)
pub const ENV_NARROW_VIEWPORT: &str = "OPTIFLOW_NARROW_VIEWPORT_PX";
/// `fetch_data` wait bound variable (seconds)
pub const ENV_FETCH_TIMEOUT: &str = "OPTIFLOW_FETCH_TIMEOUT_SECS";
/// Mock latency multiplier variable
pub const ENV_MOCK_LATENCY_SCALE: &str = "OPTIFLOW_MOCK_LATENCY_SCALE";
/// Theme file variable
pub const ENV_THEME_FILE: &str = "OPTIFLOW_THEME_FILE";

/// Runtime settings of the dashboard store
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Period of the dashboard re-fetch.
    ///
    /// Default: 30 seconds
    pub poll_interval: Duration,

    /// Viewports narrower than this close the sidebar on navigation.
    ///
    /// Default: 1024 px
    pub narrow_viewport_width: u32,

    /// How long `fetch_data` waits for its terminal action.
    ///
    /// Default: 10 seconds
    pub fetch_timeout: Duration,

    /// Multiplier on the mock service latencies; 0 disables them.
    ///
    /// Default: 1.0
    pub mock_latency_scale: f64,

    /// File holding the persisted theme.
    ///
    /// Default: `.optiflow/theme.json`
    pub theme_file: PathBuf,
}

impl DashboardConfig {
    /// Load from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable does not parse or a value is
    /// out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value does not parse or is out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            poll_interval: parse(&lookup, ENV_POLL_INTERVAL)?
                .map_or(defaults.poll_interval, Duration::from_secs),
            narrow_viewport_width: parse(&lookup, ENV_NARROW_VIEWPORT)?
                .unwrap_or(defaults.narrow_viewport_width),
            fetch_timeout: parse(&lookup, ENV_FETCH_TIMEOUT)?
                .map_or(defaults.fetch_timeout, Duration::from_secs),
            mock_latency_scale: parse(&lookup, ENV_MOCK_LATENCY_SCALE)?
                .unwrap_or(defaults.mock_latency_scale),
            theme_file: lookup(ENV_THEME_FILE)
                .filter(|path| !path.trim().is_empty())
                .map_or(defaults.theme_file, PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero poll interval or fetch
    /// timeout, or a negative or non-finite latency scale.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Validation(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "fetch timeout must be greater than zero".to_string(),
            ));
        }
        if !self.mock_latency_scale.is_finite() || self.mock_latency_scale < 0.0 {
            return Err(ConfigError::Validation(format!(
                "mock latency scale must be a non-negative number, got {}",
                self.mock_latency_scale
            )));
        }
        Ok(())
    }

    /// Set the polling period.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the sidebar auto-close threshold.
    #[must_use]
    pub const fn with_narrow_viewport_width(mut self, width: u32) -> Self {
        self.narrow_viewport_width = width;
        self
    }

    /// Set the `fetch_data` wait bound.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the mock latency multiplier.
    #[must_use]
    pub const fn with_mock_latency_scale(mut self, scale: f64) -> Self {
        self.mock_latency_scale = scale;
        self
    }

    /// Set the theme file.
    #[must_use]
    pub fn with_theme_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.theme_file = path.into();
        self
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            narrow_viewport_width: 1024,
            fetch_timeout: Duration::from_secs(10),
            mock_latency_scale: 1.0,
            theme_file: PathBuf::from(".optiflow/theme.json"),
        }
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        })
}
