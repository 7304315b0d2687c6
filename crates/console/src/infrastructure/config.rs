//! Console configuration

use std::env;
use std::time::Duration;

use simdeck_domain::ExclusionList;
use url::Url;

use crate::infrastructure::assistant_client::{DEFAULT_ASSISTANT_STATUS_URL, DEFAULT_ASSISTANT_URL};
use crate::infrastructure::simulation_client::DEFAULT_SIMULATION_URL;

/// Default seconds between poll ticks.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL ({value}): {source}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("{var} must be a positive whole number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },
    #[error("{var} must be true or false, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Console configuration loaded from environment
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Host of `GET /response`
    pub simulation_url: String,
    /// Host of `GET /llm_status`
    pub assistant_status_url: String,
    /// Host of `POST /set/prompt`
    pub assistant_url: String,

    /// Time between poll ticks while a backend is not yet connected
    pub poll_interval: Duration,
    /// Upper bound for every backend request
    pub request_timeout: Duration,

    /// Keywords hiding infrastructure objects from the scene list
    pub excluded_keywords: ExclusionList,

    /// Append a visible timeline entry when an instruction fails
    pub surface_dispatch_failures: bool,
    /// Show the timeline newest first
    pub newest_first: bool,
}

impl ConsoleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Ok(Self {
            simulation_url: url_var(
                "SIMDECK_SIMULATION_URL",
                var("SIMDECK_SIMULATION_URL"),
                DEFAULT_SIMULATION_URL,
            )?,
            assistant_status_url: url_var(
                "SIMDECK_ASSISTANT_STATUS_URL",
                var("SIMDECK_ASSISTANT_STATUS_URL"),
                DEFAULT_ASSISTANT_STATUS_URL,
            )?,
            assistant_url: url_var(
                "SIMDECK_ASSISTANT_URL",
                var("SIMDECK_ASSISTANT_URL"),
                DEFAULT_ASSISTANT_URL,
            )?,

            poll_interval: seconds_var(
                "SIMDECK_POLL_INTERVAL_SECS",
                var("SIMDECK_POLL_INTERVAL_SECS"),
                DEFAULT_POLL_INTERVAL_SECS,
            )?,
            request_timeout: seconds_var(
                "SIMDECK_REQUEST_TIMEOUT_SECS",
                var("SIMDECK_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,

            excluded_keywords: match var("SIMDECK_EXCLUDED_KEYWORDS") {
                Some(list) => ExclusionList::new(list.split(',').map(str::trim)),
                None => ExclusionList::default(),
            },

            surface_dispatch_failures: flag_var(
                "SIMDECK_SURFACE_DISPATCH_FAILURES",
                var("SIMDECK_SURFACE_DISPATCH_FAILURES"),
                false,
            )?,
            newest_first: flag_var("SIMDECK_NEWEST_FIRST", var("SIMDECK_NEWEST_FIRST"), true)?,
        })
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            simulation_url: DEFAULT_SIMULATION_URL.to_string(),
            assistant_status_url: DEFAULT_ASSISTANT_STATUS_URL.to_string(),
            assistant_url: DEFAULT_ASSISTANT_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            excluded_keywords: ExclusionList::default(),
            surface_dispatch_failures: false,
            newest_first: true,
        }
    }
}

fn url_var(
    name: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<String, ConfigError> {
    let value = value.unwrap_or_else(|| default.to_string());
    Url::parse(&value).map_err(|source| ConfigError::InvalidUrl {
        var: name,
        value: value.clone(),
        source,
    })?;
    Ok(value)
}

fn seconds_var(
    name: &'static str,
    value: Option<String>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(default));
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSeconds { var: name, value }),
    }
}

fn flag_var(name: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { var: name, value }),
    }
}
