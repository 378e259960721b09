//! Application configuration module
//!
//! Raw, unvalidated settings gathered from a TOML file and/or the environment.
//! The client's [`Config`](crate::client::Config) turns an [`AppConfig`] into
//! typed, validated values.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the identity API base URL
pub const ENV_API_URL: &str = "ROLLCALL_API_URL";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "ROLLCALL_TIMEOUT_SECS";
/// Environment variable holding the session cache file path
pub const ENV_SESSION_FILE: &str = "ROLLCALL_SESSION_FILE";
/// Environment variable holding the maximum cached session age in seconds
pub const ENV_SESSION_MAX_AGE_SECS: &str = "ROLLCALL_SESSION_MAX_AGE_SECS";
/// Environment variable selecting the concurrent sign-in policy
pub const ENV_MUTATION_POLICY: &str = "ROLLCALL_MUTATION_POLICY";

/// How the session store treats a login/signup issued while another is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationPolicy {
    /// Every call proceeds; only the most recently issued one may commit.
    #[default]
    LatestWins,
    /// A call issued while another is in flight fails with `Busy`.
    RejectConcurrent,
}

impl FromStr for MutationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest-wins" | "latest_wins" => Ok(Self::LatestWins),
            "reject-concurrent" | "reject_concurrent" => Ok(Self::RejectConcurrent),
            other => Err(ConfigError::InvalidValue {
                key: "mutation_policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Identity API base URL
    pub api_url: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Where the session cache lives
    pub session_file: Option<PathBuf>,
    /// Cached sessions older than this are ignored at startup
    pub session_max_age_secs: Option<u64>,
    pub mutation_policy: Option<MutationPolicy>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.api_url {
            let parsed = reqwest::Url::parse(url).map_err(|_| ConfigError::InvalidUrl(url.clone()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Start from an already-parsed configuration (e.g. a TOML file)
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Set the identity API base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = Some(url.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.session_file = Some(path.into());
        self
    }

    pub fn session_max_age_secs(mut self, secs: u64) -> Self {
        self.config.session_max_age_secs = Some(secs);
        self
    }

    pub fn mutation_policy(mut self, policy: MutationPolicy) -> Self {
        self.config.mutation_policy = Some(policy);
        self
    }

    /// Overlay values found in the process environment
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            self.config.api_url = Some(url);
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            self.config.request_timeout_secs = Some(parse_secs(ENV_TIMEOUT_SECS, &raw)?);
        }
        if let Ok(path) = std::env::var(ENV_SESSION_FILE) {
            self.config.session_file = Some(PathBuf::from(path));
        }
        if let Ok(raw) = std::env::var(ENV_SESSION_MAX_AGE_SECS) {
            self.config.session_max_age_secs = Some(parse_secs(ENV_SESSION_MAX_AGE_SECS, &raw)?);
        }
        if let Ok(raw) = std::env::var(ENV_MUTATION_POLICY) {
            self.config.mutation_policy = Some(raw.parse()?);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
