use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError, MutationPolicy};

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Validated client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    server_url: String,
    request_timeout: Duration,
    session_file: Option<PathBuf>,
    session_max_age: Option<chrono::Duration>,
    mutation_policy: MutationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            session_file: default_session_file(),
            session_max_age: None,
            mutation_policy: MutationPolicy::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `ROLLCALL_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_builder(AppConfig::builder().with_env()?)
    }

    /// Read a TOML file, then overlay the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        let app = AppConfig::from_toml_str(&source)?;
        Self::with_builder(AppConfigBuilder::from_config(app).with_env()?)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        let defaults = Self::default();
        Ok(Self {
            server_url: app
                .api_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            request_timeout: app
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            session_file: app.session_file.or(defaults.session_file),
            session_max_age: app
                .session_max_age_secs
                .and_then(|secs| i64::try_from(secs).ok())
                .map(chrono::Duration::seconds),
            mutation_policy: app.mutation_policy.unwrap_or_default(),
        })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Session cache location, if one could be determined
    pub fn session_file(&self) -> Option<&Path> {
        self.session_file.as_deref()
    }

    pub fn session_max_age(&self) -> Option<chrono::Duration> {
        self.session_max_age
    }

    pub fn mutation_policy(&self) -> MutationPolicy {
        self.mutation_policy
    }
}

fn default_session_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("rollcall").join("session.json"))
}
