//! Backend connection configuration.
//!
//! Values come from `TEABREAK_*` environment variables, falling back to
//! [`teabreak_core::defaults`].

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use teabreak_core::defaults::{API_URL, ENV_API_URL, ENV_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for teabreak_core::Error {
    fn from(e: ConfigError) -> Self {
        teabreak_core::Error::Config(e.to_string())
    }
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend, without the `/api` prefix the web proxy adds.
    pub base_url: String,
    /// Timeout for one request in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_URL.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load from environment variables.
    ///
    /// A timeout that is set but not a number is an error rather than being
    /// silently replaced by the default.
    pub fn from_env() -> ConfigResult<Self> {
        let base_url = env::var(ENV_API_URL).unwrap_or_else(|_| API_URL.to_string());
        let timeout_secs = match env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?,
            Err(_) => REQUEST_TIMEOUT_SECS,
        };

        let config = Self {
            base_url,
            timeout_secs,
        };
        debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "Loaded client config from environment"
        );
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
