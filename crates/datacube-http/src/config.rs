//! Client configuration.

use std::time::Duration;

use datacube_core::error::ValidationError;
use datacube_core::{ApiKey, BaseUrl, Result};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the service base URL.
pub const ENV_BASE_URL: &str = "DATACUBE_BASE_URL";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "DATACUBE_API_KEY";

/// Environment variable holding the request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "DATACUBE_TIMEOUT_SECS";

/// Everything needed to talk to a DataCube service.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datacube_core::{ApiKey, BaseUrl};
/// use datacube_http::ClientConfig;
///
/// let config = ClientConfig::new(
///     BaseUrl::new("https://datacube.example.com").unwrap(),
///     ApiKey::new("dc_live_key").unwrap(),
/// )
/// .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: BaseUrl,
    pub api_key: ApiKey,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config with the default timeout.
    pub fn new(base_url: BaseUrl, api_key: ApiKey) -> Self {
        Self {
            base_url,
            api_key,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a config from `DATACUBE_BASE_URL`, `DATACUBE_API_KEY` and the
    /// optional `DATACUBE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(ENV_BASE_URL).ok_or_else(|| ValidationError::Config {
            reason: format!("{} is not set", ENV_BASE_URL),
        })?;
        let api_key = lookup(ENV_API_KEY).ok_or_else(|| ValidationError::Config {
            reason: format!("{} is not set", ENV_API_KEY),
        })?;

        let mut config = Self::new(BaseUrl::new(base_url)?, ApiKey::new(api_key)?);

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ValidationError::Config {
                reason: format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, raw
                ),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings that cannot be enforced by their types.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(ValidationError::Config {
                reason: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
