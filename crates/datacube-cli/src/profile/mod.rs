//! Connection profile: flags and environment first, saved profile second.

pub mod storage;

use std::time::Duration;

use anyhow::{Context, Result};

use datacube_core::{ApiKey, BaseUrl};
use datacube_http::{ClientConfig, HttpDocumentService};

use crate::cli::ConnectionArgs;

/// A saved base URL and API key.
#[derive(Debug, Clone)]
pub struct Profile {
    pub base_url: BaseUrl,
    pub api_key: ApiKey,
}

impl Profile {
    /// Build a profile from explicit connection flags, without consulting
    /// the saved one.
    pub fn from_args(args: &ConnectionArgs) -> Result<Self> {
        let base_url = args
            .base_url
            .as_deref()
            .context("--base-url is required")?;
        let api_key = args.api_key.clone().context("--api-key is required")?;

        Ok(Self {
            base_url: BaseUrl::new(base_url).context("Invalid base URL")?,
            api_key: ApiKey::new(api_key).context("Invalid API key")?,
        })
    }
}

/// Resolve the client config from flags, environment and the saved profile.
pub fn client_config(args: &ConnectionArgs) -> Result<ClientConfig> {
    let saved = if args.base_url.is_some() && args.api_key.is_some() {
        None
    } else {
        storage::load_profile().context("Failed to load profile")?
    };

    let base_url = match (&args.base_url, &saved) {
        (Some(url), _) => BaseUrl::new(url).context("Invalid base URL")?,
        (None, Some(profile)) => profile.base_url.clone(),
        (None, None) => anyhow::bail!(
            "No base URL configured. Pass --base-url, set DATACUBE_BASE_URL or run 'datacube config set'."
        ),
    };

    let api_key = match (&args.api_key, &saved) {
        (Some(key), _) => ApiKey::new(key.clone()).context("Invalid API key")?,
        (None, Some(profile)) => profile.api_key.clone(),
        (None, None) => anyhow::bail!(
            "No API key configured. Pass --api-key, set DATACUBE_API_KEY or run 'datacube config set'."
        ),
    };

    let mut config = ClientConfig::new(base_url, api_key);
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

/// Resolve the connection and build a service.
pub fn connect(args: &ConnectionArgs) -> Result<HttpDocumentService> {
    let config = client_config(args)?;
    HttpDocumentService::new(config).context("Failed to create client")
}
