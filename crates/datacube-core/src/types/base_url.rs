//! Service base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::{Host, Url};

use crate::error::{Error, ValidationError};

/// The root every DataCube endpoint path is appended to.
///
/// Only `https` is accepted, except for loopback hosts where plain `http` is
/// allowed for local development. The URL may carry a path prefix but no
/// query or fragment. Trailing slashes are stripped, so the string form never
/// ends in `/` and `https://host/` and `https://host` are the same base.
///
/// # Example
///
/// ```
/// use datacube_core::BaseUrl;
///
/// let base = BaseUrl::new("https://datacube.example.com/").unwrap();
/// assert_eq!(base.as_str(), "https://datacube.example.com");
/// assert_eq!(
///     base.endpoint("/api/v1/databases"),
///     "https://datacube.example.com/api/v1/databases"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl {
    url: Url,
    root: String,
}

impl BaseUrl {
    /// Parse and check a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Config`] if the string is not an absolute
    /// URL, uses a scheme other than `https` (or `http` on a loopback host),
    /// or carries a query or fragment.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let raw = s.as_ref();
        let reject = |reason: String| ValidationError::Config {
            reason: format!("invalid base URL '{}': {}", raw, reason),
        };

        let url = Url::parse(raw.trim()).map_err(|e| reject(e.to_string()))?;
        check_origin(&url).map_err(reject)?;
        if url.query().is_some() || url.fragment().is_some() {
            return Err(reject("must not carry a query or fragment".to_string()).into());
        }

        let root = url.as_str().trim_end_matches('/').to_string();
        // Reparse so slash variants of one base hold the same Url.
        let url = Url::parse(&root).map_err(|e| reject(e.to_string()))?;
        Ok(Self { url, root })
    }

    /// Full URL for an endpoint path such as `/api/v1/documents`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }

    /// The normalized URL, without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.root
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }
}

/// Scheme and host rules.
fn check_origin(url: &Url) -> Result<(), String> {
    let loopback = match url.host() {
        Some(Host::Domain(name)) => name.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => return Err("must be an absolute URL with a host".to_string()),
    };

    match url.scheme() {
        "https" => Ok(()),
        "http" if loopback => Ok(()),
        "http" => Err("plain http is only allowed for loopback hosts".to_string()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BaseUrl> for String {
    fn from(base: BaseUrl) -> Self {
        base.root
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.root
    }
}
