//! API key type.

use std::fmt;

use crate::error::{Error, ValidationError};

/// An API key for authenticating requests to the DataCube service.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treated as opaque; only its presence is checked
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key. The key must not be empty.
    pub fn new(key: impl Into<String>) -> Result<Self, Error> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValidationError::Config {
                reason: "API key cannot be empty".to_string(),
            }
            .into());
        }
        Ok(Self(key))
    }

    /// Returns the key value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP authorization headers or when
    /// persisting the key at the caller's request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Hide key value in Debug output
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}
