//! Document identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::validate::validate_document_id;

/// A validated document identifier (the server-assigned `_id`).
///
/// # Example
///
/// ```
/// use datacube_core::DocumentId;
///
/// let id = DocumentId::new("65a1f0c2e4b0a1b2c3d4e5f7").unwrap();
/// assert_eq!(id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f7");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new document id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not a 24-character
    /// hexadecimal identifier.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        validate_document_id(&s)?;
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
