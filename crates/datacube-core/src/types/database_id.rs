//! Database identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::validate::validate_database_id;

/// A validated database identifier.
///
/// Database ids are 24-character hexadecimal strings assigned by the service
/// (the ObjectId format of the backing store).
///
/// # Example
///
/// ```
/// use datacube_core::DatabaseId;
///
/// let id = DatabaseId::new("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
/// assert_eq!(id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
///
/// assert!(DatabaseId::new("not-an-id").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatabaseId(String);

impl DatabaseId {
    /// Create a new database id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is empty, is not 24
    /// characters long, or contains non-hex characters.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        validate_database_id(&s)?;
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatabaseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DatabaseId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DatabaseId> for String {
    fn from(id: DatabaseId) -> Self {
        id.0
    }
}

impl AsRef<str> for DatabaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
