//! Error types for the DataCube SDK.
//!
//! Every operation fails with one of two kinds: an [`ApiError`] when the
//! remote call (or the transport carrying it) failed, or a
//! [`ValidationError`] when the input was rejected locally before any
//! request was sent.

use std::fmt;
use thiserror::Error;

/// The unified error type for DataCube operations.
///
/// Callers match on the variant to decide whether to fix their input
/// ([`Error::Validation`]) or retry/report ([`Error::Api`]).
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The remote service reported a failure, or no response was received.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The input was rejected before any network call was attempted.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Returns the HTTP status code for API errors.
    ///
    /// Validation errors never carry a status code.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::Validation(_) => None,
        }
    }

    /// Check if this error was raised locally by a validator.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// A failure reported by (or while reaching) the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code, or [`ApiError::NO_RESPONSE`] for transport failures.
    pub status: u16,
    /// Machine-readable error code from the response body (if present).
    pub error: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Sentinel status meaning "no response was received".
    pub const NO_RESPONSE: u16 = 0;

    /// Create a new API error.
    pub fn new(status: u16, error: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    /// Create an error for a request that never produced a response
    /// (timeout, refused connection, DNS or TLS failure).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(Self::NO_RESPONSE, None, message)
    }

    /// Check if the request never reached the service.
    pub fn is_transport(&self) -> bool {
        self.status == Self::NO_RESPONSE
    }

    /// Check if the service reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Check if the API key was missing or rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transport() {
            write!(f, "no response")?;
        } else {
            write!(f, "HTTP {}", self.status)?;
        }
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Input validation errors.
///
/// Each variant renders a distinct human-readable message; none of them
/// carries a status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Invalid database identifier.
    #[error("invalid database id '{value}': {reason}")]
    DatabaseId { value: String, reason: String },

    /// Invalid document identifier.
    #[error("invalid document id '{value}': {reason}")]
    DocumentId { value: String, reason: String },

    /// Invalid database name.
    #[error("invalid database name: {reason}")]
    DatabaseName { reason: String },

    /// Invalid collection name.
    #[error("invalid collection name: {reason}")]
    CollectionName { reason: String },

    /// Invalid collection definition list.
    #[error("invalid collections: {reason}")]
    Collections { reason: String },

    /// Invalid document payload.
    #[error("invalid document: {reason}")]
    Document { reason: String },

    /// Invalid read filter.
    #[error("invalid filter: {reason}")]
    Filter { reason: String },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {reason}")]
    Pagination { reason: String },

    /// Invalid client configuration (base URL, API key, timeout).
    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}
