//! datacube-http - HTTP client for the DataCube document-database service.
//!
//! [`HttpDocumentService`] implements [`datacube_core::DocumentService`]
//! against the DataCube REST API. Inputs are validated before any request
//! is sent; every call makes exactly one request and never retries.

mod client;
mod config;
mod endpoints;
mod service;

pub use config::{ClientConfig, DEFAULT_TIMEOUT, ENV_API_KEY, ENV_BASE_URL, ENV_TIMEOUT_SECS};
pub use service::HttpDocumentService;
