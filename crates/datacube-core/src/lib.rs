//! datacube-core - Core types and traits for the DataCube SDK.
//!
//! This crate holds everything that does not depend on a transport: the
//! validated identifier types, the pre-flight validators, the data model,
//! the error taxonomy, the [`DocumentService`] capability trait and the
//! [`Paginator`] that drives paginated reads through it.

pub mod error;
pub mod model;
pub mod paginate;
pub mod service;
pub mod types;
pub mod validate;

pub use error::{ApiError, Error, ValidationError};
pub use model::{
    Collection, CollectionSpec, Confirmation, CreateCollectionOutput, Database, DatabaseMetadata,
    Document, Field, InsertOutput, Pagination, ReadOptions, ReadPage,
};
pub use paginate::{DEFAULT_PAGE_SIZE, PaginationFailure, Paginator, PaginatorState};
pub use service::DocumentService;
pub use types::{ApiKey, BaseUrl, CollectionName, DatabaseId, DocumentId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
