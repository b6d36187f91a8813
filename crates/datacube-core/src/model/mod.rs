//! Data model for databases, collections and documents.
//!
//! Nothing here is cached: every value is decoded fresh from a response and
//! owned by the caller from then on.

mod document;
mod page;
mod schema;
mod types;

pub use document::Document;
pub use page::{Pagination, ReadOptions, ReadPage};
pub use schema::{Collection, CollectionSpec, DEFAULT_FIELD_TYPE, Database, Field};
pub use types::{Confirmation, CreateCollectionOutput, DatabaseMetadata, InsertOutput};
