//! Core DataCube types.
//!
//! These types enforce their invariants at construction time, so an invalid
//! identifier can never reach the network layer.

mod api_key;
mod base_url;
mod collection_name;
mod database_id;
mod document_id;

pub use api_key::ApiKey;
pub use base_url::BaseUrl;
pub use collection_name::CollectionName;
pub use database_id::DatabaseId;
pub use document_id::DocumentId;
