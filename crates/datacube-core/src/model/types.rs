//! Operation result types.

use serde::{Deserialize, Serialize};

use crate::types::DocumentId;

use super::Collection;

/// Output from creating collections in an existing database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCollectionOutput {
    /// The database's collections after the change.
    pub collections: Vec<Collection>,

    /// Number of collections in the database.
    #[serde(default)]
    pub total_collections: u64,

    /// Number of fields across all collections.
    #[serde(default)]
    pub total_fields: u64,
}

/// Output from inserting documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOutput {
    /// Ids assigned to the inserted documents, in insertion order.
    pub inserted_ids: Vec<DocumentId>,
}

/// Aggregate counts for a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    pub total_collections: u64,
    pub total_fields: u64,
}

/// Acknowledgement for operations that return no entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Server message, if any.
    #[serde(default)]
    pub message: Option<String>,
}
