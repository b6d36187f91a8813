//! Database and collection schema types.

use serde::{Deserialize, Serialize};

use crate::types::DatabaseId;

/// Field type assumed when a field is declared without one.
pub const DEFAULT_FIELD_TYPE: &str = "string";

/// A field descriptor within a collection: `{ name, type? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name. Empty means "missing" and is rejected by the validators.
    #[serde(default)]
    pub name: String,

    /// Declared field type, if any.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

impl Field {
    /// Create a field without a declared type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
        }
    }

    /// Create a field with a declared type.
    pub fn typed(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type.into()),
        }
    }

    /// Returns the declared type, or [`DEFAULT_FIELD_TYPE`] when omitted.
    pub fn effective_type(&self) -> &str {
        self.field_type.as_deref().unwrap_or(DEFAULT_FIELD_TYPE)
    }
}

/// A collection definition sent when creating databases or collections.
///
/// Deserializing JSON without a `name` yields an empty name, so the problem
/// is reported by [`validate_collections`](crate::validate::validate_collections)
/// instead of by the JSON decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Collection name.
    #[serde(default)]
    pub name: String,

    /// Ordered field descriptors.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl CollectionSpec {
    /// Create a collection definition with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field descriptor.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

/// A collection as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection name.
    pub name: String,

    /// Server-assigned collection id. Opaque; collections are addressed by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Ordered field descriptors.
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A database as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Database id.
    pub id: DatabaseId,

    /// Database name (immutable once created).
    pub name: String,

    /// Collections owned by this database.
    #[serde(default)]
    pub collections: Vec<Collection>,
}
