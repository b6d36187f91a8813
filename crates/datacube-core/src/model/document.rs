//! Stored document type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::DocumentId;

/// A document as returned by the service.
///
/// Besides its free-form fields, a stored document always carries the
/// server-assigned `_id` and the soft-delete marker `is_deleted`. Deleting a
/// document only sets the marker; the record itself stays readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: DocumentId,

    /// Soft-delete marker. Required on the wire.
    pub is_deleted: bool,

    /// User-supplied fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Get a user field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Convert into a single JSON object including `_id` and `is_deleted`.
    pub fn into_value(self) -> Value {
        let mut obj = self.fields;
        obj.insert("_id".to_string(), Value::String(self.id.into()));
        obj.insert("is_deleted".to_string(), Value::Bool(self.is_deleted));
        Value::Object(obj)
    }
}
