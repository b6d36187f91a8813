//! Pre-flight validators.
//!
//! Every validator is a pure function over a single argument: it either
//! returns `Ok(())` or a [`ValidationError`] describing the first problem it
//! found. Nothing here touches the network.

use serde_json::Value;

use crate::error::ValidationError;
use crate::model::CollectionSpec;
use crate::types::CollectionName;

/// Length of a database or document identifier (a hex-encoded ObjectId).
pub const OBJECT_ID_LEN: usize = 24;

/// Validate a database identifier.
///
/// Accepts exactly 24 ASCII hexadecimal characters.
pub fn validate_database_id(id: &str) -> Result<(), ValidationError> {
    check_object_id(id).map_err(|reason| ValidationError::DatabaseId {
        value: id.to_string(),
        reason,
    })
}

/// Validate a document identifier. Same format as database identifiers.
pub fn validate_document_id(id: &str) -> Result<(), ValidationError> {
    check_object_id(id).map_err(|reason| ValidationError::DocumentId {
        value: id.to_string(),
        reason,
    })
}

fn check_object_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("cannot be empty".to_string());
    }

    let len = id.chars().count();
    if len != OBJECT_ID_LEN {
        return Err(format!("must be {} characters, got {}", OBJECT_ID_LEN, len));
    }

    if let Some((pos, c)) = id.chars().enumerate().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(format!("contains non-hex character '{}' at position {}", c, pos));
    }

    Ok(())
}

/// Validate a database name. Only literal emptiness is rejected.
pub fn validate_database_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::DatabaseName {
            reason: "cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Validate a collection name.
///
/// Only literal emptiness is rejected; the name is not trimmed, so `" "`
/// passes and is left for the server to judge.
pub fn validate_collection_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::CollectionName {
            reason: "cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Validate a list of collection definitions.
///
/// Fails on an empty list, on a collection without a name, or on a field
/// without a name. A field without a `type` is fine.
pub fn validate_collections(collections: &[CollectionSpec]) -> Result<(), ValidationError> {
    if collections.is_empty() {
        return Err(ValidationError::Collections {
            reason: "at least one collection is required".to_string(),
        });
    }

    for (i, collection) in collections.iter().enumerate() {
        if collection.name.is_empty() {
            return Err(ValidationError::Collections {
                reason: format!("collection at index {} is missing a name", i),
            });
        }

        for (j, field) in collection.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(ValidationError::Collections {
                    reason: format!(
                        "field at index {} of collection '{}' is missing a name",
                        j, collection.name
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Validate a list of collection names for a drop request.
pub fn validate_collection_names(names: &[CollectionName]) -> Result<(), ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::Collections {
            reason: "at least one collection name is required".to_string(),
        });
    }
    Ok(())
}

/// Validate a document payload: it must be a JSON object.
pub fn validate_document(document: &Value) -> Result<(), ValidationError> {
    if !document.is_object() {
        return Err(ValidationError::Document {
            reason: format!("expected a JSON object, got {}", json_kind(document)),
        });
    }
    Ok(())
}

/// Validate a batch of documents for insertion.
pub fn validate_documents(documents: &[Value]) -> Result<(), ValidationError> {
    if documents.is_empty() {
        return Err(ValidationError::Document {
            reason: "at least one document is required".to_string(),
        });
    }

    for (i, document) in documents.iter().enumerate() {
        if !document.is_object() {
            return Err(ValidationError::Document {
                reason: format!(
                    "document at index {}: expected a JSON object, got {}",
                    i,
                    json_kind(document)
                ),
            });
        }
    }

    Ok(())
}

/// Validate a read filter: it must be a JSON object.
pub fn validate_filter(filter: &Value) -> Result<(), ValidationError> {
    if !filter.is_object() {
        return Err(ValidationError::Filter {
            reason: format!("expected a JSON object, got {}", json_kind(filter)),
        });
    }
    Ok(())
}

/// Validate pagination parameters. Pages are 1-based.
pub fn validate_page_request(page: u32, page_size: Option<u32>) -> Result<(), ValidationError> {
    if page == 0 {
        return Err(ValidationError::Pagination {
            reason: "page starts at 1".to_string(),
        });
    }
    if page_size == Some(0) {
        return Err(ValidationError::Pagination {
            reason: "page size must be positive".to_string(),
        });
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
