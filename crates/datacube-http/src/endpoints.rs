//! DataCube REST endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use datacube_core::{Collection, CollectionName, CollectionSpec, Database, DatabaseId, DocumentId};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Database creation and (with an id suffix) deletion.
pub const DATABASES: &str = "/api/v1/databases";

/// Collection creation, listing and deletion.
pub const COLLECTIONS: &str = "/api/v1/collections";

/// Document insertion, reads and (with an id suffix) updates and deletes.
pub const DOCUMENTS: &str = "/api/v1/documents";

/// `/api/v1/databases/{id}`
pub fn database(id: &DatabaseId) -> String {
    format!("{}/{}", DATABASES, id)
}

/// `/api/v1/databases/{id}/metadata`
pub fn database_metadata(id: &DatabaseId) -> String {
    format!("{}/{}/metadata", DATABASES, id)
}

/// `/api/v1/documents/{id}`
pub fn document(id: &DocumentId) -> String {
    format!("{}/{}", DOCUMENTS, id)
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for database creation.
#[derive(Debug, Serialize)]
pub struct CreateDatabaseRequest<'a> {
    pub name: &'a str,
    pub collections: &'a [CollectionSpec],
}

/// Request body for collection creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest<'a> {
    pub database_id: &'a str,
    pub collections: &'a [CollectionSpec],
}

/// Query string naming a database.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseQuery<'a> {
    pub database_id: &'a str,
}

/// Request body for dropping collections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropCollectionsRequest<'a> {
    pub database_id: &'a str,
    pub collections: &'a [CollectionName],
}

/// Request body for document insertion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertDocumentsRequest<'a> {
    pub database_id: &'a str,
    pub collection: &'a str,
    pub documents: &'a [Value],
}

/// Query string for a paginated read. `filter` is the JSON-encoded filter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadDocumentsQuery<'a> {
    pub database_id: &'a str,
    pub collection: &'a str,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Request body for a partial document update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest<'a> {
    pub database_id: &'a str,
    pub collection: &'a str,
    pub document: &'a Value,
}

/// Query string addressing a collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery<'a> {
    pub database_id: &'a str,
    pub collection: &'a str,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response from database creation.
#[derive(Debug, Deserialize)]
pub struct CreateDatabaseResponse {
    pub database: Database,
}

/// Response from listing collections.
#[derive(Debug, Deserialize)]
pub struct ListCollectionsResponse {
    #[serde(default)]
    pub collections: Vec<Collection>,
}

/// Failure body. Both fields are optional; some deployments send neither.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_embed_ids() {
        let db = DatabaseId::new("507f1f77bcf86cd799439011").unwrap();
        let doc = DocumentId::new("64a7f3e2b1c9d8e7f6a5b4c3").unwrap();

        assert_eq!(database(&db), "/api/v1/databases/507f1f77bcf86cd799439011");
        assert_eq!(
            database_metadata(&db),
            "/api/v1/databases/507f1f77bcf86cd799439011/metadata"
        );
        assert_eq!(document(&doc), "/api/v1/documents/64a7f3e2b1c9d8e7f6a5b4c3");
    }

    #[test]
    fn requests_use_camel_case() {
        let names = [CollectionName::new("users").unwrap()];
        let body = serde_json::to_value(DropCollectionsRequest {
            database_id: "507f1f77bcf86cd799439011",
            collections: &names,
        })
        .unwrap();

        assert_eq!(
            body,
            json!({"databaseId": "507f1f77bcf86cd799439011", "collections": ["users"]})
        );
    }

    #[test]
    fn read_query_omits_unset_options() {
        let query = ReadDocumentsQuery {
            database_id: "507f1f77bcf86cd799439011",
            collection: "users",
            page: 1,
            page_size: None,
            filter: None,
        };
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(
            body,
            json!({"databaseId": "507f1f77bcf86cd799439011", "collection": "users", "page": 1})
        );
    }
}
