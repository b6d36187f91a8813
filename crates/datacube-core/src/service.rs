//! The document-service capability trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::model::{
    Collection, CollectionSpec, Confirmation, CreateCollectionOutput, Database, DatabaseMetadata,
    InsertOutput, ReadOptions, ReadPage,
};
use crate::types::{CollectionName, DatabaseId, DocumentId};
use crate::validate::validate_document;

/// The fixed CRUD surface of a DataCube service.
///
/// Implementations validate their inputs before dispatching (an invalid
/// payload never costs a round trip), perform exactly one request per call,
/// and never retry. A failed call leaves the implementation usable.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Create a database with an initial set of collections.
    async fn create_database(&self, name: &str, collections: &[CollectionSpec])
    -> Result<Database>;

    /// Add collections to an existing database.
    async fn create_collection(
        &self,
        database_id: &DatabaseId,
        collections: &[CollectionSpec],
    ) -> Result<CreateCollectionOutput>;

    /// List the collections of a database.
    async fn list_collections(&self, database_id: &DatabaseId) -> Result<Vec<Collection>>;

    /// Drop the named collections from a database.
    async fn drop_collections(
        &self,
        database_id: &DatabaseId,
        names: &[CollectionName],
    ) -> Result<Confirmation>;

    /// Drop a database and all of its collections.
    async fn drop_database(&self, database_id: &DatabaseId) -> Result<Confirmation>;

    /// Insert one or more documents into a collection.
    async fn create_documents(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        documents: &[Value],
    ) -> Result<InsertOutput>;

    /// Insert a single document.
    async fn create_document(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<InsertOutput> {
        validate_document(document)?;
        self.create_documents(database_id, collection, std::slice::from_ref(document))
            .await
    }

    /// Read one page of documents from a collection.
    async fn read_documents(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        options: &ReadOptions,
    ) -> Result<ReadPage>;

    /// Apply a partial update to one document.
    async fn update_document(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        document_id: &DocumentId,
        update: &Value,
    ) -> Result<Confirmation>;

    /// Soft-delete one document (the service sets `is_deleted`).
    async fn delete_document(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        document_id: &DocumentId,
    ) -> Result<Confirmation>;

    /// Fetch aggregate counts for a database.
    async fn get_metadata(&self, database_id: &DatabaseId) -> Result<DatabaseMetadata>;
}
