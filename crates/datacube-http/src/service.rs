//! [`DocumentService`] over the DataCube REST API.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use datacube_core::error::ValidationError;
use datacube_core::validate::{
    validate_collection_names, validate_collections, validate_database_name, validate_document,
    validate_documents,
};
use datacube_core::{
    BaseUrl, Collection, CollectionName, CollectionSpec, Confirmation, CreateCollectionOutput,
    Database, DatabaseId, DatabaseMetadata, DocumentId, DocumentService, InsertOutput, Paginator,
    ReadOptions, ReadPage, Result,
};

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::endpoints::{
    self, COLLECTIONS, CollectionQuery, CreateCollectionRequest, CreateDatabaseRequest,
    CreateDatabaseResponse, DATABASES, DOCUMENTS, DatabaseQuery, DropCollectionsRequest,
    InsertDocumentsRequest, ListCollectionsResponse, ReadDocumentsQuery, UpdateDocumentRequest,
};

/// A network-backed document service.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use datacube_core::{CollectionName, DatabaseId, DocumentService, ReadOptions};
/// use datacube_http::{ClientConfig, HttpDocumentService};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = HttpDocumentService::new(ClientConfig::from_env()?)?;
///
/// let database_id = DatabaseId::new("65a1f0c2e4b0a1b2c3d4e5f6")?;
/// let collection = CollectionName::new("City")?;
/// let page = service
///     .read_documents(&database_id, &collection, &ReadOptions::new().page_size(20))
///     .await?;
///
/// println!("{} of {} records", page.data.len(), page.pagination.total_records);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpDocumentService {
    client: HttpClient,
}

impl HttpDocumentService {
    /// Create a service from a config.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(&config)?,
        })
    }

    /// Create a service configured from the `DATACUBE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &BaseUrl {
        self.client.base_url()
    }

    /// Start a paginated read of a collection.
    pub fn paginate(
        &self,
        database_id: DatabaseId,
        collection: CollectionName,
    ) -> Paginator<'_, Self> {
        Paginator::new(self, database_id, collection)
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    #[instrument(skip(self, collections), fields(collections = collections.len()))]
    async fn create_database(
        &self,
        name: &str,
        collections: &[CollectionSpec],
    ) -> Result<Database> {
        validate_database_name(name)?;
        validate_collections(collections)?;

        debug!("Creating database");

        let request = CreateDatabaseRequest { name, collections };
        let response: CreateDatabaseResponse = self
            .client
            .procedure(Method::POST, DATABASES, &request)
            .await?;

        debug!(id = %response.database.id, "Created database");
        Ok(response.database)
    }

    #[instrument(skip(self, collections), fields(database_id = %database_id, collections = collections.len()))]
    async fn create_collection(
        &self,
        database_id: &DatabaseId,
        collections: &[CollectionSpec],
    ) -> Result<CreateCollectionOutput> {
        validate_collections(collections)?;

        debug!("Creating collections");

        let request = CreateCollectionRequest {
            database_id: database_id.as_str(),
            collections,
        };
        let output: CreateCollectionOutput = self
            .client
            .procedure(Method::POST, COLLECTIONS, &request)
            .await?;

        debug!(
            total_collections = output.total_collections,
            total_fields = output.total_fields,
            "Created collections"
        );
        Ok(output)
    }

    #[instrument(skip(self), fields(database_id = %database_id))]
    async fn list_collections(&self, database_id: &DatabaseId) -> Result<Vec<Collection>> {
        debug!("Listing collections");

        let query = DatabaseQuery {
            database_id: database_id.as_str(),
        };
        let response: ListCollectionsResponse =
            self.client.query(Method::GET, COLLECTIONS, &query).await?;

        debug!(count = response.collections.len(), "Listed collections");
        Ok(response.collections)
    }

    #[instrument(skip(self, names), fields(database_id = %database_id, count = names.len()))]
    async fn drop_collections(
        &self,
        database_id: &DatabaseId,
        names: &[CollectionName],
    ) -> Result<Confirmation> {
        validate_collection_names(names)?;

        debug!("Dropping collections");

        let request = DropCollectionsRequest {
            database_id: database_id.as_str(),
            collections: names,
        };
        self.client
            .procedure(Method::DELETE, COLLECTIONS, &request)
            .await
    }

    #[instrument(skip(self), fields(database_id = %database_id))]
    async fn drop_database(&self, database_id: &DatabaseId) -> Result<Confirmation> {
        debug!("Dropping database");

        self.client
            .call(Method::DELETE, &endpoints::database(database_id))
            .await
    }

    #[instrument(skip(self, documents), fields(database_id = %database_id, collection = %collection, count = documents.len()))]
    async fn create_documents(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        documents: &[Value],
    ) -> Result<InsertOutput> {
        validate_documents(documents)?;

        debug!("Inserting documents");

        let request = InsertDocumentsRequest {
            database_id: database_id.as_str(),
            collection: collection.as_str(),
            documents,
        };
        let output: InsertOutput = self
            .client
            .procedure(Method::POST, DOCUMENTS, &request)
            .await?;

        debug!(inserted = output.inserted_ids.len(), "Inserted documents");
        Ok(output)
    }

    #[instrument(skip(self, options), fields(database_id = %database_id, collection = %collection, page = options.page))]
    async fn read_documents(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        options: &ReadOptions,
    ) -> Result<ReadPage> {
        options.validate()?;

        let filter = options
            .filter
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ValidationError::Filter {
                reason: format!("cannot encode filter: {}", e),
            })?;

        debug!("Reading documents");

        let query = ReadDocumentsQuery {
            database_id: database_id.as_str(),
            collection: collection.as_str(),
            page: options.page,
            page_size: options.page_size,
            filter,
        };
        let page: ReadPage = self.client.query(Method::GET, DOCUMENTS, &query).await?;

        debug!(
            records = page.data.len(),
            total_records = page.pagination.total_records,
            "Read documents"
        );
        Ok(page)
    }

    #[instrument(skip(self, update), fields(database_id = %database_id, collection = %collection, document_id = %document_id))]
    async fn update_document(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        document_id: &DocumentId,
        update: &Value,
    ) -> Result<Confirmation> {
        validate_document(update)?;

        debug!("Updating document");

        let request = UpdateDocumentRequest {
            database_id: database_id.as_str(),
            collection: collection.as_str(),
            document: update,
        };
        self.client
            .procedure(Method::PATCH, &endpoints::document(document_id), &request)
            .await
    }

    #[instrument(skip(self), fields(database_id = %database_id, collection = %collection, document_id = %document_id))]
    async fn delete_document(
        &self,
        database_id: &DatabaseId,
        collection: &CollectionName,
        document_id: &DocumentId,
    ) -> Result<Confirmation> {
        debug!("Deleting document");

        let query = CollectionQuery {
            database_id: database_id.as_str(),
            collection: collection.as_str(),
        };
        self.client
            .query(Method::DELETE, &endpoints::document(document_id), &query)
            .await
    }

    #[instrument(skip(self), fields(database_id = %database_id))]
    async fn get_metadata(&self, database_id: &DatabaseId) -> Result<DatabaseMetadata> {
        debug!("Fetching database metadata");

        self.client
            .call(Method::GET, &endpoints::database_metadata(database_id))
            .await
    }
}
