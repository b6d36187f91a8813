//! Cursor-style pagination over [`DocumentService::read_documents`].
//!
//! A [`Paginator`] walks a collection page by page until the pagination
//! envelope reports that no records remain. It is single-use: once it is
//! exhausted or has failed, a new paginator is needed to start over from
//! page 1.
//!
//! When a fetch fails, the pages fetched so far are kept. [`Paginator::collect_all`]
//! hands them back inside [`PaginationFailure`] together with the error.

use futures_core::Stream;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::error::Error;
use crate::model::{Document, Pagination, ReadOptions, ReadPage};
use crate::service::DocumentService;
use crate::types::{CollectionName, DatabaseId};

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Lifecycle of a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// Nothing fetched yet.
    Idle,
    /// A page request is in flight.
    Fetching,
    /// At least one more page remains.
    HasMore,
    /// All pages fetched. Terminal.
    Exhausted,
    /// A fetch failed. Terminal.
    Failed,
}

impl PaginatorState {
    /// Check if no further requests will be issued.
    pub fn is_terminal(self) -> bool {
        matches!(self, PaginatorState::Exhausted | PaginatorState::Failed)
    }
}

/// A pagination run that stopped on an error.
///
/// The documents accumulated before the failure are retained.
#[derive(Debug, Error)]
#[error("pagination failed after {pages_fetched} page(s): {source}")]
pub struct PaginationFailure {
    /// Documents from the pages fetched before the failure.
    pub documents: Vec<Document>,
    /// Number of pages fetched successfully.
    pub pages_fetched: u32,
    /// The error that stopped the run.
    pub source: Error,
}

/// Drives successive reads of a collection until all records are fetched.
///
/// # Example
///
/// ```no_run
/// use datacube_core::{CollectionName, DatabaseId, DocumentService, Paginator};
///
/// # async fn example(service: &impl DocumentService) -> Result<(), Box<dyn std::error::Error>> {
/// let database_id = DatabaseId::new("65a1f0c2e4b0a1b2c3d4e5f6")?;
/// let collection = CollectionName::new("City")?;
///
/// let documents = Paginator::new(service, database_id, collection)
///     .page_size(100)
///     .collect_all()
///     .await?;
/// println!("fetched {} documents", documents.len());
/// # Ok(())
/// # }
/// ```
pub struct Paginator<'a, S: ?Sized> {
    service: &'a S,
    database_id: DatabaseId,
    collection: CollectionName,
    filter: Option<Value>,
    page_size: u32,
    page: u32,
    pages_fetched: u32,
    state: PaginatorState,
    documents: Vec<Document>,
    last_pagination: Option<Pagination>,
    failure: Option<Error>,
}

impl<'a, S: DocumentService + ?Sized> Paginator<'a, S> {
    /// Create a paginator positioned before page 1.
    pub fn new(service: &'a S, database_id: DatabaseId, collection: CollectionName) -> Self {
        Self {
            service,
            database_id,
            collection,
            filter: None,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
            pages_fetched: 0,
            state: PaginatorState::Idle,
            documents: Vec::new(),
            last_pagination: None,
            failure: None,
        }
    }

    /// Set the page size requested on every fetch.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Only read documents matching this filter.
    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    /// The page the next fetch will request.
    pub fn next_page(&self) -> u32 {
        self.page
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Envelope of the most recent successful fetch.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.last_pagination.as_ref()
    }

    /// Documents accumulated by [`fetch_next`](Self::fetch_next) so far.
    ///
    /// Remains readable after the paginator is exhausted or has failed.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    /// Fetch the next page and append its records.
    ///
    /// Returns `Ok(true)` while more pages remain and `Ok(false)` once the
    /// paginator is exhausted. After a failure, returns the same error again
    /// without issuing a request.
    ///
    /// A response for a page other than the one requested ends the run
    /// without adding its records.
    pub async fn fetch_next(&mut self) -> Result<bool, Error> {
        match self.fetch_page().await? {
            Some(page) => {
                self.documents.extend(page.data);
                Ok(self.state == PaginatorState::HasMore)
            }
            None => Ok(false),
        }
    }

    /// Fetch every remaining page and return all accumulated documents.
    pub async fn collect_all(mut self) -> Result<Vec<Document>, PaginationFailure> {
        loop {
            match self.fetch_next().await {
                Ok(true) => continue,
                Ok(false) => return Ok(self.documents),
                Err(source) => {
                    return Err(PaginationFailure {
                        documents: self.documents,
                        pages_fetched: self.pages_fetched,
                        source,
                    });
                }
            }
        }
    }

    /// Turn the paginator into a stream of pages.
    ///
    /// Each item is one fetch. The stream ends after the last page, or after
    /// yielding the error that stopped it. Pages yielded here are not
    /// accumulated.
    pub fn pages(self) -> impl Stream<Item = Result<ReadPage, Error>> {
        let mut paginator = self;
        async_stream::stream! {
            loop {
                match paginator.fetch_page().await {
                    Ok(Some(page)) => yield Ok(page),
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        }
    }

    #[instrument(skip(self), fields(database_id = %self.database_id, collection = %self.collection, page = self.page))]
    async fn fetch_page(&mut self) -> Result<Option<ReadPage>, Error> {
        if self.state.is_terminal() {
            return match &self.failure {
                Some(failure) => Err(failure.clone()),
                None => Ok(None),
            };
        }

        let options = ReadOptions {
            page: self.page,
            page_size: Some(self.page_size),
            filter: self.filter.clone(),
        };

        self.state = PaginatorState::Fetching;
        debug!(page_size = self.page_size, "Fetching page");

        let page = match self
            .service
            .read_documents(&self.database_id, &self.collection, &options)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Page fetch failed");
                self.state = PaginatorState::Failed;
                self.failure = Some(e.clone());
                return Err(e);
            }
        };

        let requested = self.page;
        if page.pagination.current_page != requested {
            warn!(
                requested,
                returned = page.pagination.current_page,
                "Server answered with a different page, stopping"
            );
            self.state = PaginatorState::Exhausted;
            return Ok(None);
        }

        self.pages_fetched += 1;
        self.last_pagination = Some(page.pagination);

        // Decided from the requested page, not the envelope.
        let seen = u64::from(requested) * u64::from(self.page_size);
        self.state = if seen >= page.pagination.total_records {
            PaginatorState::Exhausted
        } else if page.data.is_empty() {
            warn!(
                total_records = page.pagination.total_records,
                "Empty page while records remain, stopping"
            );
            PaginatorState::Exhausted
        } else {
            self.page += 1;
            PaginatorState::HasMore
        };

        debug!(
            records = page.data.len(),
            total_records = page.pagination.total_records,
            state = ?self.state,
            "Fetched page"
        );

        Ok(Some(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ValidationError};
    use crate::model::{
        Collection, CollectionSpec, Confirmation, CreateCollectionOutput, Database,
        DatabaseMetadata, InsertOutput,
    };
    use crate::types::DocumentId;
    use crate::Result;
    use async_trait::async_trait;
    use futures_util::StreamExt;
    use serde_json::{Map, json};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-process service holding `total` numbered documents.
    struct FakeService {
        total: u64,
        fail_on_page: Option<u32>,
        /// Overrides the reported total (to simulate a server that lies).
        reported_total: Option<u64>,
        /// Ignore the requested page and always serve page 1.
        ignores_page: bool,
        requests: Mutex<Vec<ReadOptions>>,
    }

    impl FakeService {
        fn new(total: u64) -> Self {
            Self {
                total,
                fail_on_page: None,
                reported_total: None,
                ignores_page: false,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requested_pages(&self) -> Vec<u32> {
            self.requests.lock().unwrap().iter().map(|o| o.page).collect()
        }
    }

    fn doc(n: u64) -> Document {
        let mut fields = Map::new();
        fields.insert("n".to_string(), json!(n));
        Document {
            id: DocumentId::new(format!("{:024x}", n)).unwrap(),
            is_deleted: false,
            fields,
        }
    }

    #[async_trait]
    impl DocumentService for FakeService {
        async fn create_database(&self, _: &str, _: &[CollectionSpec]) -> Result<Database> {
            unimplemented!()
        }

        async fn create_collection(
            &self,
            _: &DatabaseId,
            _: &[CollectionSpec],
        ) -> Result<CreateCollectionOutput> {
            unimplemented!()
        }

        async fn list_collections(&self, _: &DatabaseId) -> Result<Vec<Collection>> {
            unimplemented!()
        }

        async fn drop_collections(
            &self,
            _: &DatabaseId,
            _: &[CollectionName],
        ) -> Result<Confirmation> {
            unimplemented!()
        }

        async fn drop_database(&self, _: &DatabaseId) -> Result<Confirmation> {
            unimplemented!()
        }

        async fn create_documents(
            &self,
            _: &DatabaseId,
            _: &CollectionName,
            _: &[Value],
        ) -> Result<InsertOutput> {
            unimplemented!()
        }

        async fn read_documents(
            &self,
            _: &DatabaseId,
            _: &CollectionName,
            options: &ReadOptions,
        ) -> Result<ReadPage> {
            options.validate()?;
            self.requests.lock().unwrap().push(options.clone());

            if self.fail_on_page == Some(options.page) {
                return Err(ApiError::new(503, None, "service unavailable").into());
            }

            let served = if self.ignores_page { 1 } else { options.page };
            let page_size = u64::from(options.page_size.unwrap_or(DEFAULT_PAGE_SIZE));
            let start = (u64::from(served) - 1) * page_size;
            let end = (start + page_size).min(self.total);
            let data = (start..end).map(doc).collect();

            Ok(ReadPage {
                data,
                pagination: Pagination {
                    total_records: self.reported_total.unwrap_or(self.total),
                    current_page: served,
                    page_size: page_size as u32,
                },
            })
        }

        async fn update_document(
            &self,
            _: &DatabaseId,
            _: &CollectionName,
            _: &DocumentId,
            _: &Value,
        ) -> Result<Confirmation> {
            unimplemented!()
        }

        async fn delete_document(
            &self,
            _: &DatabaseId,
            _: &CollectionName,
            _: &DocumentId,
        ) -> Result<Confirmation> {
            unimplemented!()
        }

        async fn get_metadata(&self, _: &DatabaseId) -> Result<DatabaseMetadata> {
            unimplemented!()
        }
    }

    fn paginator(service: &FakeService) -> Paginator<'_, FakeService> {
        Paginator::new(
            service,
            DatabaseId::new("65a1f0c2e4b0a1b2c3d4e5f6").unwrap(),
            CollectionName::new("City").unwrap(),
        )
    }

    #[tokio::test]
    async fn single_record_exhausts_after_first_page() {
        let service = FakeService::new(1);
        let mut pages = paginator(&service).page_size(50);

        assert_eq!(pages.state(), PaginatorState::Idle);
        assert_eq!(pages.next_page(), 1);

        let more = pages.fetch_next().await.unwrap();
        assert!(!more);
        assert_eq!(pages.state(), PaginatorState::Exhausted);
        assert_eq!(pages.documents().len(), 1);
        assert_eq!(pages.pagination().map(|p| p.total_records), Some(1));
        assert_eq!(service.requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn fetches_ceil_n_over_k_pages_without_duplicates() {
        for (total, page_size) in [(1u64, 50u32), (50, 50), (51, 50), (137, 20), (200, 7)] {
            let service = FakeService::new(total);
            let documents = paginator(&service)
                .page_size(page_size)
                .collect_all()
                .await
                .unwrap();

            let expected_fetches = total.div_ceil(u64::from(page_size)) as usize;
            assert_eq!(service.requested_pages().len(), expected_fetches);
            assert_eq!(documents.len() as u64, total);

            let ids: HashSet<_> = documents.iter().map(|d| d.id.clone()).collect();
            assert_eq!(ids.len() as u64, total, "duplicate ids for N={}", total);
        }
    }

    #[tokio::test]
    async fn pages_increase_by_one() {
        let service = FakeService::new(95);
        paginator(&service).page_size(10).collect_all().await.unwrap();
        assert_eq!(service.requested_pages(), (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn exhausted_paginator_issues_no_more_requests() {
        let service = FakeService::new(3);
        let mut pages = paginator(&service).page_size(10);

        assert!(!pages.fetch_next().await.unwrap());
        assert!(!pages.fetch_next().await.unwrap());
        assert!(!pages.fetch_next().await.unwrap());

        assert_eq!(service.requested_pages().len(), 1);
        // Accumulated results are stable across re-reads.
        assert_eq!(pages.documents().len(), 3);
        assert_eq!(pages.documents().len(), 3);
    }

    #[tokio::test]
    async fn failure_retains_accumulated_pages() {
        let mut service = FakeService::new(100);
        service.fail_on_page = Some(3);

        let failure = paginator(&service)
            .page_size(10)
            .collect_all()
            .await
            .unwrap_err();

        assert_eq!(failure.pages_fetched, 2);
        assert_eq!(failure.documents.len(), 20);
        assert_eq!(failure.source.status(), Some(503));
    }

    #[tokio::test]
    async fn failed_paginator_is_not_restartable() {
        let mut service = FakeService::new(100);
        service.fail_on_page = Some(1);
        let mut pages = paginator(&service).page_size(10);

        assert!(pages.fetch_next().await.is_err());
        assert_eq!(pages.state(), PaginatorState::Failed);
        assert!(pages.state().is_terminal());
        assert!(pages.pagination().is_none());

        let again = pages.fetch_next().await.unwrap_err();
        assert_eq!(again.status(), Some(503));
        assert_eq!(service.requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn invalid_page_size_fails_without_records() {
        let service = FakeService::new(10);
        let failure = paginator(&service).page_size(0).collect_all().await.unwrap_err();

        assert!(matches!(
            failure.source,
            Error::Validation(ValidationError::Pagination { .. })
        ));
        assert!(failure.documents.is_empty());
        assert!(service.requested_pages().is_empty());
    }

    #[tokio::test]
    async fn empty_page_with_records_remaining_stops() {
        let mut service = FakeService::new(5);
        service.reported_total = Some(1_000);

        let documents = paginator(&service).page_size(5).collect_all().await.unwrap();

        assert_eq!(documents.len(), 5);
        assert_eq!(service.requested_pages(), vec![1, 2]);
    }

    #[tokio::test]
    async fn server_repeating_first_page_stops() {
        let mut service = FakeService::new(4);
        service.ignores_page = true;
        let mut pages = paginator(&service).page_size(2);

        assert!(pages.fetch_next().await.unwrap());
        assert!(!pages.fetch_next().await.unwrap());
        assert!(pages.state().is_terminal());
        assert!(!pages.fetch_next().await.unwrap());

        assert_eq!(service.requested_pages(), vec![1, 2]);
        assert_eq!(pages.pages_fetched(), 1);
        assert_eq!(pages.pagination().map(|p| p.current_page), Some(1));

        let ids: HashSet<_> = pages.documents().iter().map(|d| d.id.clone()).collect();
        assert_eq!(pages.documents().len(), 2);
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn stops_once_requested_pages_cover_total() {
        // Claims 6 records but keeps serving full pages past the end.
        let mut service = FakeService::new(100);
        service.reported_total = Some(6);

        let documents = paginator(&service).page_size(3).collect_all().await.unwrap();

        assert_eq!(documents.len(), 6);
        assert_eq!(service.requested_pages(), vec![1, 2]);
    }

    #[tokio::test]
    async fn filter_is_sent_on_every_page() {
        let service = FakeService::new(30);
        paginator(&service)
            .page_size(10)
            .filter(json!({ "country": "FR" }))
            .collect_all()
            .await
            .unwrap();

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests
            .iter()
            .all(|o| o.filter == Some(json!({ "country": "FR" }))));
    }

    #[tokio::test]
    async fn stream_yields_each_page_once() {
        let service = FakeService::new(25);
        let stream = paginator(&service).page_size(10).pages();
        let pages: Vec<_> = Box::pin(stream).collect().await;

        assert_eq!(pages.len(), 3);
        let sizes: Vec<_> = pages
            .into_iter()
            .map(|p| p.unwrap().data.len())
            .collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[tokio::test]
    async fn stream_ends_after_error() {
        let mut service = FakeService::new(25);
        service.fail_on_page = Some(2);
        let stream = paginator(&service).page_size(10).pages();
        let pages: Vec<_> = Box::pin(stream).collect().await;

        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_ok());
        assert!(pages[1].is_err());
    }
}
