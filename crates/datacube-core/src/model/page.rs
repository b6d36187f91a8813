//! Read options and paginated read results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::validate::{validate_filter, validate_page_request};

use super::Document;

/// The pagination envelope accompanying every read result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of records matching the read.
    pub total_records: u64,
    /// The page this result covers (1-based).
    pub current_page: u32,
    /// Page size the server applied.
    pub page_size: u32,
}

impl Pagination {
    /// Check whether records remain past this page
    /// (`current_page * page_size < total_records`).
    pub fn has_more(&self) -> bool {
        u64::from(self.current_page) * u64::from(self.page_size) < self.total_records
    }

    /// Number of pages needed to cover every record.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_records.div_ceil(u64::from(self.page_size))
    }
}

/// One page of a read: the records plus the pagination envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadPage {
    /// Records on this page.
    pub data: Vec<Document>,
    /// Pagination envelope.
    pub pagination: Pagination,
}

/// Parameters for a read.
///
/// `page` defaults to 1; `page_size` defaults to the server's choice.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    pub page: u32,
    pub page_size: Option<u32>,
    pub filter: Option<Value>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: None,
            filter: None,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Only return documents matching this field filter (a JSON object).
    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Validate the page bounds and the filter shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_page_request(self.page, self.page_size)?;
        if let Some(filter) = &self.filter {
            validate_filter(filter)?;
        }
        Ok(())
    }
}
