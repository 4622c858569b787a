//! In-memory page fetcher

use std::sync::Mutex;

use async_trait::async_trait;

use super::PageFetcher;
use crate::api::query::Page;
use crate::api::query::PageRequest;
use crate::api::query::TotalCount;
use crate::error::Error;
use crate::model::Record;

/// A fetcher that serves pages from a fixed list of rows.
///
/// Useful for demos and tests: it records every request it receives and can
/// be told to omit totals or fail the next request.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Record;
/// use datagrid_lib::source::MemoryFetcher;
///
/// let rows = (0..25).map(|i| Record::new().set("id", i)).collect();
/// let fetcher = MemoryFetcher::new(rows);
/// assert_eq!(fetcher.request_count(), 0);
/// ```
#[derive(Debug)]
pub struct MemoryFetcher {
    rows: Vec<Record>,
    report_total: bool,
    requests: Mutex<Vec<PageRequest>>,
    fail_next: Mutex<Option<String>>,
}

impl MemoryFetcher {
    /// Creates a fetcher over the given rows.
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows,
            report_total: true,
            requests: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Leaves `total_count` out of every response.
    pub fn without_total(mut self) -> Self {
        self.report_total = false;
        self
    }

    /// Makes the next request fail with the given message.
    pub fn fail_next(&self, message: impl Into<String>) {
        if let Ok(mut guard) = self.fail_next.lock() {
            *guard = Some(message.into());
        }
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for MemoryFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, Error> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request.clone());
        }
        let failure = self.fail_next.lock().ok().and_then(|mut g| g.take());
        if let Some(message) = failure {
            return Err(Error::fetch(message));
        }

        let rows: Vec<Record> = self
            .rows
            .iter()
            .skip(request.skip)
            .take(request.limit)
            .cloned()
            .collect();
        let total = if self.report_total {
            TotalCount::Rows(self.rows.len())
        } else {
            TotalCount::Unknown
        };
        Ok(Page::new(rows).with_total(total))
    }
}
