//! Page fetcher trait

use async_trait::async_trait;

use crate::api::query::Page;
use crate::api::query::PageRequest;
use crate::error::Error;

/// Executes page requests against a backend.
///
/// The data source decides *what* to fetch and whether a result still
/// matters; a fetcher only performs the request. Implementations must not
/// retry on their own and cannot be cancelled: a request runs to completion
/// and its result may simply be discarded.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use datagrid_lib::source::PageFetcher;
///
/// struct Fixed(Vec<Record>);
///
/// #[async_trait]
/// impl PageFetcher for Fixed {
///     async fn fetch_page(&self, request: &PageRequest) -> Result<Page, Error> {
///         let rows = self.0.iter().skip(request.skip).take(request.limit).cloned().collect();
///         Ok(Page::new(rows).with_total_count(self.0.len()))
///     }
/// }
/// ```
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the rows described by `request`.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, Error>;
}
