//! Paginated data source
//!
//! The [`PaginatedDataSource`] owns the query and the loaded rows and decides
//! when a page may be fetched. A [`PageFetcher`] performs the actual request.

mod data_source;
mod fetcher;
mod memory;

pub use data_source::*;
pub use fetcher::*;
pub use memory::*;
