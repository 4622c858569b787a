//! Paginated row buffer with generation-stamped fetches.

use crate::api::query::Direction;
use crate::api::query::Page;
use crate::api::query::PageRequest;
use crate::api::query::QueryState;
use crate::api::query::QueryUpdate;
use crate::api::query::Sort;
use crate::api::query::TotalCount;
use crate::error::Error;
use crate::model::Record;

/// Whether a page fetch is outstanding for the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
}

/// Rows loaded for the current query generation.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceState {
    /// Bumped once per query reset.
    pub generation: u64,
    /// Rows that exist for the query; `None` until the first page arrives.
    pub total_count: Option<usize>,
    /// Rows delivered so far, in backend order.
    pub loaded_rows: Vec<Record>,
    /// Generation of the outstanding request, if any.
    in_flight: Option<u64>,
}

impl DataSourceState {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            total_count: None,
            loaded_rows: Vec::new(),
            in_flight: None,
        }
    }

    /// Returns `true` while a request for this generation is outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of loaded rows.
    pub fn loaded(&self) -> usize {
        self.loaded_rows.len()
    }

    /// Returns `true` once every row of the query is loaded.
    pub fn is_exhausted(&self) -> bool {
        self.total_count.is_some_and(|total| self.loaded() >= total)
    }
}

/// Outcome of reporting a finished request to the data source.
#[derive(Debug)]
pub enum Completion {
    /// Rows were appended to the buffer.
    Appended {
        /// Rows in this page.
        received: usize,
        /// Rows loaded after appending.
        loaded: usize,
        /// Total after applying the response.
        total: usize,
    },
    /// The response was discarded: it belonged to an earlier query, or no
    /// request was outstanding (a duplicate completion).
    Stale {
        /// Generation the response was stamped with.
        generation: u64,
    },
    /// The request failed; nothing was loaded.
    Failed(Error),
}

/// Owns the query and the loaded-row buffer of one grid.
///
/// The data source never performs I/O itself. [`fetch_page`](Self::fetch_page)
/// hands out a [`PageRequest`] stamped with the current query generation and
/// [`complete`](Self::complete) takes the result back. At most one request per
/// generation is outstanding; results stamped with an older generation are
/// dropped, which is how a reset "cancels" work that is already on the wire.
///
/// # Example
///
/// ```
/// use datagrid_lib::api::query::{Page, QueryState};
/// use datagrid_lib::config::SortKeyStyle;
/// use datagrid_lib::model::Record;
/// use datagrid_lib::source::PaginatedDataSource;
///
/// let mut source = PaginatedDataSource::new(QueryState::new(2, SortKeyStyle::default()));
/// let request = source.fetch_page().unwrap();
/// assert!(source.fetch_page().is_none());
///
/// let page = Page::new(vec![Record::new(), Record::new()]).with_total_count(3);
/// source.complete(request.generation, Ok(page));
/// assert_eq!(source.rows().len(), 2);
/// assert_eq!(source.state().total_count, Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct PaginatedDataSource {
    query: QueryState,
    state: DataSourceState,
    /// Field set to switch to on the next reset.
    next_fields: Option<Vec<String>>,
}

impl PaginatedDataSource {
    /// Creates an idle data source at generation 1 with nothing loaded.
    pub fn new(query: QueryState) -> Self {
        Self {
            query,
            state: DataSourceState::new(1),
            next_fields: None,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn state(&self) -> &DataSourceState {
        &self.state
    }

    /// Loaded rows of the current generation.
    pub fn rows(&self) -> &[Record] {
        &self.state.loaded_rows
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn phase(&self) -> Phase {
        if self.state.in_flight() {
            Phase::Fetching
        } else {
            Phase::Idle
        }
    }

    /// Issues a request for the next page.
    ///
    /// Returns `None` without side effects while a request for the current
    /// generation is outstanding; calls are dropped, not queued.
    pub fn fetch_page(&mut self) -> Option<PageRequest> {
        if let Some(generation) = self.state.in_flight {
            log::debug!("fetch_page dropped: generation {} already in flight", generation);
            return None;
        }

        self.query.skip = self.state.loaded();
        let request = PageRequest::from_query(self.state.generation, &self.query);
        self.state.in_flight = Some(self.state.generation);

        log::debug!(
            "Fetching rows {}..{} (generation {})",
            request.skip,
            request.skip + request.limit,
            request.generation
        );
        Some(request)
    }

    /// Applies the result of a request issued under `generation`.
    pub fn complete(&mut self, generation: u64, result: Result<Page, Error>) -> Completion {
        if generation != self.state.generation {
            log::debug!(
                "Discarding stale response (generation {}, current {})",
                generation,
                self.state.generation
            );
            return Completion::Stale { generation };
        }
        if self.state.in_flight != Some(generation) {
            log::debug!(
                "Discarding response for generation {}: no request outstanding",
                generation
            );
            return Completion::Stale { generation };
        }
        self.state.in_flight = None;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                log::warn!("Page fetch failed (generation {}): {}", generation, e);
                return Completion::Failed(e);
            }
        };

        let reported = page.total();
        let received = page.len();
        self.state.loaded_rows.extend(page.into_records());
        let loaded = self.state.loaded();

        let total = match reported {
            TotalCount::Unknown => {
                log::warn!("Response without a total count; treating query as exhausted at {} rows", loaded);
                loaded
            }
            _ if received == 0 => loaded,
            TotalCount::Pages(_) if received < self.query.page_size => loaded,
            other => other.rows(self.query.page_size).unwrap_or(loaded).max(loaded),
        };
        self.state.total_count = Some(total);
        self.query.skip = loaded;
        if received > 0 {
            self.query.page += 1;
        }

        log::debug!(
            "Applied {} rows (generation {}): {}/{}",
            received,
            generation,
            loaded,
            total
        );
        Completion::Appended {
            received,
            loaded,
            total,
        }
    }

    /// Starts a new query generation and fetches its first page.
    ///
    /// Clears the buffer and total, merges `update` into the query and
    /// forgets any outstanding request: its response will come back stale.
    pub fn reset_query(&mut self, update: QueryUpdate) -> Option<PageRequest> {
        let generation = self.state.generation + 1;
        self.state = DataSourceState::new(generation);
        self.query.skip = 0;
        self.query.page = 1;
        self.query.apply(update);
        if let Some(fields) = self.next_fields.take() {
            self.query.set_fields(fields);
        }

        log::debug!("Query reset to generation {}", generation);
        self.fetch_page()
    }

    /// Sorts by a column, resetting the query.
    ///
    /// The dotted column path is normalized into the backend's sort key.
    pub fn change_sort(&mut self, column_id: &str, direction: Direction) -> Option<PageRequest> {
        let sort = Sort::new(column_id, direction, self.query.key_style());
        self.reset_query(QueryUpdate::new().sort(sort))
    }

    /// Changes the requested field set.
    ///
    /// If the loaded rows already carry every requested field the new set is
    /// used from the next reset on and nothing is fetched. Otherwise the
    /// query is reset so rows are fetched with the new fields.
    pub fn set_fields(&mut self, fields: Vec<String>) -> Option<PageRequest> {
        let covered = self.query.fields.is_empty()
            || fields.iter().all(|f| self.query.fields.contains(f));
        self.next_fields = Some(fields);
        if covered {
            None
        } else {
            self.reset_query(QueryUpdate::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::Filter;
    use crate::config::PaginationStyle;
    use crate::config::SortKeyStyle;

    fn rows(range: std::ops::Range<usize>) -> Vec<Record> {
        range.map(|i| Record::new().set("id", i)).collect()
    }

    fn source(page_size: usize) -> PaginatedDataSource {
        PaginatedDataSource::new(QueryState::new(page_size, SortKeyStyle::DoubleUnderscore))
    }

    #[test]
    fn test_fetch_page_guard() {
        let mut source = source(10);
        let first = source.fetch_page();
        assert!(first.is_some());
        assert_eq!(source.phase(), Phase::Fetching);
        assert!(source.fetch_page().is_none());
    }

    #[test]
    fn test_pages_append_and_advance() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        assert_eq!((request.skip, request.limit), (0, 10));
        source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total_count(25)));

        let request = source.fetch_page().unwrap();
        assert_eq!(request.skip, 10);
        source.complete(request.generation, Ok(Page::new(rows(10..20)).with_total_count(25)));

        assert_eq!(source.rows().len(), 20);
        assert_eq!(source.rows()[19].get("id"), Some(&serde_json::json!(19)));
        assert_eq!(source.phase(), Phase::Idle);
        assert!(!source.state().is_exhausted());
    }

    #[test]
    fn test_short_page_advances_page_cursor() {
        let mut source = PaginatedDataSource::new(
            QueryState::new(10, SortKeyStyle::DoubleUnderscore).with_pagination(PaginationStyle::PageSize),
        );
        let request = source.fetch_page().unwrap();
        assert_eq!(request.page, 1);
        // The backend caps pages at 7 rows but reports the full total.
        source.complete(request.generation, Ok(Page::new(rows(0..7)).with_total_count(25)));
        assert_eq!(source.state().total_count, Some(25));

        let request = source.fetch_page().unwrap();
        assert_eq!((request.skip, request.page), (7, 2));
        assert!(request.to_params().contains(&("page".to_string(), "2".to_string())));
        source.complete(request.generation, Ok(Page::new(rows(7..14)).with_total_count(25)));

        assert_eq!(source.fetch_page().unwrap().page, 3);
        assert_eq!(source.rows(), rows(0..14).as_slice());
    }

    #[test]
    fn test_duplicate_completion_ignored() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total_count(30)));

        let outcome = source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total_count(30)));
        assert!(matches!(outcome, Completion::Stale { generation: 1 }));
        assert_eq!(source.rows().len(), 10);
        assert_eq!(source.fetch_page().unwrap().skip, 10);
    }

    #[test]
    fn test_reset_rewinds_page_cursor() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total_count(30)));

        let request = source.reset_query(QueryUpdate::new()).unwrap();
        assert_eq!((request.skip, request.page), (0, 1));
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut source = source(10);
        let old = source.fetch_page().unwrap();
        let new = source
            .reset_query(QueryUpdate::new().filter(Filter::contains("name", "Fe")))
            .unwrap();
        assert_eq!((old.generation, new.generation), (1, 2));

        let outcome = source.complete(old.generation, Ok(Page::new(rows(100..110)).with_total_count(500)));
        assert!(matches!(outcome, Completion::Stale { generation: 1 }));
        // The current request is still outstanding.
        assert!(source.state().in_flight());
        assert!(source.rows().is_empty());

        source.complete(new.generation, Ok(Page::new(rows(0..3)).with_total_count(3)));
        assert_eq!(source.rows(), rows(0..3).as_slice());
        assert_eq!(source.state().total_count, Some(3));
    }

    #[test]
    fn test_failure_clears_in_flight() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        let outcome = source.complete(request.generation, Err(Error::fetch("boom")));
        assert!(matches!(outcome, Completion::Failed(Error::Fetch(ref m)) if m == "boom"));
        assert_eq!(source.phase(), Phase::Idle);
        assert_eq!(source.state().total_count, None);
        assert_eq!(source.fetch_page().unwrap().skip, 0);
    }

    #[test]
    fn test_missing_total_exhausts_query() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(0..10))));
        assert_eq!(source.state().total_count, Some(10));
        assert!(source.state().is_exhausted());
    }

    #[test]
    fn test_total_never_below_loaded() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total_count(4)));
        assert_eq!(source.state().total_count, Some(10));
    }

    #[test]
    fn test_empty_page_exhausts_query() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(vec![]).with_total_count(40)));
        assert_eq!(source.state().total_count, Some(0));
    }

    #[test]
    fn test_page_totals() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total(TotalCount::Pages(2))));
        assert_eq!(source.state().total_count, Some(20));

        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(10..14)).with_total(TotalCount::Pages(2))));
        assert_eq!(source.state().total_count, Some(14));
        assert!(source.state().is_exhausted());
    }

    #[test]
    fn test_change_sort_normalizes_and_resets() {
        let mut source = source(10);
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total_count(30)));

        let request = source.change_sort("data.energy.value", Direction::Desc).unwrap();
        assert_eq!(request.generation, 2);
        assert_eq!(request.skip, 0);
        assert_eq!(request.sort, Some(("data__energy__value".to_string(), Direction::Desc)));
        assert!(source.rows().is_empty());
        assert_eq!(source.state().total_count, None);
    }

    #[test]
    fn test_set_fields_narrowing_keeps_rows() {
        let mut source = PaginatedDataSource::new(
            QueryState::new(10, SortKeyStyle::DoubleUnderscore).with_fields(["a", "b"]),
        );
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total_count(30)));

        assert!(source.set_fields(vec!["a".to_string()]).is_none());
        assert_eq!(source.generation(), 1);
        assert_eq!(source.rows().len(), 10);
        // Pages of this generation keep the field set the buffer was built with.
        assert_eq!(source.fetch_page().unwrap().fields, ["a", "b"]);
    }

    #[test]
    fn test_set_fields_widening_resets() {
        let mut source = PaginatedDataSource::new(
            QueryState::new(10, SortKeyStyle::DoubleUnderscore).with_fields(["a"]),
        );
        let request = source.fetch_page().unwrap();
        source.complete(request.generation, Ok(Page::new(rows(0..10)).with_total_count(30)));

        let request = source.set_fields(vec!["a".to_string(), "c".to_string()]).unwrap();
        assert_eq!(request.generation, 2);
        assert_eq!(request.fields, ["a", "c"]);
        assert!(source.rows().is_empty());
    }
}
