//! Page type for paginated query results.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::Record;

/// How many rows exist for a query, as reported by the backend.
///
/// Collection endpoints report `total_count`; table-scoped endpoints report
/// `total_rows` or `total_pages`. All three describe the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalCount {
    /// Exact number of rows.
    Rows(usize),
    /// Number of pages at the requested page size.
    Pages(usize),
    /// The response carried no total.
    Unknown,
}

impl TotalCount {
    /// Converts the total into a row count for the given page size.
    ///
    /// A page total is an upper bound: the last page may be short.
    pub fn rows(&self, page_size: usize) -> Option<usize> {
        match self {
            Self::Rows(n) => Some(*n),
            Self::Pages(n) => Some(n.saturating_mul(page_size)),
            Self::Unknown => None,
        }
    }
}

/// A page of query results.
///
/// # Example
///
/// ```
/// use datagrid_lib::api::query::{Page, TotalCount};
/// use datagrid_lib::model::Record;
///
/// let page = Page::new(vec![Record::new().set("id", "a")]).with_total(TotalCount::Rows(10));
/// assert_eq!(page.len(), 1);
/// assert_eq!(page.total(), TotalCount::Rows(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    records: Vec<Record>,
    total: TotalCount,
}

impl Page {
    /// Creates a page without a total.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            total: TotalCount::Unknown,
        }
    }

    /// Sets the reported total.
    pub fn with_total(mut self, total: TotalCount) -> Self {
        self.total = total;
        self
    }

    /// Sets an exact row total.
    pub fn with_total_count(self, count: usize) -> Self {
        self.with_total(TotalCount::Rows(count))
    }

    /// Parses a backend response body.
    ///
    /// Accepts `{ data: [...], total_count | total_rows | total_pages }`.
    /// Rows that are not JSON objects are rejected.
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        let raw: RawPage = serde_json::from_str(body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;
        raw.into_page()
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the reported total.
    pub fn total(&self) -> TotalCount {
        self.total
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Wire shape of a page response.
#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    data: Vec<Value>,
    total_count: Option<usize>,
    total_rows: Option<usize>,
    total_pages: Option<usize>,
}

impl RawPage {
    fn into_page(self) -> Result<Page, ApiError> {
        let total = match (self.total_count, self.total_rows, self.total_pages) {
            (Some(n), _, _) | (None, Some(n), _) => TotalCount::Rows(n),
            (None, None, Some(n)) => TotalCount::Pages(n),
            (None, None, None) => TotalCount::Unknown,
        };
        let records = self
            .data
            .into_iter()
            .map(|row| Record::from_value(row).ok_or_else(|| ApiError::parse("row is not an object")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(records).with_total(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count_variants() {
        let page = Page::from_json(r#"{"data": [{"id": "a"}], "total_count": 7}"#).unwrap();
        assert_eq!(page.total(), TotalCount::Rows(7));

        let page = Page::from_json(r#"{"data": [], "total_rows": 3}"#).unwrap();
        assert_eq!(page.total(), TotalCount::Rows(3));

        let page = Page::from_json(r#"{"data": [], "total_pages": 4}"#).unwrap();
        assert_eq!(page.total(), TotalCount::Pages(4));
        assert_eq!(page.total().rows(10), Some(40));
    }

    #[test]
    fn test_missing_total_is_unknown() {
        let page = Page::from_json(r#"{"data": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
        assert_eq!(page.total(), TotalCount::Unknown);
        assert_eq!(page.len(), 2);
        assert_eq!(page.records()[1].id(), Some("b"));
    }

    #[test]
    fn test_invalid_bodies() {
        assert!(matches!(
            Page::from_json("not json"),
            Err(ApiError::Parse { body: Some(_), .. })
        ));
        assert!(matches!(
            Page::from_json(r#"{"data": [1, 2]}"#),
            Err(ApiError::Parse { body: None, .. })
        ));
    }
}
