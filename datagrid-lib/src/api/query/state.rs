//! Query state and updates.

use std::collections::BTreeMap;

use crate::config::PaginationStyle;
use crate::config::SortKeyStyle;

use super::Filter;
use super::FilterOp;
use super::Sort;

/// Everything that determines which rows the backend returns.
///
/// Filters are keyed by their parameter name (`<field>__<operator>`), so
/// setting the same field and operator twice replaces the earlier value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Requested column ids, in column order, without duplicates.
    pub fields: Vec<String>,
    pub filters: BTreeMap<String, Filter>,
    pub sort: Option<Sort>,
    /// Offset of the next page.
    pub skip: usize,
    /// 1-based number of the next page, for page-style endpoints.
    ///
    /// Counted separately from `skip`: a backend that caps its page size
    /// returns short pages that do not end on a `page_size` boundary.
    pub page: usize,
    /// Always at least one.
    pub page_size: usize,
    /// How the cursor is spelled in request parameters.
    pub pagination: PaginationStyle,
    pub(crate) keys: SortKeyStyle,
}

impl QueryState {
    /// Creates an unfiltered, unsorted query.
    pub fn new(page_size: usize, keys: SortKeyStyle) -> Self {
        Self {
            fields: Vec::new(),
            filters: BTreeMap::new(),
            sort: None,
            skip: 0,
            page: 1,
            page_size: page_size.max(1),
            pagination: PaginationStyle::default(),
            keys,
        }
    }

    /// Sets how the pagination cursor is sent.
    pub fn with_pagination(mut self, pagination: PaginationStyle) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets the requested fields, dropping duplicates.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_fields(fields);
        self
    }

    pub(crate) fn set_fields<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !out.contains(&field) {
                out.push(field);
            }
        }
        self.fields = out;
    }

    /// The key style used for filter names and sort keys.
    pub fn key_style(&self) -> SortKeyStyle {
        self.keys
    }

    /// Filter parameters as `(name, value)` pairs, sorted by name.
    pub fn filter_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, f)| (k.as_str(), f.value.as_str()))
    }

    /// Merges an update into this query.
    pub(crate) fn apply(&mut self, update: QueryUpdate) {
        if update.clear_filters {
            self.filters.clear();
        }
        for (field, op) in update.cleared {
            self.filters
                .retain(|_, f| !(f.field == field && op.is_none_or(|op| op == f.op)));
        }
        for filter in update.filters {
            self.filters.insert(filter.key(self.keys), filter);
        }
        if let Some(sort) = update.sort {
            self.sort = sort;
        }
    }
}

/// A set of changes to apply when resetting a query.
///
/// Anything not mentioned keeps its current value.
///
/// # Example
///
/// ```
/// use datagrid_lib::api::query::{Filter, QueryUpdate};
///
/// let update = QueryUpdate::new()
///     .filter(Filter::contains("name", "Fe"))
///     .clear_field_filters("data.energy.value")
///     .clear_sort();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryUpdate {
    filters: Vec<Filter>,
    cleared: Vec<(String, Option<FilterOp>)>,
    clear_filters: bool,
    sort: Option<Option<Sort>>,
}

impl QueryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or replaces a filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Removes the filter with this field and operator.
    pub fn clear_filter(mut self, field: impl Into<String>, op: FilterOp) -> Self {
        self.cleared.push((field.into(), Some(op)));
        self
    }

    /// Removes every filter on a field.
    pub fn clear_field_filters(mut self, field: impl Into<String>) -> Self {
        self.cleared.push((field.into(), None));
        self
    }

    /// Removes all filters before applying the rest of the update.
    pub fn clear_filters(mut self) -> Self {
        self.clear_filters = true;
        self
    }

    /// Replaces the sort.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(Some(sort));
        self
    }

    /// Removes the sort.
    pub fn clear_sort(mut self) -> Self {
        self.sort = Some(None);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::Direction;

    fn query() -> QueryState {
        QueryState::new(10, SortKeyStyle::DoubleUnderscore)
    }

    #[test]
    fn test_same_key_replaces() {
        let mut q = query();
        q.apply(QueryUpdate::new().filter(Filter::gte("data.value", 1)));
        q.apply(QueryUpdate::new().filter(Filter::gte("data.value", 2)));
        q.apply(QueryUpdate::new().filter(Filter::lte("data.value", 9)));

        let params: Vec<_> = q.filter_params().collect();
        assert_eq!(params, [("data__value__gte", "2"), ("data__value__lte", "9")]);
    }

    #[test]
    fn test_clear_filters() {
        let mut q = query();
        q.apply(
            QueryUpdate::new()
                .filter(Filter::gte("v", 1))
                .filter(Filter::lte("v", 5))
                .filter(Filter::contains("name", "x")),
        );

        q.apply(QueryUpdate::new().clear_filter("v", FilterOp::Gte));
        assert_eq!(q.filters.len(), 2);

        q.apply(QueryUpdate::new().clear_field_filters("v"));
        assert_eq!(q.filter_params().collect::<Vec<_>>(), [("name__contains", "x")]);

        q.apply(QueryUpdate::new().clear_filters().filter(Filter::exact("id", 3)));
        assert_eq!(q.filter_params().collect::<Vec<_>>(), [("id__exact", "3")]);
    }

    #[test]
    fn test_sort_untouched_unless_mentioned() {
        let mut q = query();
        q.apply(QueryUpdate::new().sort(Sort::desc("a.b", q.key_style())));
        q.apply(QueryUpdate::new().filter(Filter::exact("x", 1)));
        let sort = q.sort.clone().unwrap();
        assert_eq!(sort.key, "a__b");
        assert_eq!(sort.direction, Direction::Desc);

        q.apply(QueryUpdate::new().clear_sort());
        assert!(q.sort.is_none());
    }

    #[test]
    fn test_fields_deduplicated() {
        let q = query().with_fields(["a", "b", "a"]);
        assert_eq!(q.fields, ["a", "b"]);
        assert_eq!(QueryState::new(0, SortKeyStyle::Dotted).page_size, 1);
    }
}
