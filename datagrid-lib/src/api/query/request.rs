//! A single page fetch and its query-parameter encoding.

use crate::config::PaginationStyle;

use super::Direction;
use super::QueryState;

/// One page fetch issued by the data source.
///
/// The request is a snapshot: later changes to the query do not affect it,
/// and its `generation` tells the data source whether the result still
/// belongs to the current query when it comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Query generation the request was issued under.
    pub generation: u64,
    /// Index of the first requested row.
    pub skip: usize,
    /// 1-based page number, sent instead of `skip` by page-style endpoints.
    pub page: usize,
    /// Number of requested rows.
    pub limit: usize,
    pub fields: Vec<String>,
    /// Filter parameters as `(name, value)` pairs.
    pub filters: Vec<(String, String)>,
    /// Sort key and direction.
    pub sort: Option<(String, Direction)>,
    pub pagination: PaginationStyle,
}

impl PageRequest {
    pub(crate) fn from_query(generation: u64, query: &QueryState) -> Self {
        Self {
            generation,
            skip: query.skip,
            page: query.page,
            limit: query.page_size,
            fields: query.fields.clone(),
            filters: query
                .filter_params()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            sort: query.sort.as_ref().map(|s| (s.key.clone(), s.direction)),
            pagination: query.pagination,
        }
    }

    /// Encodes the request as query parameters.
    ///
    /// ```
    /// use datagrid_lib::api::query::PageRequest;
    /// use datagrid_lib::config::PaginationStyle;
    ///
    /// let request = PageRequest {
    ///     generation: 1,
    ///     skip: 20,
    ///     page: 3,
    ///     limit: 10,
    ///     fields: vec!["id".into(), "name".into()],
    ///     filters: vec![],
    ///     sort: None,
    ///     pagination: PaginationStyle::PageSize,
    /// };
    /// let params = request.to_params();
    /// assert!(params.contains(&("page".to_string(), "3".to_string())));
    /// ```
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.fields.is_empty() {
            params.push(("_fields".to_string(), self.fields.join(",")));
        }

        match self.pagination {
            PaginationStyle::SkipLimit => {
                params.push(("skip".to_string(), self.skip.to_string()));
                params.push(("limit".to_string(), self.limit.to_string()));
            }
            PaginationStyle::PageSize => {
                params.push(("page".to_string(), self.page.to_string()));
                params.push(("page_size".to_string(), self.limit.to_string()));
            }
        }

        if let Some((key, direction)) = &self.sort {
            params.push(("_order_by".to_string(), key.clone()));
            params.push(("order".to_string(), direction.as_str().to_string()));
        }

        params.extend(self.filters.iter().cloned());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::Filter;
    use crate::api::query::QueryUpdate;
    use crate::api::query::Sort;
    use crate::config::SortKeyStyle;

    fn request(pagination: PaginationStyle) -> PageRequest {
        let mut query = QueryState::new(10, SortKeyStyle::DoubleUnderscore)
            .with_fields(["id", "data.energy.value"])
            .with_pagination(pagination);
        query.apply(
            QueryUpdate::new()
                .filter(Filter::contains("name", "Fe"))
                .filter(Filter::gte("data.energy.value", 2))
                .sort(Sort::desc("data.energy.value", SortKeyStyle::DoubleUnderscore)),
        );
        query.skip = 7;
        query.page = 2;
        PageRequest::from_query(4, &query)
    }

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_skip_limit_params() {
        let params = request(PaginationStyle::SkipLimit).to_params();
        assert_eq!(
            pairs(&params),
            [
                ("_fields", "id,data.energy.value"),
                ("skip", "7"),
                ("limit", "10"),
                ("_order_by", "data__energy__value"),
                ("order", "desc"),
                ("data__energy__value__gte", "2"),
                ("name__contains", "Fe"),
            ]
        );
    }

    #[test]
    fn test_page_params_use_page_cursor() {
        // The page number comes from the cursor, not from skip / limit.
        let params = request(PaginationStyle::PageSize).to_params();
        assert!(pairs(&params).contains(&("page", "2")));
        assert!(pairs(&params).contains(&("page_size", "10")));
        assert!(!pairs(&params).iter().any(|(k, _)| *k == "skip"));
    }

    #[test]
    fn test_snapshot_keeps_generation() {
        let request = request(PaginationStyle::PageSize);
        assert_eq!(request.generation, 4);
        assert_eq!((request.skip, request.page), (7, 2));
    }
}
