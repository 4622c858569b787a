//! Grid configuration

use serde::Deserialize;

/// How pagination is spelled in query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStyle {
    /// `skip=<offset>&limit=<n>`
    #[default]
    SkipLimit,
    /// `page=<1-based page>&page_size=<n>`
    PageSize,
}

/// How dotted column paths are spelled in sort keys and filter names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKeyStyle {
    /// `data.energy.value` becomes `data__energy__value`.
    #[default]
    DoubleUnderscore,
    /// Paths are sent unchanged.
    Dotted,
}

impl SortKeyStyle {
    /// Converts a dotted column path into the backend's key syntax.
    ///
    /// ```
    /// use datagrid_lib::config::SortKeyStyle;
    ///
    /// assert_eq!(SortKeyStyle::DoubleUnderscore.normalize("data.energy.value"), "data__energy__value");
    /// assert_eq!(SortKeyStyle::Dotted.normalize("data.energy.value"), "data.energy.value");
    /// ```
    pub fn normalize(&self, path: &str) -> String {
        match self {
            Self::DoubleUnderscore => path.replace('.', "__"),
            Self::Dotted => path.to_string(),
        }
    }
}

/// Which columns are requested through `_fields`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPolicy {
    /// Request every column; toggling visibility never refetches.
    #[default]
    AllColumns,
    /// Request visible columns only; showing a column the loaded rows
    /// lack resets the query.
    VisibleOnly,
}

/// Configuration for a grid instance.
///
/// # Example
///
/// ```
/// use datagrid_lib::config::{GridConfig, PaginationStyle};
///
/// let config = GridConfig::default()
///     .with_page_size(25)
///     .with_pagination(PaginationStyle::PageSize);
/// assert_eq!(config.page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows requested per page.
    ///
    /// Default: 50
    pub page_size: usize,

    /// Pagination parameter naming.
    pub pagination: PaginationStyle,

    /// Sort/filter key syntax.
    pub sort_keys: SortKeyStyle,

    /// Field selection policy.
    pub fields: FieldPolicy,

    /// Show only the first n columns when no stored visibility exists.
    pub initial_columns: Option<usize>,

    /// Key under which visible column ids are persisted.
    ///
    /// Default: `"datagrid.visible_columns"`
    pub visibility_key: String,

    /// Prefix for links to referenced objects.
    ///
    /// Default: `"/"`
    pub link_prefix: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            pagination: PaginationStyle::default(),
            sort_keys: SortKeyStyle::default(),
            fields: FieldPolicy::default(),
            initial_columns: None,
            visibility_key: "datagrid.visible_columns".to_string(),
            link_prefix: "/".to_string(),
        }
    }
}

impl GridConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size. Zero is raised to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the pagination parameter style.
    pub fn with_pagination(mut self, pagination: PaginationStyle) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets the sort key style.
    pub fn with_sort_keys(mut self, sort_keys: SortKeyStyle) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    /// Sets the field selection policy.
    pub fn with_fields(mut self, fields: FieldPolicy) -> Self {
        self.fields = fields;
        self
    }

    /// Limits the initially visible columns.
    pub fn with_initial_columns(mut self, n: usize) -> Self {
        self.initial_columns = Some(n);
        self
    }

    /// Sets the visibility persistence key.
    pub fn with_visibility_key(mut self, key: impl Into<String>) -> Self {
        self.visibility_key = key.into();
        self
    }

    /// Sets the prefix for links to referenced objects.
    pub fn with_link_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.link_prefix = prefix.into();
        self
    }

    /// Page size with the zero case ruled out, for configs loaded through serde.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial() {
        let config: GridConfig =
            serde_json::from_str(r#"{"page_size": 10, "pagination": "page_size", "fields": "visible_only"}"#)
                .unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.pagination, PaginationStyle::PageSize);
        assert_eq!(config.fields, FieldPolicy::VisibleOnly);
        assert_eq!(config.sort_keys, SortKeyStyle::DoubleUnderscore);
        assert_eq!(config.visibility_key, "datagrid.visible_columns");
    }

    #[test]
    fn test_zero_page_size() {
        assert_eq!(GridConfig::default().with_page_size(0).page_size, 1);
        let config: GridConfig = serde_json::from_str(r#"{"page_size": 0}"#).unwrap();
        assert_eq!(config.effective_page_size(), 1);
    }
}
