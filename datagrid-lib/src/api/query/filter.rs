//! Filter types for backend queries.

use crate::config::SortKeyStyle;

/// Comparison operator of a filter.
///
/// Each operator becomes the suffix of the query parameter name:
/// `name__contains=Fe`, `value__gte=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Exact match: `field__exact`
    Exact,
    /// Not equal: `field__ne`
    Ne,
    /// Substring: `field__contains`
    Contains,
    /// Case-insensitive substring: `field__icontains`
    IContains,
    /// Prefix: `field__startswith`
    StartsWith,
    /// Greater than: `field__gt`
    Gt,
    /// Greater than or equal: `field__gte`
    Gte,
    /// Less than: `field__lt`
    Lt,
    /// Less than or equal: `field__lte`
    Lte,
    /// Membership in a comma-joined list: `field__in`
    In,
}

impl FilterOp {
    /// The operator suffix used in parameter names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Ne => "ne",
            Self::Contains => "contains",
            Self::IContains => "icontains",
            Self::StartsWith => "startswith",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
        }
    }
}

/// A single filter condition on a column.
///
/// # Example
///
/// ```
/// use datagrid_lib::api::query::Filter;
/// use datagrid_lib::config::SortKeyStyle;
///
/// let filter = Filter::gte("data.energy.value", -2.5);
/// assert_eq!(filter.key(SortKeyStyle::DoubleUnderscore), "data__energy__value__gte");
/// assert_eq!(filter.value, "-2.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Dotted column path.
    pub field: String,
    pub op: FilterOp,
    /// Parameter value as sent to the backend.
    pub value: String,
}

impl Filter {
    /// Creates a filter with an explicit operator.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl ToString) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.to_string(),
        }
    }

    /// Creates an exact-match filter.
    pub fn exact(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Exact, value)
    }

    /// Creates a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Ne, value)
    }

    /// Creates a substring filter.
    pub fn contains(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Contains, value)
    }

    /// Creates a case-insensitive substring filter.
    pub fn icontains(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::IContains, value)
    }

    /// Creates a prefix filter.
    pub fn starts_with(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::StartsWith, value)
    }

    /// Creates a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Gt, value)
    }

    /// Creates a greater-than-or-equal filter.
    pub fn gte(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Gte, value)
    }

    /// Creates a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Lt, value)
    }

    /// Creates a less-than-or-equal filter.
    pub fn lte(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Lte, value)
    }

    /// Creates a membership filter; values are comma-joined.
    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self::new(field, FilterOp::In, joined)
    }

    /// The query parameter name: `<field>__<operator>`.
    pub fn key(&self, style: SortKeyStyle) -> String {
        format!("{}__{}", style.normalize(&self.field), self.op.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(
            Filter::contains("name", "Fe").key(SortKeyStyle::DoubleUnderscore),
            "name__contains"
        );
        assert_eq!(
            Filter::lte("data.band_gap", 1).key(SortKeyStyle::Dotted),
            "data.band_gap__lte"
        );
    }

    #[test]
    fn test_in_joins_values() {
        let filter = Filter::is_in("elements", ["Fe", "O"]);
        assert_eq!(filter.value, "Fe,O");
        assert_eq!(filter.key(SortKeyStyle::DoubleUnderscore), "elements__in");
    }
}
