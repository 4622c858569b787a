//! Sort types for backend queries.

use crate::config::SortKeyStyle;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// The value of the `order` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// The active sort of a query.
///
/// Holds both the column the user clicked and the key sent to the backend,
/// which is the column path normalized into the backend's syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Column id as shown in the grid.
    pub column_id: String,
    /// Sort key sent as `_order_by`.
    pub key: String,
    pub direction: Direction,
}

impl Sort {
    /// Creates a sort on a column, normalizing its dotted path.
    ///
    /// ```
    /// use datagrid_lib::api::query::{Direction, Sort};
    /// use datagrid_lib::config::SortKeyStyle;
    ///
    /// let sort = Sort::new("data.energy.value", Direction::Desc, SortKeyStyle::DoubleUnderscore);
    /// assert_eq!(sort.key, "data__energy__value");
    /// ```
    pub fn new(column_id: impl Into<String>, direction: Direction, style: SortKeyStyle) -> Self {
        let column_id = column_id.into();
        Self {
            key: style.normalize(&column_id),
            column_id,
            direction,
        }
    }

    /// Ascending sort on a column.
    pub fn asc(column_id: impl Into<String>, style: SortKeyStyle) -> Self {
        Self::new(column_id, Direction::Asc, style)
    }

    /// Descending sort on a column.
    pub fn desc(column_id: impl Into<String>, style: SortKeyStyle) -> Self {
        Self::new(column_id, Direction::Desc, style)
    }
}
