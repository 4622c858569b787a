//! Header layout types

use serde::Serialize;

/// Whether a header cell groups columns or names a single leaf column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Ancestor label shared by one or more adjacent leaf columns.
    Group,
    /// The leaf column's own header cell.
    Leaf,
}

/// A single cell of the multi-level header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub label: String,
    /// Always equals `child_column_ids.len()`.
    pub colspan: usize,
    pub rowspan: usize,
    /// Leaf column ids covered by this cell, in visual order.
    pub child_column_ids: Vec<String>,
    pub kind: CellKind,
    /// Only leaf cells of sortable columns are sortable.
    pub sortable: bool,
}

impl HeaderCell {
    pub(crate) fn group(label: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            colspan: 1,
            rowspan: 1,
            child_column_ids: vec![column_id.into()],
            kind: CellKind::Group,
            sortable: false,
        }
    }

    pub(crate) fn leaf(
        label: impl Into<String>,
        column_id: impl Into<String>,
        rowspan: usize,
        sortable: bool,
    ) -> Self {
        Self {
            label: label.into(),
            colspan: 1,
            rowspan,
            child_column_ids: vec![column_id.into()],
            kind: CellKind::Leaf,
            sortable,
        }
    }

    /// Adds the next adjacent leaf column to a group cell.
    pub(crate) fn extend(&mut self, column_id: impl Into<String>) {
        self.child_column_ids.push(column_id.into());
        self.colspan += 1;
    }

    /// Returns `true` if this is a leaf column's own cell.
    pub fn is_leaf(&self) -> bool {
        self.kind == CellKind::Leaf
    }

    /// The column id of a leaf cell.
    pub fn column_id(&self) -> Option<&str> {
        match self.kind {
            CellKind::Leaf => self.child_column_ids.first().map(String::as_str),
            CellKind::Group => None,
        }
    }
}

/// One row of the header; row 0 is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderRow {
    pub cells: Vec<HeaderCell>,
}

impl HeaderRow {
    /// Sum of colspans of the cells that start in this row.
    pub fn span(&self) -> usize {
        self.cells.iter().map(|c| c.colspan).sum()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderCell> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a HeaderRow {
    type Item = &'a HeaderCell;
    type IntoIter = std::slice::Iter<'a, HeaderCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
