//! Column descriptors and the ordered column model

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::SchemaError;

/// How the cells of a column are rendered.
///
/// `Auto` lets the cell renderer detect the shape of each value; every other
/// variant forces one rendering branch regardless of the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// Detect per value.
    #[default]
    Auto,
    /// Plain text.
    Text,
    /// Numeric value.
    Number,
    /// Absolute URL rendered as a hyperlink.
    Url,
    /// 24-hex-character object identifier rendered as a short link.
    ObjectId,
    /// Array of `{id, name}` references rendered as linked tags.
    References,
}

/// A single leaf column of the grid.
///
/// `nesting_path` holds the ancestor labels derived from the dotted column
/// name: `"data.energy.value"` has nesting `["data", "energy"]` and label
/// `"value"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Field path requested from the backend.
    pub id: String,
    /// Leaf label shown in the header.
    pub label: String,
    /// Rendering hint for cells.
    pub cell_type: CellType,
    /// Whether clicking the header may sort by this column.
    pub sortable: bool,
    /// Ancestor header labels, outermost first.
    pub nesting_path: Vec<String>,
    /// Whether the column is currently shown.
    pub visible: bool,
    /// Locked columns can never be hidden.
    pub locked_visible: bool,
    /// Position in the schema the column was created from.
    pub(crate) ordinal: usize,
}

impl Column {
    /// Creates a visible, sortable column from a dotted field path.
    ///
    /// # Example
    ///
    /// ```
    /// use datagrid_lib::model::Column;
    ///
    /// let column = Column::from_path("data.energy.value").unwrap();
    /// assert_eq!(column.label, "value");
    /// assert_eq!(column.nesting_path, vec!["data", "energy"]);
    /// ```
    pub fn from_path(path: impl Into<String>) -> Result<Self, SchemaError> {
        let id = path.into();
        let mut segments: Vec<String> = id.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(SchemaError::InvalidName(id));
        }
        let label = segments.pop().unwrap_or_default();

        Ok(Self {
            id,
            label,
            cell_type: CellType::Auto,
            sortable: true,
            nesting_path: segments,
            visible: true,
            locked_visible: false,
            ordinal: 0,
        })
    }

    /// Overrides the leaf label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the rendering hint.
    pub fn with_cell_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = cell_type;
        self
    }

    /// Sets whether the column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets the initial visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Locks the column visible. Locking also makes it visible.
    pub fn locked(mut self) -> Self {
        self.locked_visible = true;
        self.visible = true;
        self
    }

    /// Number of header rows above the leaf cell.
    pub fn depth(&self) -> usize {
        self.nesting_path.len()
    }
}

/// Column metadata as delivered by the schema endpoint.
///
/// ```
/// use datagrid_lib::model::ColumnSpec;
///
/// let spec: ColumnSpec = serde_json::from_str(r#"{"name": "data.energy.value", "type": "number"}"#).unwrap();
/// assert!(spec.sortable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnSpec {
    /// Dotted field path.
    pub name: String,
    /// Optional leaf label; defaults to the last path segment.
    #[serde(default)]
    pub label: Option<String>,
    /// Rendering hint.
    #[serde(default, rename = "type")]
    pub cell_type: CellType,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnSpec {
    /// Creates a spec with defaults for everything but the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            cell_type: CellType::Auto,
            sortable: true,
            locked: false,
            visible: true,
        }
    }

    fn into_column(self) -> Result<Column, SchemaError> {
        let mut column = Column::from_path(self.name)?
            .with_cell_type(self.cell_type)
            .sortable(self.sortable)
            .visible(self.visible);
        if let Some(label) = self.label {
            column = column.with_label(label);
        }
        if self.locked {
            column = column.locked();
        }
        Ok(column)
    }
}

/// The ordered sequence of columns, in visual order.
///
/// Constructed once from schema metadata. Ordinals remember the schema
/// order so "the first n columns" stays stable across reorders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnModel {
    columns: Vec<Column>,
}

impl ColumnModel {
    /// Builds a model from columns, rejecting duplicate ids.
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (ordinal, mut column) in columns.into_iter().enumerate() {
            if !seen.insert(column.id.clone()) {
                return Err(SchemaError::DuplicateId(column.id));
            }
            column.ordinal = ordinal;
            out.push(column);
        }
        Ok(Self { columns: out })
    }

    /// Builds a model from schema metadata.
    pub fn from_specs(specs: impl IntoIterator<Item = ColumnSpec>) -> Result<Self, SchemaError> {
        let columns = specs
            .into_iter()
            .map(ColumnSpec::into_column)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(columns)
    }

    /// Builds a model from plain dotted field paths.
    pub fn from_paths<I, S>(paths: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = paths
            .into_iter()
            .map(Column::from_path)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(columns)
    }

    /// All columns in visual order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Looks up a column by id.
    pub fn get(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Position of a column in visual order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// Visible columns in visual order.
    pub fn visible(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Moves a column to a new visual position. Returns `false` if nothing moved.
    pub fn move_column(&mut self, id: &str, to: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let to = to.min(self.columns.len().saturating_sub(1));
        if from == to {
            return false;
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        true
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_path() {
        let column = Column::from_path("name").unwrap();
        assert_eq!(column.label, "name");
        assert!(column.nesting_path.is_empty());
        assert_eq!(column.depth(), 0);
    }

    #[test]
    fn test_empty_segment_rejected() {
        assert_eq!(
            Column::from_path("data..value"),
            Err(SchemaError::InvalidName("data..value".to_string()))
        );
        assert!(Column::from_path("").is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ColumnModel::from_paths(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateId("a".to_string()));
    }

    #[test]
    fn test_specs_from_json() {
        let specs: Vec<ColumnSpec> = serde_json::from_str(
            r#"[
                {"name": "id", "locked": true, "type": "object_id"},
                {"name": "data.energy.value", "label": "Energy", "sortable": false},
                {"name": "tags", "type": "references", "visible": false}
            ]"#,
        )
        .unwrap();
        let model = ColumnModel::from_specs(specs).unwrap();

        let id = model.get("id").unwrap();
        assert!(id.locked_visible);
        assert_eq!(id.cell_type, CellType::ObjectId);

        let energy = model.get("data.energy.value").unwrap();
        assert_eq!(energy.label, "Energy");
        assert!(!energy.sortable);
        assert_eq!(energy.nesting_path, vec!["data", "energy"]);

        assert!(!model.get("tags").unwrap().visible);
        assert_eq!(model.visible().count(), 2);
    }

    #[test]
    fn test_move_column_keeps_ordinals() {
        let mut model = ColumnModel::from_paths(["a", "b", "c"]).unwrap();
        assert!(model.move_column("c", 0));
        let ids: Vec<_> = model.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert_eq!(model.get("c").unwrap().ordinal, 2);
        assert!(!model.move_column("missing", 0));
        assert!(!model.move_column("c", 0));
    }
}
