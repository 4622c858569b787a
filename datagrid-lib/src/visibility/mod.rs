//! Column visibility
//!
//! The [`ColumnVisibilityManager`] owns the visible/hidden partition of the
//! column model. Every change that actually flips a flag or moves a column
//! rebuilds the header from scratch and recomputes the visible field set.

mod store;

pub use store::*;

use crate::header::build_header;
use crate::model::Column;
use crate::model::ColumnModel;
use crate::model::HeaderRow;

/// Owns column visibility and the header layout derived from it.
///
/// Locked columns cannot be hidden; requests to hide them are ignored.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Column, ColumnModel};
/// use datagrid_lib::visibility::ColumnVisibilityManager;
///
/// let model = ColumnModel::new([
///     Column::from_path("id").unwrap().locked(),
///     Column::from_path("data.a").unwrap(),
///     Column::from_path("data.b").unwrap(),
/// ])
/// .unwrap();
/// let mut columns = ColumnVisibilityManager::new(model);
///
/// assert!(columns.hide(["data.a"]));
/// assert!(!columns.hide(["id"]));
/// assert_eq!(columns.visible_ids(), ["id", "data.b"]);
/// assert_eq!(columns.header()[0].span(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnVisibilityManager {
    model: ColumnModel,
    header: Vec<HeaderRow>,
    fields: Vec<String>,
    revision: u64,
}

impl ColumnVisibilityManager {
    /// Takes ownership of the column model and builds the initial header.
    pub fn new(model: ColumnModel) -> Self {
        let mut manager = Self {
            model,
            header: Vec::new(),
            fields: Vec::new(),
            revision: 0,
        };
        manager.recompute();
        manager
    }

    pub fn model(&self) -> &ColumnModel {
        &self.model
    }

    /// Current header rows. Replaced, never patched, on every change.
    pub fn header(&self) -> &[HeaderRow] {
        &self.header
    }

    /// Ids of the visible leaf columns, in visual order.
    pub fn visible_fields(&self) -> &[String] {
        &self.fields
    }

    /// Ids of every column, in visual order.
    pub fn all_fields(&self) -> Vec<String> {
        self.model.columns().iter().map(|c| c.id.clone()).collect()
    }

    /// Visible columns in visual order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.model.visible().collect()
    }

    /// Number of header rebuilds so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Shows the given columns. Returns `true` if anything changed.
    pub fn show<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<S> = ids.into_iter().collect();
        self.update(|column| {
            if ids.iter().any(|id| id.as_ref() == column.id) {
                Some(true)
            } else {
                None
            }
        })
    }

    /// Hides the given columns, skipping locked ones. Returns `true` if
    /// anything changed.
    pub fn hide<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<S> = ids.into_iter().collect();
        self.update(|column| {
            if ids.iter().any(|id| id.as_ref() == column.id) {
                Some(false)
            } else {
                None
            }
        })
    }

    /// Shows every column.
    pub fn show_all(&mut self) -> bool {
        self.update(|_| Some(true))
    }

    /// Shows the first `n` columns of the schema and hides the rest.
    ///
    /// "First" refers to schema order, not the current visual order.
    pub fn restrict_to_initial(&mut self, n: usize) -> bool {
        self.update(|column| Some(column.ordinal < n))
    }

    /// Ids of the visible columns, for persistence.
    pub fn visible_ids(&self) -> Vec<String> {
        self.fields.clone()
    }

    /// Makes exactly the given columns visible, plus every locked column.
    ///
    /// Unknown ids are ignored, so stale persisted state is harmless.
    pub fn set_visible_ids<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<S> = ids.into_iter().collect();
        self.update(|column| Some(ids.iter().any(|id| id.as_ref() == column.id)))
    }

    /// Moves a column to a new visual position and rebuilds the header.
    pub fn move_column(&mut self, id: &str, to: usize) -> bool {
        if !self.model.move_column(id, to) {
            return false;
        }
        self.recompute();
        true
    }

    /// Applies `decide` to every column; `Some(v)` requests visibility `v`.
    fn update(&mut self, mut decide: impl FnMut(&Column) -> Option<bool>) -> bool {
        let mut changed = false;
        for column in self.model.columns_mut() {
            let Some(visible) = decide(column) else {
                continue;
            };
            if !visible && column.locked_visible {
                if column.visible {
                    log::debug!("Ignoring hide of locked column '{}'", column.id);
                }
                continue;
            }
            if column.visible != visible {
                column.visible = visible;
                changed = true;
            }
        }
        if changed {
            self.recompute();
        }
        changed
    }

    fn recompute(&mut self) {
        self.header = build_header(self.model.visible());
        self.fields = self.model.visible().map(|c| c.id.clone()).collect();
        self.revision += 1;
        log::debug!(
            "Visible columns: {} of {} (header revision {})",
            self.fields.len(),
            self.model.len(),
            self.revision
        );
    }
}
