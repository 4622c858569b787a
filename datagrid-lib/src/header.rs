//! Multi-level header layout.
//!
//! Turns the ordered list of visible leaf columns into header rows with
//! colspans and rowspans. Ancestor labels are merged only between columns
//! that are adjacent in visual order, so the layout is always rebuilt from
//! scratch when the column set or order changes.

use crate::model::Column;
use crate::model::HeaderCell;
use crate::model::HeaderRow;

/// Builds the header rows for the given visible columns.
///
/// The result has `1 + max(nesting depth)` rows (none for an empty column
/// list). Every column contributes one cell per ancestor level, either by
/// extending the group cell of its left neighbour or by opening a new one,
/// plus its own leaf cell which spans down to the bottom row.
///
/// # Example
///
/// ```
/// use datagrid_lib::header::build_header;
/// use datagrid_lib::model::ColumnModel;
///
/// let model = ColumnModel::from_paths(["id", "data.a", "data.b"]).unwrap();
/// let rows = build_header(model.columns());
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].cells[0].rowspan, 2);
/// assert_eq!(rows[0].cells[1].label, "data");
/// assert_eq!(rows[0].cells[1].colspan, 2);
/// ```
pub fn build_header<'a, I>(visible_columns: I) -> Vec<HeaderRow>
where
    I: IntoIterator<Item = &'a Column>,
{
    let columns: Vec<&Column> = visible_columns.into_iter().collect();
    if columns.is_empty() {
        return Vec::new();
    }

    let depth = 1 + columns.iter().map(|c| c.depth()).max().unwrap_or(0);
    let mut rows = vec![HeaderRow::default(); depth];
    let mut previous: &[String] = &[];

    for column in columns {
        let path = column.nesting_path.as_slice();
        let overlap = common_prefix_len(previous, path);

        for (level, label) in path.iter().enumerate() {
            let row = &mut rows[level].cells;
            if level < overlap {
                // The left neighbour opened or extended this cell, so it is
                // the last one in the row.
                match row.last_mut() {
                    Some(cell) => cell.extend(column.id.as_str()),
                    None => row.push(HeaderCell::group(label.as_str(), column.id.as_str())),
                }
            } else {
                row.push(HeaderCell::group(label.as_str(), column.id.as_str()));
            }
        }

        rows[path.len()].cells.push(HeaderCell::leaf(
            column.label.as_str(),
            column.id.as_str(),
            depth - path.len(),
            column.sortable,
        ));
        previous = path;
    }

    log::debug!(
        "Built header: {} rows, {} leaf columns",
        rows.len(),
        rows[0].span()
    );
    rows
}

/// Length of the common leading run, compared index by index.
fn common_prefix_len(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
