use crate::{CellPos, CellRange};

/// A pluggable selection policy.
///
/// The grid forwards selection requests and active-cell changes; the model decides which
/// ranges end up selected and reports them back.
pub trait SelectionModel {
    /// Replaces the selection. Returns the ranges the model actually accepted.
    fn set_selected_ranges(&mut self, ranges: Vec<CellRange>) -> Vec<CellRange>;

    fn selected_ranges(&self) -> &[CellRange];

    /// Called after the active cell moved. Returning `Some` replaces the selection.
    fn active_cell_changed(&mut self, _active: Option<CellPos>) -> Option<Vec<CellRange>> {
        None
    }

    /// Called when the model is replaced or the grid is destroyed.
    fn destroy(&mut self) {}
}

/// One full-width range per row.
pub fn rows_to_ranges(rows: &[usize], columns: usize) -> Vec<CellRange> {
    rows.iter()
        .map(|&row| CellRange::full_row(row, columns))
        .collect()
}

/// Distinct rows touched by `ranges`, in first-seen order.
pub fn ranges_to_rows(ranges: &[CellRange]) -> Vec<usize> {
    let mut rows = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for r in ranges {
        for row in r.rows() {
            if seen.insert(row) {
                rows.push(row);
            }
        }
    }
    rows
}
