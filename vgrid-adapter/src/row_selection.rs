use vgrid::{CellPos, CellRange, Event, SelectionModel, ranges_to_rows, rows_to_ranges};

/// Selects whole rows.
///
/// Every range handed to the model is widened to the full width of the grid, so a single-cell
/// selection selects its row. With `select_active_row` on (the default), moving the active
/// cell selects the active row.
///
/// The model does not see the grid, so it is told the column count up front. Keep it in sync
/// with [`RowSelectionModel::set_column_count`] when columns change.
#[derive(Debug)]
pub struct RowSelectionModel {
    ranges: Vec<CellRange>,
    column_count: usize,
    select_active_row: bool,
    pub on_selected_ranges_changed: Event<Vec<CellRange>>,
}

impl RowSelectionModel {
    pub fn new(column_count: usize) -> Self {
        Self {
            ranges: Vec::new(),
            column_count,
            select_active_row: true,
            on_selected_ranges_changed: Event::new(),
        }
    }

    pub fn with_select_active_row(mut self, enabled: bool) -> Self {
        self.select_active_row = enabled;
        self
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Changes the width of future ranges. The current selection is widened or narrowed too.
    pub fn set_column_count(&mut self, column_count: usize) {
        self.column_count = column_count;
        let rows = ranges_to_rows(&self.ranges);
        self.ranges = rows_to_ranges(&rows, column_count);
    }

    /// Rows covered by the current selection, in selection order.
    pub fn selected_rows(&self) -> Vec<usize> {
        ranges_to_rows(&self.ranges)
    }
}

impl SelectionModel for RowSelectionModel {
    fn set_selected_ranges(&mut self, ranges: Vec<CellRange>) -> Vec<CellRange> {
        let rows = ranges_to_rows(&ranges);
        self.ranges = rows_to_ranges(&rows, self.column_count);
        vtrace!(rows = rows.len(), "RowSelectionModel::set_selected_ranges");
        self.on_selected_ranges_changed.notify(&self.ranges);
        self.ranges.clone()
    }

    fn selected_ranges(&self) -> &[CellRange] {
        &self.ranges
    }

    fn active_cell_changed(&mut self, active: Option<CellPos>) -> Option<Vec<CellRange>> {
        if !self.select_active_row {
            return None;
        }
        let pos = active?;
        Some(vec![CellRange::full_row(pos.row, self.column_count)])
    }

    fn destroy(&mut self) {
        self.ranges.clear();
    }
}
