//! Step functions for moving the active cell.
//!
//! They only ask a [`FocusGrid`] whether cells can take focus, so they stay independent of the
//! render state.

/// The focus model the step functions walk over.
pub trait FocusGrid {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn can_cell_be_active(&self, row: usize, cell: usize) -> bool;

    /// Number of columns the cell starting at `cell` covers.
    fn colspan(&self, _row: usize, _cell: usize) -> usize {
        1
    }
}

/// A navigation target. `pos_x` is the column remembered for vertical moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepTarget {
    pub row: usize,
    pub cell: usize,
    pub pos_x: usize,
}

impl StepTarget {
    fn at(row: usize, cell: usize) -> Self {
        Self {
            row,
            cell,
            pos_x: cell,
        }
    }
}

fn span<G: FocusGrid + ?Sized>(g: &G, row: usize, cell: usize) -> usize {
    g.colspan(row, cell).max(1)
}

pub fn first_focusable_cell<G: FocusGrid + ?Sized>(g: &G, row: usize) -> Option<usize> {
    let mut cell = 0;
    while cell < g.column_count() {
        if g.can_cell_be_active(row, cell) {
            return Some(cell);
        }
        cell += span(g, row, cell);
    }
    None
}

pub fn last_focusable_cell<G: FocusGrid + ?Sized>(g: &G, row: usize) -> Option<usize> {
    let mut cell = 0;
    let mut last = None;
    while cell < g.column_count() {
        if g.can_cell_be_active(row, cell) {
            last = Some(cell);
        }
        cell += span(g, row, cell);
    }
    last
}

/// Last focusable cell start at or before column `pos_x`, walking colspans from the left.
pub fn focusable_cell_at_or_before<G: FocusGrid + ?Sized>(
    g: &G,
    row: usize,
    pos_x: usize,
) -> Option<usize> {
    let mut cell = 0;
    let mut found = None;
    while cell <= pos_x && cell < g.column_count() {
        if g.can_cell_be_active(row, cell) {
            found = Some(cell);
        }
        cell += span(g, row, cell);
    }
    found
}

/// Start of the cell that covers column `pos_x` in `row`.
fn cell_covering<G: FocusGrid + ?Sized>(g: &G, row: usize, pos_x: usize) -> usize {
    let mut cell = 0;
    let mut prev = 0;
    while cell <= pos_x && cell < g.column_count() {
        prev = cell;
        cell += span(g, row, cell);
    }
    prev
}

pub fn goto_right<G: FocusGrid + ?Sized>(g: &G, row: usize, cell: usize) -> Option<StepTarget> {
    let columns = g.column_count();
    if cell >= columns {
        return None;
    }
    let mut cell = cell;
    loop {
        cell += span(g, row, cell);
        if cell >= columns || g.can_cell_be_active(row, cell) {
            break;
        }
    }
    (cell < columns).then(|| StepTarget::at(row, cell))
}

pub fn goto_left<G: FocusGrid + ?Sized>(g: &G, row: usize, cell: usize) -> Option<StepTarget> {
    if cell == 0 {
        return None;
    }
    let first = first_focusable_cell(g, row)?;
    if first >= cell {
        return None;
    }
    let mut prev = StepTarget::at(row, first);
    loop {
        let pos = goto_right(g, prev.row, prev.cell)?;
        if pos.cell >= cell {
            return Some(prev);
        }
        prev = pos;
    }
}

pub fn goto_down<G: FocusGrid + ?Sized>(g: &G, row: usize, pos_x: usize) -> Option<StepTarget> {
    let mut row = row;
    loop {
        row += 1;
        if row >= g.row_count() {
            return None;
        }
        let cell = cell_covering(g, row, pos_x);
        if g.can_cell_be_active(row, cell) {
            return Some(StepTarget { row, cell, pos_x });
        }
    }
}

pub fn goto_up<G: FocusGrid + ?Sized>(g: &G, row: usize, pos_x: usize) -> Option<StepTarget> {
    let mut row = row;
    loop {
        if row == 0 {
            return None;
        }
        row -= 1;
        let cell = cell_covering(g, row, pos_x);
        if g.can_cell_be_active(row, cell) {
            return Some(StepTarget { row, cell, pos_x });
        }
    }
}

/// Like [`goto_right`], wrapping to the first focusable cell of the following rows.
///
/// Without a current position it starts at the top-left cell.
pub fn goto_next<G: FocusGrid + ?Sized>(
    g: &G,
    from: Option<(usize, usize)>,
) -> Option<StepTarget> {
    let (row, cell) = match from {
        Some(p) => p,
        None => {
            if g.can_cell_be_active(0, 0) {
                return Some(StepTarget::at(0, 0));
            }
            (0, 0)
        }
    };
    if let Some(pos) = goto_right(g, row, cell) {
        return Some(pos);
    }
    ((row + 1)..g.row_count())
        .find_map(|r| first_focusable_cell(g, r).map(|c| StepTarget::at(r, c)))
}

/// Like [`goto_left`], wrapping to the last focusable cell of the preceding rows.
///
/// Without a current position it starts at the bottom-right cell.
pub fn goto_prev<G: FocusGrid + ?Sized>(
    g: &G,
    from: Option<(usize, usize)>,
) -> Option<StepTarget> {
    let (row, cell) = match from {
        Some(p) => p,
        None => {
            let row = g.row_count().checked_sub(1)?;
            let cell = g.column_count().checked_sub(1)?;
            if g.can_cell_be_active(row, cell) {
                return Some(StepTarget::at(row, cell));
            }
            (row, cell)
        }
    };
    if let Some(pos) = goto_left(g, row, cell) {
        return Some(pos);
    }
    (0..row)
        .rev()
        .find_map(|r| last_focusable_cell(g, r).map(|c| StepTarget::at(r, c)))
}
