use core::fmt;

/// A normalized rectangle of cells, inclusive on both ends.
///
/// Constructors sort their corners, so `from_* <= to_*` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    pub from_row: usize,
    pub from_cell: usize,
    pub to_row: usize,
    pub to_cell: usize,
}

impl CellRange {
    pub fn new(from_row: usize, from_cell: usize, to_row: usize, to_cell: usize) -> Self {
        Self {
            from_row: from_row.min(to_row),
            from_cell: from_cell.min(to_cell),
            to_row: from_row.max(to_row),
            to_cell: from_cell.max(to_cell),
        }
    }

    /// A range covering exactly one cell.
    pub fn cell(row: usize, cell: usize) -> Self {
        Self::new(row, cell, row, cell)
    }

    /// A range covering every cell of `row` in a grid with `columns` columns.
    pub fn full_row(row: usize, columns: usize) -> Self {
        Self::new(row, 0, row, columns.saturating_sub(1))
    }

    pub fn is_single_row(&self) -> bool {
        self.from_row == self.to_row
    }

    pub fn is_single_cell(&self) -> bool {
        self.from_row == self.to_row && self.from_cell == self.to_cell
    }

    pub fn contains(&self, row: usize, cell: usize) -> bool {
        row >= self.from_row && row <= self.to_row && cell >= self.from_cell && cell <= self.to_cell
    }

    pub fn rows(&self) -> core::ops::RangeInclusive<usize> {
        self.from_row..=self.to_row
    }

    pub fn cells(&self) -> core::ops::RangeInclusive<usize> {
        self.from_cell..=self.to_cell
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "({}:{})", self.from_row, self.from_cell)
        } else {
            write!(
                f,
                "({}:{} - {}:{})",
                self.from_row, self.from_cell, self.to_row, self.to_cell
            )
        }
    }
}
