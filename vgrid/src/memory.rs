use std::collections::BTreeMap;

use crate::host::{
    CellBoxMetrics, CellMarkup, HeaderMarkup, PlatformMetrics, RenderHost, RenderedRow, RowMarkup,
};
use crate::layout::ColumnOffset;
use crate::{FocusSink, NodeHandle, ViewportSize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryRow {
    /// Data row index at attach time.
    pub row: usize,
    pub css: String,
    pub top: i64,
    pub cells: Vec<NodeHandle>,
    pub hidden: bool,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryCell {
    pub row_node: NodeHandle,
    pub column: usize,
    pub colspan: usize,
    pub css: String,
    pub html: String,
    pub active: bool,
}

/// Counters of host operations, for asserting on reconciliation work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    pub row_batches: usize,
    pub rows_attached: usize,
    pub rows_removed: usize,
    pub rows_hidden: usize,
    pub cells_attached: usize,
    pub cells_removed: usize,
    pub html_updates: usize,
}

/// A [`RenderHost`] that keeps its node tree in memory.
///
/// Useful for tests and as a reference for real adapters: every handle it returns stays valid
/// until the matching `remove_*` call.
#[derive(Clone, Debug)]
pub struct MemoryHost {
    viewport: Option<ViewportSize>,
    platform: PlatformMetrics,
    cell_box: CellBoxMetrics,
    next_node: u64,
    rows: BTreeMap<NodeHandle, MemoryRow>,
    cells: BTreeMap<NodeHandle, MemoryCell>,
    stats: HostStats,
    canvas_width: i64,
    canvas_height: u64,
    scroll_top: i64,
    scroll_left: i64,
    header_scroll_left: i64,
    focused: Option<FocusSink>,
    headers: Vec<HeaderMarkup>,
    column_offsets: Vec<ColumnOffset>,
}

impl MemoryHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Some(ViewportSize::new(width, height)),
            platform: PlatformMetrics::default(),
            cell_box: CellBoxMetrics::default(),
            next_node: 1,
            rows: BTreeMap::new(),
            cells: BTreeMap::new(),
            stats: HostStats::default(),
            canvas_width: 0,
            canvas_height: 0,
            scroll_top: 0,
            scroll_left: 0,
            header_scroll_left: 0,
            focused: None,
            headers: Vec::new(),
            column_offsets: Vec::new(),
        }
    }

    /// A host without a container; constructing a grid on it fails.
    pub fn detached() -> Self {
        Self {
            viewport: None,
            ..Self::new(0, 0)
        }
    }

    pub fn with_cell_box(mut self, cell_box: CellBoxMetrics) -> Self {
        self.cell_box = cell_box;
        self
    }

    pub fn with_platform(mut self, platform: PlatformMetrics) -> Self {
        self.platform = platform;
        self
    }

    pub fn set_viewport(&mut self, viewport: Option<ViewportSize>) {
        self.viewport = viewport;
    }

    fn alloc(&mut self) -> NodeHandle {
        let h = NodeHandle(self.next_node);
        self.next_node += 1;
        h
    }

    fn insert_cells(&mut self, row_node: NodeHandle, cells: &[CellMarkup]) -> Vec<NodeHandle> {
        let mut out = Vec::with_capacity(cells.len());
        for c in cells {
            let h = self.alloc();
            self.cells.insert(
                h,
                MemoryCell {
                    row_node,
                    column: c.column,
                    colspan: c.colspan,
                    css: c.css.clone(),
                    html: c.html.clone(),
                    active: false,
                },
            );
            out.push(h);
        }
        self.stats.cells_attached += cells.len();
        out
    }

    pub fn stats(&self) -> HostStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = HostStats::default();
    }

    pub fn row(&self, node: NodeHandle) -> Option<&MemoryRow> {
        self.rows.get(&node)
    }

    pub fn cell(&self, node: NodeHandle) -> Option<&MemoryCell> {
        self.cells.get(&node)
    }

    /// Attached rows, hidden ones included.
    pub fn rows(&self) -> impl Iterator<Item = (NodeHandle, &MemoryRow)> {
        self.rows.iter().map(|(h, r)| (*h, r))
    }

    pub fn visible_row_count(&self) -> usize {
        self.rows.values().filter(|r| !r.hidden).count()
    }

    pub fn hidden_row_count(&self) -> usize {
        self.rows.values().filter(|r| r.hidden).count()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Sorted column indexes of the cells attached to `row`.
    pub fn row_columns(&self, row: NodeHandle) -> Vec<usize> {
        let Some(r) = self.rows.get(&row) else {
            return Vec::new();
        };
        let mut cols: Vec<usize> = r
            .cells
            .iter()
            .filter_map(|h| self.cells.get(h).map(|c| c.column))
            .collect();
        cols.sort_unstable();
        cols
    }

    pub fn canvas_size(&self) -> (i64, u64) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn scroll_position(&self) -> (i64, i64) {
        (self.scroll_top, self.scroll_left)
    }

    pub fn header_scroll_left(&self) -> i64 {
        self.header_scroll_left
    }

    pub fn focused(&self) -> Option<FocusSink> {
        self.focused
    }

    pub fn headers(&self) -> &[HeaderMarkup] {
        &self.headers
    }

    pub fn column_offsets(&self) -> &[ColumnOffset] {
        &self.column_offsets
    }
}

impl RenderHost for MemoryHost {
    fn viewport_size(&self) -> Option<ViewportSize> {
        self.viewport
    }

    fn measure_platform(&mut self) -> PlatformMetrics {
        self.platform
    }

    fn measure_cell_box(&mut self) -> CellBoxMetrics {
        self.cell_box
    }

    fn attach_rows(&mut self, rows: &[RowMarkup]) -> Vec<RenderedRow> {
        self.stats.row_batches += 1;
        self.stats.rows_attached += rows.len();
        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            let node = self.alloc();
            let cells = self.insert_cells(node, &r.cells);
            self.rows.insert(
                node,
                MemoryRow {
                    row: r.row,
                    css: r.css.clone(),
                    top: r.top,
                    cells: cells.clone(),
                    hidden: false,
                    active: false,
                },
            );
            out.push(RenderedRow { node, cells });
        }
        out
    }

    fn attach_cells(&mut self, row: NodeHandle, cells: &[CellMarkup]) -> Vec<NodeHandle> {
        if !self.rows.contains_key(&row) {
            return Vec::new();
        }
        let handles = self.insert_cells(row, cells);
        if let Some(r) = self.rows.get_mut(&row) {
            r.cells.extend_from_slice(&handles);
        }
        handles
    }

    fn remove_row(&mut self, row: NodeHandle) {
        if let Some(r) = self.rows.remove(&row) {
            for c in r.cells {
                self.cells.remove(&c);
            }
            self.stats.rows_removed += 1;
        }
    }

    fn hide_row(&mut self, row: NodeHandle) {
        if let Some(r) = self.rows.get_mut(&row) {
            r.hidden = true;
            self.stats.rows_hidden += 1;
        }
    }

    fn remove_cell(&mut self, row: NodeHandle, cell: NodeHandle) {
        if self.cells.remove(&cell).is_some() {
            self.stats.cells_removed += 1;
        }
        if let Some(r) = self.rows.get_mut(&row) {
            r.cells.retain(|c| *c != cell);
        }
    }

    fn set_row_top(&mut self, row: NodeHandle, top: i64) {
        if let Some(r) = self.rows.get_mut(&row) {
            r.top = top;
        }
    }

    fn set_cell_html(&mut self, cell: NodeHandle, html: &str) {
        if let Some(c) = self.cells.get_mut(&cell) {
            c.html = html.to_owned();
            self.stats.html_updates += 1;
        }
    }

    fn set_row_active(&mut self, row: NodeHandle, active: bool) {
        if let Some(r) = self.rows.get_mut(&row) {
            r.active = active;
        }
    }

    fn set_cell_active(&mut self, cell: NodeHandle, active: bool) {
        if let Some(c) = self.cells.get_mut(&cell) {
            c.active = active;
        }
    }

    fn set_canvas_width(&mut self, width: i64) {
        self.canvas_width = width;
    }

    fn set_canvas_height(&mut self, height: u64) {
        self.canvas_height = height;
    }

    fn set_scroll_top(&mut self, top: i64) {
        self.scroll_top = top;
    }

    fn set_scroll_left(&mut self, left: i64) {
        self.scroll_left = left;
    }

    fn set_header_scroll_left(&mut self, left: i64) {
        self.header_scroll_left = left;
    }

    fn focus(&mut self, sink: FocusSink) {
        self.focused = Some(sink);
    }

    fn update_headers(&mut self, headers: &[HeaderMarkup]) {
        self.headers = headers.to_vec();
    }

    fn apply_column_offsets(&mut self, offsets: &[ColumnOffset]) {
        self.column_offsets = offsets.to_vec();
    }
}
