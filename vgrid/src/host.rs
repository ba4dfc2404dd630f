use std::fmt::Write as _;
use std::sync::OnceLock;

use crate::layout::ColumnOffset;
use crate::{FocusSink, NodeHandle, ViewportSize};

static PLATFORM: OnceLock<PlatformMetrics> = OnceLock::new();

/// Measurements that only depend on the platform, shared by every grid in the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlatformMetrics {
    pub scrollbar_width: u32,
    pub scrollbar_height: u32,
    /// Tallest canvas the platform can lay out, in pixels.
    pub max_supported_height: u64,
}

impl Default for PlatformMetrics {
    fn default() -> Self {
        Self {
            scrollbar_width: 0,
            scrollbar_height: 0,
            max_supported_height: 6_000_000,
        }
    }
}

impl PlatformMetrics {
    /// Returns the process-wide metrics, measuring them through `measure` on first use.
    pub fn get_or_measure(measure: impl FnOnce() -> PlatformMetrics) -> PlatformMetrics {
        *PLATFORM.get_or_init(measure)
    }

    /// The memoized metrics, if any grid measured them already.
    pub fn memoized() -> Option<PlatformMetrics> {
        PLATFORM.get().copied()
    }
}

/// Horizontal and vertical padding plus border of header and body cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellBoxMetrics {
    pub header_width_diff: u32,
    pub cell_width_diff: u32,
    pub cell_height_diff: u32,
}

impl CellBoxMetrics {
    /// Narrowest a column can get without its content box collapsing.
    pub fn absolute_min_width(&self) -> u32 {
        self.header_width_diff.max(self.cell_width_diff)
    }
}

/// Markup for one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellMarkup {
    pub column: usize,
    pub colspan: usize,
    pub css: String,
    pub html: String,
}

impl CellMarkup {
    pub fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<div class=\"{}\">{}</div>", self.css, self.html);
    }
}

/// Markup for one row and the cells rendered with it, left to right.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowMarkup {
    pub row: usize,
    pub css: String,
    /// Top in real canvas pixels.
    pub top: i64,
    pub cells: Vec<CellMarkup>,
}

impl RowMarkup {
    pub fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<div class=\"{}\" style=\"top:{}px\">", self.css, self.top);
        for c in &self.cells {
            c.write_html(out);
        }
        out.push_str("</div>");
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

/// Handles of a row attached by [`RenderHost::attach_rows`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedRow {
    pub node: NodeHandle,
    /// One handle per cell of the row's markup, in the same order.
    pub cells: Vec<NodeHandle>,
}

/// Everything a host needs to draw one column header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderMarkup {
    pub column_id: String,
    pub name: String,
    /// Content width, already reduced by the header padding.
    pub width: u32,
    pub css: Option<String>,
    pub tool_tip: Option<String>,
    pub group: Option<usize>,
    pub sortable: bool,
    pub resizable_handle: bool,
    /// `Some(asc)` when the column takes part in the current sort.
    pub sort_asc: Option<bool>,
    /// Position of the column in the sort order.
    pub sort_priority: Option<usize>,
}

/// The surface a [`crate::Grid`] renders into.
///
/// The grid never touches a widget tree itself: it hands markup to the host and gets opaque
/// handles back. Handles are only meaningful to the host that issued them.
pub trait RenderHost {
    /// The viewport below the headers, or `None` when the container is missing or detached.
    fn viewport_size(&self) -> Option<ViewportSize>;

    /// Scrollbar sizes and the maximum canvas height. Called at most once per process.
    fn measure_platform(&mut self) -> PlatformMetrics {
        PlatformMetrics::default()
    }

    fn measure_cell_box(&mut self) -> CellBoxMetrics {
        CellBoxMetrics::default()
    }

    /// Attaches a batch of rows and returns their handles in the same order.
    fn attach_rows(&mut self, rows: &[RowMarkup]) -> Vec<RenderedRow>;

    /// Appends cells to an attached row and returns their handles in the same order.
    fn attach_cells(&mut self, row: NodeHandle, cells: &[CellMarkup]) -> Vec<NodeHandle>;

    /// Detaches a row and all of its cells.
    fn remove_row(&mut self, row: NodeHandle);

    /// Hides a row but keeps it attached. It is removed later through `remove_row`.
    fn hide_row(&mut self, row: NodeHandle);

    fn remove_cell(&mut self, row: NodeHandle, cell: NodeHandle);

    fn set_row_top(&mut self, row: NodeHandle, top: i64);

    fn set_cell_html(&mut self, cell: NodeHandle, html: &str);

    fn set_row_active(&mut self, _row: NodeHandle, _active: bool) {}

    fn set_cell_active(&mut self, _cell: NodeHandle, _active: bool) {}

    fn set_canvas_width(&mut self, _width: i64) {}

    fn set_canvas_height(&mut self, _height: u64) {}

    /// Moves the viewport's real scroll position.
    fn set_scroll_top(&mut self, _top: i64) {}

    fn set_scroll_left(&mut self, _left: i64) {}

    /// Mirrors the horizontal scroll position to the header strip.
    fn set_header_scroll_left(&mut self, _left: i64) {}

    fn focus(&mut self, _sink: FocusSink) {}

    fn update_headers(&mut self, _headers: &[HeaderMarkup]) {}

    fn apply_column_offsets(&mut self, _offsets: &[ColumnOffset]) {}
}
