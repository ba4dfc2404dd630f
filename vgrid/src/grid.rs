use std::collections::BTreeMap;

use crate::cache::RowCache;
use crate::data::ItemId;
use crate::error::{GridError, InvariantViolation, Result};
use crate::events::{CellCssHash, CellCssStylesChangedArgs, GridEvents, SelectedRowsChangedArgs};
use crate::host::{CellBoxMetrics, HeaderMarkup, PlatformMetrics};
use crate::layout::{ColumnLayout, ResizeDrag};
use crate::paging::PageMap;
use crate::plugin::{Plugin, PluginId};
use crate::selection::{SelectionModel, ranges_to_rows, rows_to_ranges};
use crate::{
    CellPos, CellRange, Column, ColumnGroup, DataNotification, DataProvider, FocusSink,
    GridOptions, NodeHandle, RenderHost, ScrollDirection, SortColumn,
};

/// The focused cell. The logical position is authoritative; `node` is re-resolved from the row
/// cache whenever rows are rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ActiveCell {
    pub(crate) row: usize,
    pub(crate) cell: usize,
    pub(crate) pos_x: usize,
    pub(crate) node: Option<NodeHandle>,
}

impl ActiveCell {
    pub(crate) fn pos(&self) -> CellPos {
        CellPos::new(self.row, self.cell)
    }
}

/// A virtualized data grid.
///
/// The grid renders only the rows near the viewport into its [`RenderHost`], keyed by item id,
/// and reconciles that set on every scroll, resize and data change. It does not hold any UI
/// objects: the host reports viewport geometry, scroll positions and input, and calls
/// [`Grid::tick`] so deferred renders can fire.
pub struct Grid<D: DataProvider, H: RenderHost> {
    /// Notification channels. Handlers receive payloads, never the grid itself.
    pub events: GridEvents,

    pub(crate) host: H,
    pub(crate) data: D,
    pub(crate) layout: ColumnLayout,
    pub(crate) options: GridOptions,
    pub(crate) metrics: PlatformMetrics,
    pub(crate) cell_box: CellBoxMetrics,

    pub(crate) viewport_w: i64,
    pub(crate) viewport_h: i64,
    pub(crate) num_visible_rows: usize,
    pub(crate) has_vscroll: bool,
    pub(crate) has_hscroll: bool,
    pub(crate) canvas_width: i64,

    pub(crate) pages: PageMap,
    pub(crate) page: u64,
    pub(crate) offset: i64,
    pub(crate) scroll_top: i64,
    pub(crate) scroll_left: i64,
    pub(crate) prev_scroll_top: i64,
    pub(crate) prev_scroll_left: i64,
    pub(crate) last_rendered_scroll_top: i64,
    pub(crate) last_rendered_scroll_left: i64,
    /// Forces the next render to run the cell pass even if `scroll_left` did not move.
    pub(crate) cells_stale: bool,
    pub(crate) scroll_dir: Option<ScrollDirection>,
    pub(crate) pending_render_at: Option<u64>,

    pub(crate) rows: RowCache<ItemId<D>>,
    pub(crate) wheel_row: Option<NodeHandle>,
    pub(crate) zombie_row: Option<NodeHandle>,

    pub(crate) active: Option<ActiveCell>,
    pub(crate) tabbing: FocusSink,
    pub(crate) sort_columns: Vec<SortColumn>,
    pub(crate) resize: Option<ResizeDrag>,

    pub(crate) selection_model: Option<Box<dyn SelectionModel>>,
    pub(crate) selected_rows: Vec<usize>,
    pub(crate) cell_css_classes: BTreeMap<String, CellCssHash>,

    pub(crate) plugins: Vec<(PluginId, Box<dyn Plugin<D, H>>)>,
    next_plugin_id: u64,
}

impl<D: DataProvider, H: RenderHost> Grid<D, H> {
    /// Creates a grid and renders its first frame.
    ///
    /// Fails with [`GridError::Configuration`] when the host has no viewport.
    pub fn new(mut host: H, data: D, columns: Vec<Column>, options: GridOptions) -> Result<Self> {
        let viewport = host.viewport_size().ok_or_else(|| {
            GridError::Configuration("render host has no viewport container".to_owned())
        })?;
        let metrics = PlatformMetrics::get_or_measure(|| host.measure_platform());
        let cell_box = host.measure_cell_box();
        let layout = ColumnLayout::new(
            columns,
            options.default_column_width,
            cell_box.absolute_min_width(),
        );
        vdebug!(
            columns = layout.len(),
            rows = data.len(),
            width = viewport.width,
            height = viewport.height,
            "Grid::new"
        );

        let mut grid = Self {
            events: GridEvents::default(),
            host,
            data,
            layout,
            options,
            metrics,
            cell_box,
            viewport_w: i64::from(viewport.width),
            viewport_h: i64::from(viewport.height),
            num_visible_rows: 0,
            has_vscroll: false,
            has_hscroll: false,
            canvas_width: 0,
            pages: PageMap::default(),
            page: 0,
            offset: 0,
            scroll_top: 0,
            scroll_left: 0,
            prev_scroll_top: 0,
            prev_scroll_left: 0,
            last_rendered_scroll_top: 0,
            last_rendered_scroll_left: 0,
            cells_stale: true,
            scroll_dir: Some(ScrollDirection::Forward),
            pending_render_at: None,
            rows: RowCache::default(),
            wheel_row: None,
            zombie_row: None,
            active: None,
            tabbing: FocusSink::Trailing,
            sort_columns: Vec::new(),
            resize: None,
            selection_model: None,
            selected_rows: Vec::new(),
            cell_css_classes: BTreeMap::new(),
            plugins: Vec::new(),
            next_plugin_id: 1,
        };
        grid.update_headers();
        grid.resize_canvas();
        Ok(grid)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Raw access to the data provider. Changes are not picked up until [`Grid::sync_data`].
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Mutates the data provider, then applies the notifications it queued.
    pub fn with_data_mut<R>(&mut self, f: impl FnOnce(&mut D) -> R) -> R {
        let out = f(&mut self.data);
        self.sync_data();
        out
    }

    /// Drains provider notifications: row-count changes re-run `update_row_count`, changed rows
    /// are invalidated, and the grid re-renders after each.
    pub fn sync_data(&mut self) {
        for note in self.data.drain_notifications() {
            match note {
                DataNotification::RowCountChanged { .. } => {
                    vtrace!(rows = self.data.len(), "Grid::sync_data row count");
                    self.update_row_count();
                    self.render();
                }
                DataNotification::RowsChanged { rows } => {
                    self.invalidate_rows(&rows);
                    self.render();
                }
            }
        }
    }

    /// Swaps in a new data provider and returns the old one. Call [`Grid::render`] afterwards.
    pub fn set_data(&mut self, data: D, scroll_to_top: bool) -> D {
        self.invalidate_all_rows();
        let old = core::mem::replace(&mut self.data, data);
        self.update_row_count();
        if scroll_to_top {
            self.scroll_to(0);
        }
        old
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn data_item(&self, row: usize) -> Option<&D::Item> {
        self.data.item(row)
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: GridOptions) {
        let row_height_changed = options.row_height != self.options.row_height;
        let width_changed = options.full_width_rows != self.options.full_width_rows;
        self.options = options;
        if row_height_changed {
            self.invalidate_all_rows();
            self.num_visible_rows = self.visible_row_capacity();
            self.update_row_count();
        }
        if width_changed {
            self.update_canvas_width(true);
        }
        self.update_headers();
        self.render();
    }

    pub fn update_options(&mut self, f: impl FnOnce(&mut GridOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn platform_metrics(&self) -> PlatformMetrics {
        self.metrics
    }

    // Columns

    pub fn columns(&self) -> &[Column] {
        self.layout.columns()
    }

    pub fn column_groups(&self) -> &[ColumnGroup] {
        self.layout.groups()
    }

    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.layout.index_of(id)
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Replaces the columns (dropping any groups) and rebuilds every row.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.set_grouped_columns(columns, Vec::new());
    }

    pub fn set_grouped_columns(&mut self, columns: Vec<Column>, groups: Vec<ColumnGroup>) {
        self.layout
            .set_columns(columns, groups, self.options.default_column_width);
        vdebug!(columns = self.layout.len(), "Grid::set_columns");
        self.resize = None;
        if self.active.is_some_and(|a| a.cell >= self.layout.len()) {
            self.reset_active_cell();
        }
        self.invalidate_all_rows();
        self.update_headers();
        self.resize_canvas();
        self.apply_column_widths();
    }

    /// Fits the columns to the viewport width. See [`ColumnLayout::autosize`].
    pub fn autosize_columns(&mut self) {
        let available = self.available_width();
        let rerender = self.layout.autosize(available);
        self.update_headers();
        self.update_canvas_width(true);
        if rerender {
            self.invalidate_all_rows();
            self.render();
        }
    }

    pub(crate) fn available_width(&self) -> i64 {
        if self.has_vscroll {
            self.viewport_w - i64::from(self.metrics.scrollbar_width)
        } else {
            self.viewport_w
        }
    }

    pub(crate) fn apply_column_widths(&mut self) {
        let offsets = self.layout.offsets(self.canvas_width);
        self.host.apply_column_offsets(&offsets);
    }

    pub(crate) fn update_headers(&mut self) {
        let handles = self.layout.resize_handles(self.options.force_fit_columns);
        let headers: Vec<HeaderMarkup> = self
            .layout
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let sorted = self
                    .sort_columns
                    .iter()
                    .position(|s| s.column_id == c.id);
                HeaderMarkup {
                    column_id: c.id.clone(),
                    name: c.name.clone(),
                    width: c.width.saturating_sub(self.cell_box.header_width_diff),
                    css: c.header_css_class.clone(),
                    tool_tip: c.tool_tip.clone(),
                    group: c.group,
                    sortable: c.sortable,
                    resizable_handle: handles.contains(&i),
                    sort_asc: sorted.map(|p| self.sort_columns[p].sort_asc),
                    sort_priority: sorted,
                }
            })
            .collect();
        self.host.update_headers(&headers);
    }

    // Sorting

    pub fn sort_columns(&self) -> &[SortColumn] {
        &self.sort_columns
    }

    pub fn set_sort_column(&mut self, column_id: impl Into<String>, ascending: bool) {
        self.set_sort_columns(vec![SortColumn::new(column_id, ascending)]);
    }

    /// Sets the sort order and refreshes the header indicators. No `sort` event fires.
    pub fn set_sort_columns(&mut self, columns: Vec<SortColumn>) {
        self.sort_columns = columns;
        self.update_headers();
    }

    // Selection

    /// Installs a selection model, destroying the previous one.
    pub fn set_selection_model(&mut self, model: Box<dyn SelectionModel>) {
        if let Some(mut old) = self.selection_model.replace(model) {
            old.destroy();
        }
    }

    pub fn take_selection_model(&mut self) -> Option<Box<dyn SelectionModel>> {
        self.selection_model.take()
    }

    pub fn selection_model(&self) -> Option<&dyn SelectionModel> {
        self.selection_model.as_deref()
    }

    pub fn selected_rows(&self) -> Result<&[usize]> {
        if self.selection_model.is_none() {
            return Err(InvariantViolation::SelectionModelMissing.into());
        }
        Ok(&self.selected_rows)
    }

    /// Selects whole rows through the selection model.
    pub fn set_selected_rows(&mut self, rows: &[usize]) -> Result<()> {
        let ranges = rows_to_ranges(rows, self.layout.len());
        let model = self
            .selection_model
            .as_mut()
            .ok_or(InvariantViolation::SelectionModelMissing)?;
        let accepted = model.set_selected_ranges(ranges);
        self.apply_selected_ranges(&accepted);
        Ok(())
    }

    /// Records ranges reported by the selection model: updates `selected_rows`, highlights the
    /// selectable cells and fires `selected_rows_changed`.
    pub fn apply_selected_ranges(&mut self, ranges: &[CellRange]) {
        self.selected_rows = ranges_to_rows(ranges);
        let mut hash = CellCssHash::new();
        let class = self.options.selected_cell_css_class.clone();
        for range in ranges {
            for row in range.rows() {
                for cell in range.cells() {
                    if self.can_cell_be_selected(row, cell) {
                        if let Some(c) = self.layout.column(cell) {
                            hash.entry(row)
                                .or_default()
                                .insert(c.id.clone(), class.clone());
                        }
                    }
                }
            }
        }
        self.set_cell_css_styles(&class, hash);
        let args = SelectedRowsChangedArgs {
            rows: self.selected_rows.clone(),
        };
        self.events.selected_rows_changed.notify(&args);
    }

    pub(crate) fn notify_selection_model_active(&mut self) {
        let active = self.active.map(|a| a.pos());
        let Some(model) = self.selection_model.as_mut() else {
            return;
        };
        if let Some(ranges) = model.active_cell_changed(active) {
            let accepted = model.set_selected_ranges(ranges);
            self.apply_selected_ranges(&accepted);
        }
    }

    // Cell css

    pub fn cell_css_styles(&self, key: &str) -> Option<&CellCssHash> {
        self.cell_css_classes.get(key)
    }

    /// Sets the classes recorded under `key` and redraws the rows whose classes changed.
    pub fn set_cell_css_styles(&mut self, key: &str, hash: CellCssHash) {
        let prev = self.cell_css_classes.insert(key.to_owned(), hash.clone());
        self.redraw_css_rows(prev.as_ref(), Some(&hash));
        let args = CellCssStylesChangedArgs {
            key: key.to_owned(),
            hash: Some(hash),
        };
        self.events.cell_css_styles_changed.notify(&args);
    }

    pub fn remove_cell_css_styles(&mut self, key: &str) -> Option<CellCssHash> {
        let prev = self.cell_css_classes.remove(key)?;
        self.redraw_css_rows(Some(&prev), None);
        let args = CellCssStylesChangedArgs {
            key: key.to_owned(),
            hash: None,
        };
        self.events.cell_css_styles_changed.notify(&args);
        Some(prev)
    }

    fn redraw_css_rows(&mut self, prev: Option<&CellCssHash>, next: Option<&CellCssHash>) {
        let empty = CellCssHash::new();
        let prev = prev.unwrap_or(&empty);
        let next = next.unwrap_or(&empty);
        let mut rows: Vec<usize> = prev
            .keys()
            .chain(next.keys())
            .copied()
            .filter(|row| prev.get(row) != next.get(row))
            .collect();
        rows.sort_unstable();
        rows.dedup();
        if rows.is_empty() {
            return;
        }
        self.invalidate_rows(&rows);
        self.render();
    }

    // Plugins

    /// Initializes `plugin` and keeps it until it is unregistered or the grid is destroyed.
    pub fn register_plugin(&mut self, mut plugin: Box<dyn Plugin<D, H>>) -> PluginId {
        let id = PluginId(self.next_plugin_id);
        self.next_plugin_id += 1;
        plugin.init(self);
        self.plugins.insert(0, (id, plugin));
        id
    }

    pub fn unregister_plugin(&mut self, id: PluginId) -> Option<Box<dyn Plugin<D, H>>> {
        let idx = self.plugins.iter().position(|(pid, _)| *pid == id)?;
        let (_, mut plugin) = self.plugins.remove(idx);
        plugin.destroy(self);
        Some(plugin)
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Fires `before_destroy`, tears down plugins and the selection model, releases every node
    /// and hands back the data provider and host.
    pub fn destroy(mut self) -> (D, H) {
        self.events.before_destroy.notify(&());
        let ids: Vec<PluginId> = self.plugins.iter().map(|(id, _)| *id).collect();
        for id in ids.into_iter().rev() {
            self.unregister_plugin(id);
        }
        if let Some(mut model) = self.selection_model.take() {
            model.destroy();
        }
        self.wheel_row = None;
        self.invalidate_all_rows();
        if let Some(zombie) = self.zombie_row.take() {
            self.host.remove_row(zombie);
        }
        (self.data, self.host)
    }
}

impl<D: DataProvider, H: RenderHost> core::fmt::Debug for Grid<D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.data.len())
            .field("columns", &self.layout.len())
            .field("viewport", &(self.viewport_w, self.viewport_h))
            .field("scroll_top", &self.scroll_top)
            .field("scroll_left", &self.scroll_left)
            .field("page", &self.page)
            .field("offset", &self.offset)
            .field("cached_rows", &self.rows.len())
            .field("active", &self.active.map(|a| a.pos()))
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
