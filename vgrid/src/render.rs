use crate::cache::RowCacheEntry;
use crate::column::FormatContext;
use crate::data::ItemId;
use crate::events::{ScrollArgs, ViewportChangedArgs};
use crate::host::{CellMarkup, RowMarkup};
use crate::paging::PageMap;
use crate::{
    CellBox, CellPos, Column, DataProvider, FrameState, Grid, ItemMetadata, NodeHandle,
    RenderHost, ScrollDirection, ScrollState, ViewportRange,
};

/// Rows rendered behind the scroll direction, and on both sides when stationary.
const MIN_BUFFER: usize = 3;

impl<D: DataProvider, H: RenderHost> Grid<D, H> {
    pub(crate) fn row_height(&self) -> i64 {
        i64::from(self.options.row_height.max(1))
    }

    pub(crate) fn visible_row_capacity(&self) -> usize {
        let rh = self.row_height();
        (self.viewport_h.max(0) + rh - 1) as usize / rh as usize
    }

    /// Top of `row` in real canvas pixels.
    pub fn row_top(&self, row: usize) -> i64 {
        row as i64 * self.row_height() - self.offset
    }

    /// Row at the real canvas position `y`.
    pub fn row_from_position(&self, y: i64) -> usize {
        ((y + self.offset) / self.row_height()).max(0) as usize
    }

    fn max_scroll_top(&self) -> i64 {
        let extra = if self.has_hscroll {
            i64::from(self.metrics.scrollbar_height)
        } else {
            0
        };
        self.pages.total_height as i64 - self.viewport_h + extra
    }

    pub fn page_map(&self) -> &PageMap {
        &self.pages
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            scroll_top: self.scroll_top,
            scroll_left: self.scroll_left,
            page: self.page,
            offset: self.offset,
            direction: self.scroll_dir,
        }
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState {
            scroll: self.scroll_state(),
            visible: self.visible_range(),
            rendered: self.rendered_range(),
        }
    }

    pub fn has_vertical_scrollbar(&self) -> bool {
        self.has_vscroll
    }

    pub fn has_horizontal_scrollbar(&self) -> bool {
        self.has_hscroll
    }

    pub fn canvas_width(&self) -> i64 {
        self.canvas_width
    }

    pub fn num_visible_rows(&self) -> usize {
        self.num_visible_rows
    }

    // Ranges

    pub fn visible_range(&self) -> ViewportRange {
        self.visible_range_at(self.scroll_top, self.scroll_left)
    }

    pub(crate) fn visible_range_at(&self, top: i64, left: i64) -> ViewportRange {
        let rh = self.row_height();
        let virtual_top = (top + self.offset).max(0);
        ViewportRange {
            top: (virtual_top / rh) as usize,
            bottom: ((virtual_top + self.viewport_h.max(0)) / rh) as usize + 1,
            left_px: left,
            right_px: left + self.viewport_w,
        }
    }

    /// The visible range plus the render buffer, clamped to the data and the canvas.
    pub fn rendered_range(&self) -> ViewportRange {
        let mut range = self.visible_range();
        let buffer = (self.viewport_h as f64 / self.row_height() as f64).round() as usize;
        match self.scroll_dir {
            Some(ScrollDirection::Backward) => {
                range.top = range.top.saturating_sub(buffer);
                range.bottom += MIN_BUFFER;
            }
            Some(ScrollDirection::Forward) => {
                range.top = range.top.saturating_sub(MIN_BUFFER);
                range.bottom += buffer;
            }
            None => {
                range.top = range.top.saturating_sub(MIN_BUFFER);
                range.bottom += MIN_BUFFER;
            }
        }
        range.bottom = range.bottom.min(self.data.len().saturating_sub(1));
        range.top = range.top.min(range.bottom);
        range.left_px = (range.left_px - self.viewport_w).max(0);
        range.right_px = (range.right_px + self.viewport_w).min(self.canvas_width);
        range
    }

    // Reconciliation

    /// Brings the row cache in line with the rendered range.
    pub fn render(&mut self) {
        let range = self.rendered_range();
        self.cleanup_rows(&range);
        if self.cells_stale || self.last_rendered_scroll_left != self.scroll_left {
            self.cleanup_and_render_cells(&range);
        }
        self.render_rows(&range);

        self.last_rendered_scroll_top = self.scroll_top;
        self.last_rendered_scroll_left = self.scroll_left;
        self.cells_stale = false;
        self.pending_render_at = None;
        vtrace!(
            top = range.top,
            bottom = range.bottom,
            cached = self.rows.len(),
            "Grid::render"
        );
    }

    /// Drops cached rows outside `keep`, except the active row. Rows whose id no longer
    /// resolves are dropped too.
    pub(crate) fn cleanup_rows(&mut self, keep: &ViewportRange) {
        if self.rows.is_empty() {
            return;
        }
        let active_row = self.active.map(|a| a.row);
        let len = self.data.len();
        let stale: Vec<ItemId<D>> = self
            .rows
            .ids()
            .filter(|id| match self.data.index_of_id(id) {
                Some(row) if Some(row) == active_row => false,
                Some(row) => row >= len || !keep.contains_row(row),
                None => true,
            })
            .cloned()
            .collect();
        for id in stale {
            self.remove_row_from_cache(&id);
        }
    }

    pub(crate) fn remove_row_from_cache(&mut self, id: &ItemId<D>) {
        let Some(entry) = self.rows.remove(id) else {
            return;
        };
        if let Some(active) = self.active.as_mut() {
            if active
                .node
                .is_some_and(|n| entry.cell_nodes.values().any(|c| c.node == n))
            {
                active.node = None;
            }
        }
        if self.wheel_row == Some(entry.row_node) {
            if let Some(zombie) = self.zombie_row.filter(|z| *z != entry.row_node) {
                self.host.remove_row(zombie);
            }
            self.host.hide_row(entry.row_node);
            self.zombie_row = Some(entry.row_node);
        } else {
            self.host.remove_row(entry.row_node);
        }
    }

    fn cleanup_and_render_cells(&mut self, range: &ViewportRange) {
        let columns = self.layout.len();
        if columns == 0 {
            return;
        }
        for row in range.rows(self.data.len()) {
            let Some(id) = self.data.id_at(row) else {
                continue;
            };
            let Some(entry) = self.rows.get(&id) else {
                continue;
            };
            let row_node = entry.row_node;
            let active = self.active.filter(|a| a.row == row).map(|a| a.cell);

            let stale: Vec<(usize, NodeHandle)> = entry
                .cell_nodes
                .iter()
                .filter(|&(&col, cell)| {
                    let end = (col + cell.colspan.max(1) - 1).min(columns - 1);
                    active != Some(col)
                        && (self.layout.pos_left(col) > range.right_px
                            || self.layout.pos_right(end) < range.left_px)
                })
                .map(|(&col, cell)| (col, cell.node))
                .collect();
            for &(_, node) in &stale {
                self.host.remove_cell(row_node, node);
            }

            let meta = self.data.item_metadata(row);
            let mut cells = Vec::new();
            if let Some(entry) = self.rows.get_mut(&id) {
                for (col, _) in &stale {
                    entry.cell_nodes.remove(col);
                }
            }
            if let Some(entry) = self.rows.get(&id) {
                let mut i = 0;
                while i < columns {
                    if self.layout.pos_left(i) > range.right_px {
                        break;
                    }
                    if let Some(existing) = entry.cell_nodes.get(&i) {
                        i += existing.colspan.max(1);
                        continue;
                    }
                    let span = self.colspan_at(meta.as_ref(), i);
                    let end = (i + span - 1).min(columns - 1);
                    if self.layout.pos_right(end) > range.left_px {
                        cells.push(self.cell_markup(row, i, span, meta.as_ref()));
                    }
                    i += span;
                }
            }
            vtrace!(
                row,
                removed = stale.len(),
                added = cells.len(),
                "Grid::cleanup_and_render_cells"
            );
            if cells.is_empty() {
                continue;
            }

            let handles = self.host.attach_cells(row_node, &cells);
            if let Some(entry) = self.rows.get_mut(&id) {
                entry.cell_render_queue = cells.iter().map(|c| c.column).collect();
                let spans: Vec<usize> = cells.iter().map(|c| c.colspan).collect();
                entry.resolve_queue(&handles, &spans);
            }
        }
    }

    fn render_rows(&mut self, range: &ViewportRange) {
        let mut markups = Vec::new();
        let mut ids = Vec::new();
        let mut reselect = false;
        for row in range.rows(self.data.len()) {
            let Some(id) = self.data.id_at(row) else {
                continue;
            };
            if self.rows.contains(&id) {
                continue;
            }
            if self.active.is_some_and(|a| a.row == row) {
                reselect = true;
            }
            markups.push(self.row_markup(row, range));
            ids.push(id);
        }
        if markups.is_empty() {
            return;
        }

        let rendered = self.host.attach_rows(&markups);
        for ((id, markup), handles) in ids.into_iter().zip(&markups).zip(rendered) {
            let mut entry = RowCacheEntry::new(handles.node);
            entry.cell_render_queue = markup.cells.iter().map(|c| c.column).collect();
            let spans: Vec<usize> = markup.cells.iter().map(|c| c.colspan).collect();
            entry.resolve_queue(&handles.cells, &spans);
            self.rows.insert(id, entry);
        }

        if reselect {
            self.reresolve_active_node();
        }
    }

    /// Looks the active cell's node up again and restores the host's active flags on it.
    pub(crate) fn reresolve_active_node(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let node = self.cell_node(active.row, active.cell);
        if let Some(a) = self.active.as_mut() {
            a.node = node;
        }
        if let Some(row_node) = self.row_node(active.row) {
            self.host.set_row_active(row_node, true);
        }
        if let Some(node) = node {
            if self.options.enable_cell_navigation {
                self.host.set_cell_active(node, true);
            }
        }
    }

    // Markup

    pub(crate) fn colspan_at(&self, meta: Option<&ItemMetadata>, cell: usize) -> usize {
        let Some(column) = self.layout.column(cell) else {
            return 1;
        };
        meta.and_then(|m| m.column(&column.id, cell))
            .and_then(|c| c.colspan)
            .map_or(1, |span| span.resolve(cell, self.layout.len()))
    }

    fn row_markup(&self, row: usize, range: &ViewportRange) -> RowMarkup {
        let meta = self.data.item_metadata(row);
        let mut css = String::from("vgrid-row");
        if self.active.is_some_and(|a| a.row == row) {
            css.push_str(" active");
        }
        if self.data.item(row).is_none() {
            css.push(' ');
            css.push_str(&self.options.add_new_row_css_class);
        }
        if let Some(extra) = meta.as_ref().and_then(|m| m.css_classes.as_deref()) {
            css.push(' ');
            css.push_str(extra);
        }

        let columns = self.layout.len();
        let mut cells = Vec::new();
        let mut i = 0;
        while i < columns {
            let span = self.colspan_at(meta.as_ref(), i);
            let end = (i + span - 1).min(columns - 1);
            if self.layout.pos_right(end) > range.left_px {
                if self.layout.pos_left(i) > range.right_px {
                    break;
                }
                cells.push(self.cell_markup(row, i, span, meta.as_ref()));
            }
            i += span;
        }

        RowMarkup {
            row,
            css,
            top: self.row_top(row),
            cells,
        }
    }

    fn cell_markup(
        &self,
        row: usize,
        cell: usize,
        colspan: usize,
        meta: Option<&ItemMetadata>,
    ) -> CellMarkup {
        let columns = self.layout.columns();
        let column = &columns[cell];
        let end = (cell + colspan - 1).min(columns.len() - 1);
        let mut css = format!("vgrid-cell l{cell} r{end}");
        if let Some(class) = &column.css_class {
            css.push(' ');
            css.push_str(class);
        }
        if self
            .active
            .is_some_and(|a| a.row == row && a.cell == cell)
        {
            css.push_str(" active");
        }
        for hash in self.cell_css_classes.values() {
            if let Some(class) = hash.get(&row).and_then(|m| m.get(&column.id)) {
                css.push(' ');
                css.push_str(class);
            }
        }
        CellMarkup {
            column: cell,
            colspan,
            css,
            html: self.format_cell(row, cell, column, meta),
        }
    }

    /// Formatter precedence: column metadata, row metadata, column, factory, default.
    fn format_cell(
        &self,
        row: usize,
        cell: usize,
        column: &Column,
        meta: Option<&ItemMetadata>,
    ) -> String {
        let Some(item) = self.data.item(row) else {
            return String::new();
        };
        let value = crate::Record::value(item, &column.field);
        let ctx = FormatContext {
            row,
            cell,
            value: value.as_deref(),
            column,
        };
        let own = meta
            .and_then(|m| m.column(&column.id, cell))
            .and_then(|c| c.formatter.as_ref())
            .or_else(|| meta.and_then(|m| m.formatter.as_ref()))
            .or(column.formatter.as_ref());
        if let Some(f) = own {
            return f(&ctx);
        }
        if let Some(f) = self
            .options
            .formatter_factory
            .as_ref()
            .and_then(|factory| factory(column))
        {
            return f(&ctx);
        }
        (self.options.default_formatter)(&ctx)
    }

    // Invalidation

    /// Recounts rows, drops every cached row and renders from scratch.
    pub fn invalidate(&mut self) {
        self.update_row_count();
        self.invalidate_all_rows();
        self.render();
    }

    pub fn invalidate_all_rows(&mut self) {
        let ids: Vec<ItemId<D>> = self.rows.ids().cloned().collect();
        for id in ids {
            self.remove_row_from_cache(&id);
        }
    }

    /// Drops the given rows from the cache. They are rebuilt by the next [`Grid::render`].
    pub fn invalidate_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        self.scroll_dir = None;
        vtrace!(requested = rows.len(), "Grid::invalidate_rows");
        for &row in rows {
            let Some(id) = self.data.id_at(row) else {
                continue;
            };
            if self.rows.contains(&id) {
                self.remove_row_from_cache(&id);
            }
        }
    }

    pub fn invalidate_row(&mut self, row: usize) {
        self.invalidate_rows(&[row]);
    }

    /// Re-formats one rendered cell in place.
    pub fn update_cell(&mut self, row: usize, cell: usize) {
        let Some(node) = self.cell_node(row, cell) else {
            return;
        };
        let Some(column) = self.layout.column(cell) else {
            return;
        };
        let meta = self.data.item_metadata(row);
        let html = self.format_cell(row, cell, column, meta.as_ref());
        self.host.set_cell_html(node, &html);
    }

    /// Re-formats every rendered cell of `row` in place.
    pub fn update_row(&mut self, row: usize) {
        let Some(entry) = self.data.id_at(row).and_then(|id| self.rows.get(&id)) else {
            return;
        };
        let meta = self.data.item_metadata(row);
        let updates: Vec<(NodeHandle, String)> = entry
            .cell_nodes
            .iter()
            .filter_map(|(&col, cell)| {
                let column = self.layout.column(col)?;
                Some((cell.node, self.format_cell(row, col, column, meta.as_ref())))
            })
            .collect();
        for (node, html) in updates {
            self.host.set_cell_html(node, &html);
        }
    }

    // Geometry

    /// Re-reads the viewport, recounts rows and re-renders every cell.
    pub fn resize_canvas(&mut self) {
        match self.host.viewport_size() {
            Some(size) => {
                self.viewport_w = i64::from(size.width);
                self.viewport_h = i64::from(size.height);
            }
            None => {
                vwarn!("Grid::resize_canvas: viewport unavailable, keeping the previous size");
            }
        }
        self.num_visible_rows = self.visible_row_capacity();
        if self.options.force_fit_columns {
            self.autosize_columns();
        }
        self.update_row_count();
        self.fire_scroll();
        self.cells_stale = true;
        self.render();
    }

    /// Re-syncs scrollbars, canvas height and the scroll position with the data length.
    pub fn update_row_count(&mut self) {
        let len = self.data.len();
        let rh = self.row_height();
        let had_vscroll = self.has_vscroll;
        self.has_vscroll = (len as i64).saturating_mul(rh) > self.viewport_h;

        let stale: Vec<ItemId<D>> = self
            .rows
            .ids()
            .filter(|id| self.data.index_of_id(id).is_none_or(|row| row >= len))
            .cloned()
            .collect();
        for id in stale {
            self.remove_row_from_cache(&id);
        }
        if self.active.is_some_and(|a| a.row >= len) {
            self.reset_active_cell();
        }

        let old_height = self.pages.height;
        self.pages = PageMap::compute(
            len,
            self.options.row_height.max(1),
            self.viewport_h.max(0) as u32,
            &self.metrics,
            self.options.virtual_paging,
        );
        if self.pages.height != old_height {
            self.host.set_canvas_height(self.pages.height);
            let max_real = (self.pages.height as i64 - self.viewport_h).max(0);
            self.scroll_top = self.scroll_top.clamp(0, max_real);
        }

        let total = self.pages.total_height as i64;
        let in_range = self.scroll_top + self.offset <= total - self.viewport_h;
        if total == 0 || self.scroll_top == 0 {
            let old_offset = self.offset;
            self.page = 0;
            self.offset = 0;
            if old_offset != 0 {
                self.update_row_positions();
            }
        } else if in_range {
            self.scroll_to(self.scroll_top + self.offset);
        } else {
            self.scroll_to(total - self.viewport_h);
        }

        if self.options.force_fit_columns && had_vscroll != self.has_vscroll {
            self.autosize_columns();
        }
        self.update_canvas_width(false);
        vdebug!(
            rows = len,
            pages = self.pages.pages,
            height = self.pages.height,
            "Grid::update_row_count"
        );
    }

    pub(crate) fn update_canvas_width(&mut self, force: bool) {
        let old = self.canvas_width;
        let total = self.layout.total_width();
        self.canvas_width = if self.options.full_width_rows {
            total.max(self.available_width())
        } else {
            total
        };
        let changed = self.canvas_width != old;
        if changed {
            self.host.set_canvas_width(self.canvas_width);
            self.has_hscroll =
                self.canvas_width > self.viewport_w - i64::from(self.metrics.scrollbar_width);
        }
        if changed || force {
            self.apply_column_widths();
        }
    }

    fn update_row_positions(&mut self) {
        let moves: Vec<(NodeHandle, i64)> = self
            .rows
            .iter()
            .filter_map(|(id, entry)| {
                let row = self.data.index_of_id(id)?;
                Some((entry.row_node, self.row_top(row)))
            })
            .collect();
        for (node, top) in moves {
            self.host.set_row_top(node, top);
        }
    }

    // Scrolling

    /// Scrolls to the virtual offset `y`, switching pages as needed. Does not render.
    pub fn scroll_to(&mut self, y: i64) {
        let y = y.min(self.max_scroll_top()).max(0);
        let old_offset = self.offset;
        self.page = self.pages.page_at(y);
        self.offset = self.pages.offset_of(self.page);
        let new_top = y - self.offset;

        if self.offset != old_offset {
            vtrace!(page = self.page, offset = self.offset, "Grid::scroll_to page switch");
            let range = self.visible_range_at(new_top, self.scroll_left);
            self.cleanup_rows(&range);
            self.update_row_positions();
        }

        if self.prev_scroll_top != new_top {
            self.scroll_dir = Some(if self.prev_scroll_top + old_offset < new_top + self.offset {
                ScrollDirection::Forward
            } else {
                ScrollDirection::Backward
            });
            self.scroll_top = new_top;
            self.prev_scroll_top = new_top;
            self.last_rendered_scroll_top = new_top;
            self.host.set_scroll_top(new_top);
            self.fire_viewport_changed();
        }
    }

    /// Feeds a scroll position reported by the host.
    ///
    /// Small moves render right away; jumps of a viewport or more are deferred until
    /// [`Grid::tick`] reaches `now_ms + async_render_delay_ms`.
    pub fn handle_scroll(&mut self, scroll_top: i64, scroll_left: i64, now_ms: u64) {
        self.scroll_top = scroll_top;
        self.scroll_left = scroll_left;
        let v_dist = (scroll_top - self.prev_scroll_top).abs();
        let h_dist = (scroll_left - self.prev_scroll_left).abs();

        if h_dist > 0 {
            self.prev_scroll_left = scroll_left;
            self.host.set_header_scroll_left(scroll_left);
        }

        if v_dist > 0 {
            self.scroll_dir = Some(if self.prev_scroll_top < scroll_top {
                ScrollDirection::Forward
            } else {
                ScrollDirection::Backward
            });
            self.prev_scroll_top = scroll_top;

            if v_dist < self.viewport_h {
                self.scroll_to(scroll_top + self.offset);
            } else {
                let old_offset = self.offset;
                self.page = self.pages.page_at_real(scroll_top, self.viewport_h);
                self.offset = self.pages.offset_of(self.page);
                if old_offset != self.offset {
                    vtrace!(page = self.page, "Grid::handle_scroll jump");
                    self.invalidate_all_rows();
                }
            }
        }

        if h_dist > 0 || v_dist > 0 {
            self.pending_render_at = None;
            let dt = (self.last_rendered_scroll_top - self.scroll_top).abs();
            let dl = (self.last_rendered_scroll_left - self.scroll_left).abs();
            let threshold = self.options.scroll_render_threshold_px;
            if dt > threshold || dl > threshold {
                if self.options.force_sync_scrolling
                    || (dt < self.viewport_h && dl < self.viewport_w)
                {
                    self.render();
                } else {
                    self.pending_render_at =
                        Some(now_ms.saturating_add(self.options.async_render_delay_ms));
                }
                self.fire_viewport_changed();
            }
        }

        self.fire_scroll();
    }

    /// Runs a deferred render once it is due. Returns whether a render happened.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.pending_render_at {
            Some(due) if now_ms >= due => {
                self.render();
                true
            }
            _ => false,
        }
    }

    pub fn has_pending_render(&self) -> bool {
        self.pending_render_at.is_some()
    }

    /// Records the row node under the mouse wheel so it survives until the wheel moves on.
    pub fn handle_mouse_wheel(&mut self, row_node: Option<NodeHandle>) {
        if row_node == self.wheel_row {
            return;
        }
        if let Some(zombie) = self.zombie_row.filter(|z| Some(*z) != row_node) {
            self.host.remove_row(zombie);
            self.zombie_row = None;
        }
        self.wheel_row = row_node;
    }

    pub fn scroll_row_to_top(&mut self, row: usize) {
        self.scroll_to(row as i64 * self.row_height());
        self.render();
    }

    /// Scrolls just enough to show `row`. With `do_paging` the row lands on the far edge, as
    /// after a page move.
    pub fn scroll_row_into_view(&mut self, row: usize, do_paging: bool) {
        let rh = self.row_height();
        let extra = if self.has_hscroll {
            i64::from(self.metrics.scrollbar_height)
        } else {
            0
        };
        let at_top = row as i64 * rh;
        let at_bottom = (row as i64 + 1) * rh - self.viewport_h + extra;
        let virtual_top = self.scroll_top + self.offset;

        if (row as i64 + 1) * rh > virtual_top + self.viewport_h {
            self.scroll_to(if do_paging { at_top } else { at_bottom });
            self.render();
        } else if at_top < virtual_top {
            self.scroll_to(if do_paging { at_bottom } else { at_top });
            self.render();
        }
    }

    pub fn scroll_cell_into_view(&mut self, row: usize, cell: usize, do_paging: bool) {
        self.scroll_row_into_view(row, do_paging);
        if cell >= self.layout.len() {
            return;
        }
        let meta = self.data.item_metadata(row);
        let span = self.colspan_at(meta.as_ref(), cell);
        let left = self.layout.pos_left(cell);
        let right = self.layout.pos_right(cell + span - 1);
        let scroll_right = self.scroll_left + self.viewport_w;
        if left < self.scroll_left {
            self.set_scroll_left(left);
        } else if right > scroll_right {
            self.set_scroll_left(left.min(right - self.available_width()));
        }
    }

    fn set_scroll_left(&mut self, left: i64) {
        let left = left.max(0);
        self.host.set_scroll_left(left);
        self.host.set_header_scroll_left(left);
        self.scroll_left = left;
        self.prev_scroll_left = left;
        self.render();
        self.fire_scroll();
    }

    fn fire_scroll(&mut self) {
        let args = ScrollArgs {
            scroll_top: self.scroll_top,
            scroll_left: self.scroll_left,
        };
        self.events.scroll.notify(&args);
    }

    fn fire_viewport_changed(&mut self) {
        let args = ViewportChangedArgs {
            visible: self.visible_range(),
        };
        self.events.viewport_changed.notify(&args);
    }

    // Node lookups

    pub fn row_node(&self, row: usize) -> Option<NodeHandle> {
        let id = self.data.id_at(row)?;
        self.rows.get(&id).map(|e| e.row_node)
    }

    /// Node of the cell that starts at `cell`. Columns covered by a span have no node.
    pub fn cell_node(&self, row: usize, cell: usize) -> Option<NodeHandle> {
        let id = self.data.id_at(row)?;
        self.rows.get(&id)?.cell_nodes.get(&cell).map(|c| c.node)
    }

    /// Current row indexes of every cached row, ascending.
    pub fn cached_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .rows
            .ids()
            .filter_map(|id| self.data.index_of_id(id))
            .collect();
        rows.sort_unstable();
        rows
    }

    pub fn cached_row_count(&self) -> usize {
        self.rows.len()
    }

    /// Maps host nodes back to a logical cell.
    pub fn cell_from_nodes(&self, row_node: NodeHandle, cell_node: NodeHandle) -> Option<CellPos> {
        let id = self.rows.find_by_row_node(row_node)?;
        let row = self.data.index_of_id(id)?;
        let entry = self.rows.get(id)?;
        entry
            .cell_nodes
            .iter()
            .find(|(_, c)| c.node == cell_node)
            .map(|(&cell, _)| CellPos::new(row, cell))
    }

    /// Cell under the canvas point `(x, y)`, `y` in real canvas pixels.
    pub fn cell_from_point(&self, x: i64, y: i64) -> Option<CellPos> {
        if x < 0 || y < 0 {
            return None;
        }
        let row = self.row_from_position(y);
        if row >= self.data.len() {
            return None;
        }
        (0..self.layout.len())
            .find(|&i| x >= self.layout.pos_left(i) && x < self.layout.pos_right(i))
            .map(|cell| CellPos::new(row, cell))
    }

    /// Box of a cell in real canvas pixels.
    pub fn cell_node_box(&self, row: usize, cell: usize) -> Option<CellBox> {
        if row >= self.data.len() || cell >= self.layout.len() {
            return None;
        }
        let top = self.row_top(row);
        Some(CellBox {
            top,
            left: self.layout.pos_left(cell),
            bottom: top + self.row_height() - 1,
            right: self.layout.pos_right(cell),
        })
    }
}
