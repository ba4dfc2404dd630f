use crate::event::EventData;
use crate::events::{ActiveCellChangedArgs, CellArgs, HeaderArgs, KeyDownArgs};
use crate::grid::ActiveCell;
use crate::layout::ReorderItem;
use crate::navigation::{self, FocusGrid, StepTarget};
use crate::sort::{self, SortMode};
use crate::{
    CellPos, DataProvider, Grid, Key, Modifiers, Navigation, NodeHandle, RenderHost,
};

impl<D: DataProvider, H: RenderHost> Grid<D, H> {
    // Active cell

    pub fn active_cell(&self) -> Option<CellPos> {
        self.active.map(|a| a.pos())
    }

    pub fn active_cell_node(&self) -> Option<NodeHandle> {
        self.active.and_then(|a| a.node)
    }

    /// Column remembered for vertical moves.
    pub fn active_pos_x(&self) -> Option<usize> {
        self.active.map(|a| a.pos_x)
    }

    /// Scrolls the cell into view and makes it active. Ignored when row navigation is off or
    /// the position is out of bounds.
    pub fn set_active_cell(&mut self, row: usize, cell: usize) {
        if row >= self.data.len() || cell >= self.layout.len() {
            return;
        }
        if !self.options.enable_row_navigation {
            return;
        }
        self.scroll_cell_into_view(row, cell, false);
        self.set_active_cell_internal(Some(CellPos::new(row, cell)));
    }

    pub fn reset_active_cell(&mut self) {
        self.set_active_cell_internal(None);
    }

    /// Like [`Grid::set_active_cell`] for focusable cells, and also moves keyboard focus to the
    /// grid.
    pub fn goto_cell(&mut self, row: usize, cell: usize) {
        if !self.can_cell_be_active(row, cell) {
            return;
        }
        self.scroll_cell_into_view(row, cell, false);
        self.set_active_cell_internal(Some(CellPos::new(row, cell)));
        self.focus();
    }

    /// Fires `active_cell_position_changed`, e.g. after the host moved the active cell's box.
    pub fn handle_active_cell_position_change(&mut self) {
        if self.active.is_some() {
            self.events.active_cell_position_changed.notify(&());
        }
    }

    pub(crate) fn set_active_cell_internal(&mut self, pos: Option<CellPos>) {
        if let Some(old) = self.active {
            if let Some(node) = old.node {
                self.host.set_cell_active(node, false);
            }
            if let Some(row_node) = self.row_node(old.row) {
                self.host.set_row_active(row_node, false);
            }
        }

        let previous = self.active_cell();
        self.active = pos.map(|p| ActiveCell {
            row: p.row,
            cell: p.cell,
            pos_x: p.cell,
            node: self.cell_node(p.row, p.cell),
        });

        if let Some(active) = self.active {
            if let Some(node) = active.node {
                if self.options.enable_row_navigation && self.options.enable_cell_navigation {
                    self.host.set_cell_active(node, true);
                }
            }
            if let Some(row_node) = self.row_node(active.row) {
                self.host.set_row_active(row_node, true);
            }
        }

        if previous != pos {
            vtrace!(?pos, "Grid::active_cell_changed");
            let args = ActiveCellChangedArgs { active: pos };
            self.events.active_cell_changed.notify(&args);
            self.notify_selection_model_active();
        }
    }

    fn focus(&mut self) {
        let sink = self.tabbing;
        self.host.focus(sink);
    }

    // Focusability

    /// Per-cell metadata wins over row metadata, which wins over the column definition.
    pub fn can_cell_be_active(&self, row: usize, cell: usize) -> bool {
        let Some(column) = self.cell_column(row, cell) else {
            return false;
        };
        let meta = self.data.item_metadata(row);
        meta.as_ref()
            .and_then(|m| m.column(&column.id, cell))
            .and_then(|c| c.focusable)
            .or_else(|| meta.as_ref().and_then(|m| m.focusable))
            .unwrap_or(column.focusable)
    }

    pub fn can_cell_be_selected(&self, row: usize, cell: usize) -> bool {
        let Some(column) = self.cell_column(row, cell) else {
            return false;
        };
        let meta = self.data.item_metadata(row);
        meta.as_ref()
            .and_then(|m| m.column(&column.id, cell))
            .and_then(|c| c.selectable)
            .or_else(|| meta.as_ref().and_then(|m| m.selectable))
            .unwrap_or(column.selectable)
    }

    fn cell_column(&self, row: usize, cell: usize) -> Option<&crate::Column> {
        if row >= self.data.len() {
            return None;
        }
        self.layout.column(cell)
    }

    // Navigation

    /// Moves the active cell. Returns `false` when the move is disabled or finds no target; the
    /// active position is then left where it was.
    pub fn navigate(&mut self, dir: Navigation) -> bool {
        match dir {
            Navigation::PageUp => {
                self.scroll_page(-1);
                return true;
            }
            Navigation::PageDown => {
                self.scroll_page(1);
                return true;
            }
            _ => {}
        }

        if !self.options.enable_row_navigation {
            return false;
        }
        let active = self.active;
        if active.is_none() && !matches!(dir, Navigation::Prev | Navigation::Next) {
            return false;
        }
        let cell_nav = self.options.enable_cell_navigation;
        if !cell_nav && matches!(dir, Navigation::Left | Navigation::Right) {
            return false;
        }

        self.tabbing = dir.focus_sink();
        self.focus();

        let from = active.map(|a| (a.row, a.cell));
        let target: Option<StepTarget> = match (dir, active) {
            (Navigation::Up, Some(a)) => navigation::goto_up(&*self, a.row, a.pos_x),
            (Navigation::Down, Some(a)) => navigation::goto_down(&*self, a.row, a.pos_x),
            (Navigation::Left, Some(a)) => navigation::goto_left(&*self, a.row, a.cell),
            (Navigation::Right, Some(a)) => navigation::goto_right(&*self, a.row, a.cell),
            (Navigation::Prev, _) if cell_nav => navigation::goto_prev(&*self, from),
            (Navigation::Next, _) if cell_nav => navigation::goto_next(&*self, from),
            (Navigation::Prev, Some(a)) => navigation::goto_up(&*self, a.row, a.pos_x),
            (Navigation::Next, Some(a)) => navigation::goto_down(&*self, a.row, a.pos_x),
            _ => None,
        };

        match target {
            Some(t) => {
                self.scroll_cell_into_view(t.row, t.cell, false);
                self.set_active_cell_internal(Some(CellPos::new(t.row, t.cell)));
                if let Some(a) = self.active.as_mut() {
                    a.pos_x = t.pos_x;
                }
                true
            }
            None => {
                let pos_x = self.active_pos_x();
                self.set_active_cell_internal(self.active_cell());
                if let (Some(a), Some(pos_x)) = (self.active.as_mut(), pos_x) {
                    a.pos_x = pos_x;
                }
                false
            }
        }
    }

    pub fn navigate_up(&mut self) -> bool {
        self.navigate(Navigation::Up)
    }

    pub fn navigate_down(&mut self) -> bool {
        self.navigate(Navigation::Down)
    }

    pub fn navigate_left(&mut self) -> bool {
        self.navigate(Navigation::Left)
    }

    pub fn navigate_right(&mut self) -> bool {
        self.navigate(Navigation::Right)
    }

    pub fn navigate_prev(&mut self) -> bool {
        self.navigate(Navigation::Prev)
    }

    pub fn navigate_next(&mut self) -> bool {
        self.navigate(Navigation::Next)
    }

    pub fn navigate_page_up(&mut self) {
        self.navigate(Navigation::PageUp);
    }

    pub fn navigate_page_down(&mut self) {
        self.navigate(Navigation::PageDown);
    }

    /// Scrolls one viewport of rows and drags the active row along, keeping `pos_x`.
    fn scroll_page(&mut self, dir: i64) {
        let delta = dir * self.num_visible_rows as i64;
        let top_row = self.row_from_position(self.scroll_top) as i64;
        self.scroll_to((top_row + delta) * self.row_height());
        self.render();

        if !self.options.enable_row_navigation {
            return;
        }
        let Some(active) = self.active else {
            return;
        };
        let len = self.data.len();
        if len == 0 {
            self.reset_active_cell();
            return;
        }
        let row = (active.row as i64 + delta).clamp(0, len as i64 - 1) as usize;
        let target = navigation::focusable_cell_at_or_before(&*self, row, active.pos_x);
        match target {
            Some(cell) => {
                self.set_active_cell_internal(Some(CellPos::new(row, cell)));
                if let Some(a) = self.active.as_mut() {
                    a.pos_x = active.pos_x;
                }
            }
            None => self.reset_active_cell(),
        }
    }

    // Input

    /// Runs the built-in key handling after `key_down` subscribers. Returns whether the key
    /// was consumed.
    pub fn handle_key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let args = KeyDownArgs {
            active: self.active_cell(),
            key,
            modifiers,
        };
        if self
            .events
            .key_down
            .notify(&args)
            .is_immediate_propagation_stopped()
        {
            return true;
        }

        if !modifiers.shift && !modifiers.alt && !modifiers.ctrl {
            match key {
                Key::PageDown => {
                    self.navigate_page_down();
                    true
                }
                Key::PageUp => {
                    self.navigate_page_up();
                    true
                }
                Key::Left => self.navigate_left(),
                Key::Right => self.navigate_right(),
                Key::Up => self.navigate_up(),
                Key::Down => self.navigate_down(),
                Key::Tab => self.navigate_next(),
                Key::Other(_) => false,
            }
        } else if key == Key::Tab && modifiers.shift && !modifiers.ctrl && !modifiers.alt {
            self.navigate_prev()
        } else {
            false
        }
    }

    /// Focuses the grid, fires `click` and, unless a handler stopped immediate propagation,
    /// activates the clicked cell.
    pub fn handle_click(&mut self, pos: CellPos) -> EventData {
        if !self.in_bounds(pos) {
            return EventData::new();
        }
        self.focus();
        let e = self.events.click.notify(&CellArgs::from(pos));
        if e.is_immediate_propagation_stopped() || !self.options.enable_row_navigation {
            return e;
        }

        let active = self.active_cell();
        let can = self.can_cell_be_active(pos.row, pos.cell);
        let new_cell = self.options.enable_cell_navigation && active != Some(pos);
        let new_row = active.map(|a| a.row) != Some(pos.row);
        if can && (new_cell || new_row) {
            self.scroll_row_into_view(pos.row, false);
            self.set_active_cell_internal(Some(pos));
        }
        e
    }

    pub fn handle_dbl_click(&mut self, pos: CellPos) -> EventData {
        self.fire_cell_event(pos, |events| &mut events.dbl_click)
    }

    pub fn handle_context_menu(&mut self, pos: CellPos) -> EventData {
        self.fire_cell_event(pos, |events| &mut events.context_menu)
    }

    pub fn handle_mouse_enter(&mut self, pos: CellPos) -> EventData {
        self.fire_cell_event(pos, |events| &mut events.mouse_enter)
    }

    pub fn handle_mouse_leave(&mut self, pos: CellPos) -> EventData {
        self.fire_cell_event(pos, |events| &mut events.mouse_leave)
    }

    fn in_bounds(&self, pos: CellPos) -> bool {
        pos.row < self.data.len() && pos.cell < self.layout.len()
    }

    fn fire_cell_event(
        &mut self,
        pos: CellPos,
        pick: impl FnOnce(&mut crate::GridEvents) -> &mut crate::Event<CellArgs>,
    ) -> EventData {
        if !self.in_bounds(pos) {
            return EventData::new();
        }
        pick(&mut self.events).notify(&CellArgs::from(pos))
    }

    /// Applies a header click to the sort order (firing `sort`), then fires
    /// `header_click`. `column` is `None` for clicks outside any header cell.
    pub fn handle_header_click(&mut self, column: Option<usize>, modifiers: Modifiers) -> EventData {
        if let Some(col) = column.and_then(|i| self.layout.column(i)) {
            let mode = SortMode {
                multi_column: self.options.multi_column_sort,
                three_steps: self.options.enable_three_steps_sorting,
            };
            let sorted = if self.resize.is_none() {
                sort::apply_header_click(&mut self.sort_columns, col, modifiers, mode)
            } else {
                None
            };
            if let Some(args) = sorted {
                vdebug!(sort_columns = self.sort_columns.len(), "Grid::handle_header_click sort");
                self.update_headers();
                self.events.sort.notify(&args);
            }
        }
        let args = self.header_args(column);
        self.events.header_click.notify(&args)
    }

    pub fn handle_header_mouse_enter(&mut self, column: Option<usize>) -> EventData {
        let args = self.header_args(column);
        self.events.header_mouse_enter.notify(&args)
    }

    pub fn handle_header_mouse_leave(&mut self, column: Option<usize>) -> EventData {
        let args = self.header_args(column);
        self.events.header_mouse_leave.notify(&args)
    }

    pub fn handle_header_context_menu(&mut self, column: Option<usize>) -> EventData {
        let args = self.header_args(column);
        self.events.header_context_menu.notify(&args)
    }

    fn header_args(&self, column: Option<usize>) -> HeaderArgs {
        HeaderArgs {
            column_id: column
                .and_then(|i| self.layout.column(i))
                .map(|c| c.id.clone()),
        }
    }

    // Column resize and reorder

    /// Starts dragging the right edge of `column`. Returns `false` if it has no resize handle.
    pub fn begin_column_resize(&mut self, column: usize, x: i64) -> bool {
        match self
            .layout
            .begin_resize(column, x, self.options.force_fit_columns)
        {
            Some(drag) => {
                vtrace!(column, x, "Grid::begin_column_resize");
                self.resize = Some(drag);
                true
            }
            None => false,
        }
    }

    pub fn drag_column_resize(&mut self, x: i64) {
        let Some(drag) = self.resize.as_ref() else {
            return;
        };
        drag.update(&mut self.layout, x);
        self.update_headers();
        if self.options.sync_column_cell_resize {
            self.apply_column_widths();
        }
    }

    /// Finishes the drag: re-renders if needed and fires `columns_resized`.
    pub fn end_column_resize(&mut self) -> bool {
        let Some(drag) = self.resize.take() else {
            return false;
        };
        let rerender = drag.finish(&self.layout);
        self.update_headers();
        if rerender {
            self.invalidate_all_rows();
        }
        self.update_canvas_width(true);
        self.cells_stale = true;
        self.render();
        self.events.columns_resized.notify(&());
        true
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Reorders top-level columns and groups. Returns `false`, changing nothing, when `order`
    /// is not a permutation of the current columns or reordering is disabled.
    pub fn reorder_columns(&mut self, order: &[ReorderItem]) -> bool {
        if !self.options.enable_column_reorder {
            return false;
        }
        let Some(columns) = self.layout.reordered(order) else {
            vdebug!("Grid::reorder_columns: order is not a permutation");
            return false;
        };
        self.commit_reorder(columns);
        true
    }

    pub fn reorder_columns_in_group(&mut self, group: usize, ids: &[String]) -> bool {
        if !self.options.enable_column_reorder {
            return false;
        }
        let Some(columns) = self.layout.reordered_in_group(group, ids) else {
            vdebug!(group, "Grid::reorder_columns_in_group: order is not a permutation");
            return false;
        };
        self.commit_reorder(columns);
        true
    }

    fn commit_reorder(&mut self, columns: Vec<crate::Column>) {
        let groups = self.layout.groups().to_vec();
        self.set_grouped_columns(columns, groups);
        self.events.columns_reordered.notify(&());
    }
}

impl<D: DataProvider, H: RenderHost> FocusGrid for Grid<D, H> {
    fn row_count(&self) -> usize {
        self.data.len()
    }

    fn column_count(&self) -> usize {
        self.layout.len()
    }

    fn can_cell_be_active(&self, row: usize, cell: usize) -> bool {
        Grid::can_cell_be_active(self, row, cell)
    }

    fn colspan(&self, row: usize, cell: usize) -> usize {
        let meta = self.data.item_metadata(row);
        self.colspan_at(meta.as_ref(), cell)
    }
}
