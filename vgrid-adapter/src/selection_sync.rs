use std::cell::Cell;
use std::rc::Rc;

use vgrid::{Event, Grid, GridKey, Record, RenderHost, SubscriptionId};

use crate::DataView;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectedRowIdsChangedArgs<Id> {
    pub ids: Vec<Id>,
}

/// Keeps a grid's row selection attached to item ids while a [`DataView`] changes underneath.
///
/// `attach` subscribes to the grid's `selected_rows_changed` and to the view's change events,
/// which only raise flags. [`SelectionSync::sync`] does the work; call it after each batch of
/// user input or data mutation.
///
/// - When the user changes the selection, the selected ids are recomputed from the selected
///   rows. With `preserve_hidden_on_selection_change` (and `multi_select` on the grid), ids that
///   currently have no row stay selected.
/// - When the data changes, the selected ids are mapped back to rows and re-selected. Without
///   `preserve_hidden`, ids that lost their row are dropped.
#[derive(Debug)]
pub struct SelectionSync<Id> {
    selected_ids: Vec<Id>,
    preserve_hidden: bool,
    preserve_hidden_on_selection_change: bool,
    selection_dirty: Rc<Cell<bool>>,
    data_dirty: Rc<Cell<bool>>,
    in_handler: Rc<Cell<bool>>,
    subscriptions: [SubscriptionId; 3],
    pub on_selected_row_ids_changed: Event<SelectedRowIdsChangedArgs<Id>>,
}

impl<Id: GridKey + 'static> SelectionSync<Id> {
    /// Starts tracking the grid's current selection.
    ///
    /// Fails with `SelectionModelMissing` if the grid has no selection model.
    pub fn attach<T, H>(
        grid: &mut Grid<DataView<T>, H>,
        preserve_hidden: bool,
        preserve_hidden_on_selection_change: bool,
    ) -> vgrid::Result<Self>
    where
        T: Record<Id = Id>,
        H: RenderHost,
    {
        let rows = grid.selected_rows()?.to_vec();
        let selected_ids = grid.data().map_rows_to_ids(&rows);

        let selection_dirty = Rc::new(Cell::new(false));
        let data_dirty = Rc::new(Cell::new(false));
        let in_handler = Rc::new(Cell::new(false));

        let (flag, guard) = (selection_dirty.clone(), in_handler.clone());
        let selection_sub = grid.events.selected_rows_changed.subscribe(move |_, _| {
            if !guard.get() {
                flag.set(true);
            }
        });
        let flag = data_dirty.clone();
        let rows_sub = grid
            .data_mut()
            .on_rows_changed
            .subscribe(move |_, _| flag.set(true));
        let flag = data_dirty.clone();
        let count_sub = grid
            .data_mut()
            .on_row_count_changed
            .subscribe(move |_, _| flag.set(true));

        vdebug!(
            selected = selected_ids.len(),
            preserve_hidden,
            preserve_hidden_on_selection_change,
            "SelectionSync::attach"
        );
        Ok(Self {
            selected_ids,
            preserve_hidden,
            preserve_hidden_on_selection_change,
            selection_dirty,
            data_dirty,
            in_handler,
            subscriptions: [selection_sub, rows_sub, count_sub],
            on_selected_row_ids_changed: Event::new(),
        })
    }

    pub fn selected_ids(&self) -> &[Id] {
        &self.selected_ids
    }

    /// True when a selection or data change is waiting for [`SelectionSync::sync`].
    pub fn is_dirty(&self) -> bool {
        self.selection_dirty.get() || self.data_dirty.get()
    }

    /// Applies the changes seen since the last call: first the user's selection, then data.
    pub fn sync<T, H>(&mut self, grid: &mut Grid<DataView<T>, H>) -> vgrid::Result<()>
    where
        T: Record<Id = Id>,
        H: RenderHost,
    {
        if self.selection_dirty.replace(false) {
            self.selection_changed(grid)?;
        }
        if self.data_dirty.replace(false) {
            self.data_changed(grid)?;
        }
        Ok(())
    }

    fn selection_changed<T, H>(&mut self, grid: &Grid<DataView<T>, H>) -> vgrid::Result<()>
    where
        T: Record<Id = Id>,
        H: RenderHost,
    {
        let view = grid.data();
        let picked = view.map_rows_to_ids(grid.selected_rows()?);
        let ids = if self.preserve_hidden_on_selection_change && grid.options().multi_select {
            let mut ids: Vec<Id> = self
                .selected_ids
                .iter()
                .filter(|id| view.row_by_id(id).is_none())
                .cloned()
                .collect();
            ids.extend(picked);
            ids
        } else {
            picked
        };
        self.set_selected_ids(ids);
        Ok(())
    }

    fn data_changed<T, H>(&mut self, grid: &mut Grid<DataView<T>, H>) -> vgrid::Result<()>
    where
        T: Record<Id = Id>,
        H: RenderHost,
    {
        if self.selected_ids.is_empty() {
            return Ok(());
        }
        let rows = grid.data().map_ids_to_rows(&self.selected_ids);
        if !self.preserve_hidden {
            let ids = grid.data().map_rows_to_ids(&rows);
            self.set_selected_ids(ids);
        }
        vtrace!(rows = rows.len(), "SelectionSync: reselecting rows");
        self.in_handler.set(true);
        let result = grid.set_selected_rows(&rows);
        self.in_handler.set(false);
        result
    }

    fn set_selected_ids(&mut self, ids: Vec<Id>) {
        if ids == self.selected_ids {
            return;
        }
        self.selected_ids = ids;
        let args = SelectedRowIdsChangedArgs {
            ids: self.selected_ids.clone(),
        };
        self.on_selected_row_ids_changed.notify(&args);
    }

    /// Removes the subscriptions made by [`SelectionSync::attach`] and returns the last
    /// selected ids.
    pub fn detach<T, H>(self, grid: &mut Grid<DataView<T>, H>) -> Vec<Id>
    where
        T: Record<Id = Id>,
        H: RenderHost,
    {
        let [selection_sub, rows_sub, count_sub] = self.subscriptions;
        grid.events.selected_rows_changed.unsubscribe(selection_sub);
        let view = grid.data_mut();
        view.on_rows_changed.unsubscribe(rows_sub);
        view.on_row_count_changed.unsubscribe(count_sub);
        self.selected_ids
    }
}
