use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use vgrid::{
    DataNotification, DataProvider, Event, GridError, InvariantViolation, ItemMetadata, Record,
};

type Id<T> = <T as Record>::Id;

/// Orders two items for [`DataView::sort_by`].
pub type Comparer<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Supplies per-row overrides from the row index and its item.
pub type MetadataProvider<T> = Arc<dyn Fn(usize, &T) -> Option<ItemMetadata> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowCountChangedArgs {
    pub previous: usize,
    pub current: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowsChangedArgs {
    pub rows: Vec<usize>,
}

/// An ordered collection of records indexed by their id.
///
/// Mutations go to the items right away. The rows a grid sees are only recomputed by
/// [`DataView::refresh`], which every mutation calls unless updates are suspended with
/// [`DataView::begin_update`]. Each refresh that changes something fires `on_row_count_changed`
/// and/or `on_rows_changed` and queues the same notifications for [`vgrid::Grid::sync_data`].
pub struct DataView<T: Record> {
    items: Vec<T>,
    idx_by_id: HashMap<Id<T>, usize>,
    rows: Vec<Id<T>>,
    rows_by_id: HashMap<Id<T>, usize>,
    updated: HashSet<Id<T>>,
    suspend: bool,
    sort_comparer: Option<Comparer<T>>,
    sort_asc: bool,
    metadata: Option<MetadataProvider<T>>,
    pending: Vec<DataNotification>,
    pub on_row_count_changed: Event<RowCountChangedArgs>,
    pub on_rows_changed: Event<RowsChangedArgs>,
}

impl<T: Record> DataView<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            idx_by_id: HashMap::new(),
            rows: Vec::new(),
            rows_by_id: HashMap::new(),
            updated: HashSet::new(),
            suspend: false,
            sort_comparer: None,
            sort_asc: true,
            metadata: None,
            pending: Vec::new(),
            on_row_count_changed: Event::new(),
            on_rows_changed: Event::new(),
        }
    }

    /// Builds a view over `items`. Fails like [`DataView::set_items`].
    pub fn from_items(items: Vec<T>) -> vgrid::Result<Self> {
        let mut view = Self::new();
        view.set_items(items)?;
        Ok(view)
    }

    pub fn with_metadata_provider(
        mut self,
        provider: impl Fn(usize, &T) -> Option<ItemMetadata> + Send + Sync + 'static,
    ) -> Self {
        self.metadata = Some(Arc::new(provider));
        self
    }

    pub fn set_metadata_provider(&mut self, provider: Option<MetadataProvider<T>>) {
        self.metadata = provider;
    }

    /// Suspends refreshes until [`DataView::end_update`].
    pub fn begin_update(&mut self) {
        self.suspend = true;
    }

    pub fn end_update(&mut self) {
        self.suspend = false;
        self.refresh();
    }

    pub fn is_suspended(&self) -> bool {
        self.suspend
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replaces every item.
    ///
    /// Ids must be unique. On a duplicate nothing changes and the error names the second
    /// occurrence.
    pub fn set_items(&mut self, items: Vec<T>) -> vgrid::Result<()> {
        let mut idx_by_id = HashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let id = item.id();
            if idx_by_id.contains_key(&id) {
                vwarn!(row = i, ?id, "DataView::set_items: duplicate id");
                return Err(InvariantViolation::duplicate_id(i, &id).into());
            }
            idx_by_id.insert(id, i);
        }
        vdebug!(items = items.len(), "DataView::set_items");
        self.items = items;
        self.idx_by_id = idx_by_id;
        self.refresh();
        Ok(())
    }

    /// Sorts the items with `comparer`, reversed when `ascending` is false. The comparer is
    /// kept for [`DataView::re_sort`].
    pub fn sort_by(
        &mut self,
        comparer: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
        ascending: bool,
    ) {
        self.sort_comparer = Some(Arc::new(comparer));
        self.sort_asc = ascending;
        self.apply_sort();
    }

    /// Sorts again with the last comparer and direction. Does nothing if there was no sort.
    pub fn re_sort(&mut self) {
        if self.sort_comparer.is_some() {
            self.apply_sort();
        }
    }

    fn apply_sort(&mut self) {
        let Some(comparer) = self.sort_comparer.clone() else {
            return;
        };
        self.items.sort_by(|a, b| comparer(a, b));
        if !self.sort_asc {
            self.items.reverse();
        }
        self.reindex_from(0);
        self.refresh();
    }

    fn reindex_from(&mut self, start: usize) {
        if start == 0 {
            self.idx_by_id.clear();
        }
        for (i, item) in self.items.iter().enumerate().skip(start) {
            self.idx_by_id.insert(item.id(), i);
        }
    }

    pub fn item_by_idx(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub fn idx_by_id(&self, id: &Id<T>) -> Option<usize> {
        self.idx_by_id.get(id).copied()
    }

    pub fn item_by_id(&self, id: &Id<T>) -> Option<&T> {
        self.items.get(self.idx_by_id(id)?)
    }

    /// Row of `id` as of the last refresh.
    pub fn row_by_id(&self, id: &Id<T>) -> Option<usize> {
        self.rows_by_id.get(id).copied()
    }

    /// Rows of the given ids, skipping ids that have no row.
    pub fn map_ids_to_rows(&self, ids: &[Id<T>]) -> Vec<usize> {
        ids.iter().filter_map(|id| self.row_by_id(id)).collect()
    }

    /// Ids of the given rows, skipping rows past the end.
    pub fn map_rows_to_ids(&self, rows: &[usize]) -> Vec<Id<T>> {
        rows.iter()
            .filter_map(|&row| self.rows.get(row).cloned())
            .collect()
    }

    /// Replaces the item stored under `id`. The new item must carry the same id.
    pub fn update_item(&mut self, id: &Id<T>, item: T) -> vgrid::Result<()> {
        let Some(idx) = self.idx_by_id(id) else {
            return Err(InvariantViolation::id_mismatch(id).into());
        };
        if item.id() != *id {
            return Err(InvariantViolation::id_mismatch(id).into());
        }
        self.items[idx] = item;
        self.updated.insert(id.clone());
        self.refresh();
        Ok(())
    }

    /// Inserts `item` at `insert_before`, clamped to the end.
    pub fn insert_item(&mut self, insert_before: usize, item: T) -> vgrid::Result<()> {
        let at = insert_before.min(self.items.len());
        self.ensure_new_id(at, &item)?;
        self.items.insert(at, item);
        self.reindex_from(at);
        self.refresh();
        Ok(())
    }

    pub fn add_item(&mut self, item: T) -> vgrid::Result<()> {
        let at = self.items.len();
        self.ensure_new_id(at, &item)?;
        self.items.push(item);
        self.reindex_from(at);
        self.refresh();
        Ok(())
    }

    fn ensure_new_id(&self, at: usize, item: &T) -> vgrid::Result<()> {
        let id = item.id();
        if self.idx_by_id.contains_key(&id) {
            return Err(InvariantViolation::duplicate_id(at, &id).into());
        }
        Ok(())
    }

    pub fn delete_item(&mut self, id: &Id<T>) -> vgrid::Result<T> {
        let Some(idx) = self.idx_by_id.remove(id) else {
            return Err(GridError::from(InvariantViolation::unknown_id(id)));
        };
        let item = self.items.remove(idx);
        self.reindex_from(idx);
        self.refresh();
        Ok(item)
    }

    /// Recomputes the rows from the items and reports what changed.
    ///
    /// A row is reported when it is new, when a different item moved into it, or when its
    /// item was replaced through [`DataView::update_item`].
    pub fn refresh(&mut self) {
        if self.suspend {
            return;
        }
        let previous = self.rows.len();
        let rows: Vec<Id<T>> = self.items.iter().map(Record::id).collect();
        let diff: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|&(i, id)| self.rows.get(i) != Some(id) || self.updated.contains(id))
            .map(|(i, _)| i)
            .collect();

        self.rows_by_id = rows
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        self.rows = rows;
        self.updated.clear();
        let current = self.rows.len();
        vtrace!(previous, current, changed = diff.len(), "DataView::refresh");

        if previous != current {
            self.pending
                .push(DataNotification::RowCountChanged { previous, current });
            self.on_row_count_changed
                .notify(&RowCountChangedArgs { previous, current });
        }
        if !diff.is_empty() {
            self.pending.push(DataNotification::RowsChanged { rows: diff.clone() });
            self.on_rows_changed.notify(&RowsChangedArgs { rows: diff });
        }
    }

    /// Notifications not yet drained by a grid.
    pub fn pending_notifications(&self) -> &[DataNotification] {
        &self.pending
    }
}

impl<T: Record> Default for DataView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> DataProvider for DataView<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn item(&self, row: usize) -> Option<&T> {
        self.item_by_id(self.rows.get(row)?)
    }

    fn id_at(&self, row: usize) -> Option<Id<T>> {
        self.rows.get(row).cloned()
    }

    fn index_of_id(&self, id: &Id<T>) -> Option<usize> {
        self.row_by_id(id)
    }

    fn item_metadata(&self, row: usize) -> Option<ItemMetadata> {
        let provider = self.metadata.as_ref()?;
        provider(row, self.item(row)?)
    }

    fn drain_notifications(&mut self) -> Vec<DataNotification> {
        std::mem::take(&mut self.pending)
    }
}

impl<T: Record> core::fmt::Debug for DataView<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataView")
            .field("items", &self.items.len())
            .field("rows", &self.rows.len())
            .field("suspend", &self.suspend)
            .field("sorted", &self.sort_comparer.is_some())
            .field("sort_asc", &self.sort_asc)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
