use std::collections::{BTreeMap, HashMap};

use crate::NodeHandle;
use crate::key::GridKey;

/// A materialized cell. `colspan` columns starting at the map key are covered by `node`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellNode {
    pub node: NodeHandle,
    pub colspan: usize,
}

/// Render state of one resident row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowCacheEntry {
    pub row_node: NodeHandle,
    pub cell_nodes: BTreeMap<usize, CellNode>,
    /// Columns whose markup went to the host in the current pass and await handles.
    pub cell_render_queue: Vec<usize>,
}

impl RowCacheEntry {
    pub fn new(row_node: NodeHandle) -> Self {
        Self {
            row_node,
            cell_nodes: BTreeMap::new(),
            cell_render_queue: Vec::new(),
        }
    }

    /// Pairs queued columns with the handles the host returned, in order.
    pub fn resolve_queue(&mut self, handles: &[NodeHandle], spans: &[usize]) {
        for ((column, node), colspan) in self
            .cell_render_queue
            .drain(..)
            .zip(handles.iter().copied())
            .zip(spans.iter().copied())
        {
            self.cell_nodes.insert(column, CellNode { node, colspan });
        }
    }
}

/// Row cache keyed by item id.
#[derive(Clone, Debug)]
pub struct RowCache<K> {
    entries: HashMap<K, RowCacheEntry>,
}

impl<K> Default for RowCache<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: GridKey> RowCache<K> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &K) -> Option<&RowCacheEntry> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &K) -> Option<&mut RowCacheEntry> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.entries.contains_key(id)
    }

    pub fn insert(&mut self, id: K, entry: RowCacheEntry) -> Option<RowCacheEntry> {
        self.entries.insert(id, entry)
    }

    pub fn remove(&mut self, id: &K) -> Option<RowCacheEntry> {
        self.entries.remove(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &RowCacheEntry)> {
        self.entries.iter()
    }

    /// The id whose row node is `node`.
    pub fn find_by_row_node(&self, node: NodeHandle) -> Option<&K> {
        self.entries
            .iter()
            .find(|(_, e)| e.row_node == node)
            .map(|(id, _)| id)
    }
}
