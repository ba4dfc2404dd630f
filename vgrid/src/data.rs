use std::borrow::Cow;
use std::collections::HashMap;

use crate::column::Formatter;
use crate::key::GridKey;

/// A row item as seen by the grid.
pub trait Record {
    type Id: GridKey;

    /// Stable, unique identity of the item.
    fn id(&self) -> Self::Id;

    /// The raw value for a column `field`, before formatting.
    fn value(&self, field: &str) -> Option<Cow<'_, str>>;
}

pub type ItemId<D> = <<D as DataProvider>::Item as Record>::Id;

/// The ordered, identity-indexed collection the grid renders.
pub trait DataProvider {
    type Item: Record;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn item(&self, row: usize) -> Option<&Self::Item>;

    fn id_at(&self, row: usize) -> Option<<Self::Item as Record>::Id> {
        self.item(row).map(Record::id)
    }

    fn index_of_id(&self, id: &<Self::Item as Record>::Id) -> Option<usize>;

    fn item_metadata(&self, _row: usize) -> Option<ItemMetadata> {
        None
    }

    /// Hands pending change notifications to the grid. Providers that never change after
    /// construction can keep the default.
    fn drain_notifications(&mut self) -> Vec<DataNotification> {
        Vec::new()
    }
}

/// A change reported by a data provider.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataNotification {
    RowCountChanged { previous: usize, current: usize },
    /// Rows whose content needs to be redrawn.
    RowsChanged { rows: Vec<usize> },
}

/// How many columns a cell covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Colspan {
    Span(usize),
    /// Everything up to the last column.
    Rest,
}

impl Colspan {
    /// Number of columns covered when starting at `cell` in a grid of `columns` columns.
    pub fn resolve(self, cell: usize, columns: usize) -> usize {
        let rest = columns.saturating_sub(cell).max(1);
        match self {
            Self::Span(n) => n.clamp(1, rest),
            Self::Rest => rest,
        }
    }
}

/// Key of a per-column override: by column id first, then by column index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Id(String),
    Index(usize),
}

#[derive(Clone, Default)]
pub struct ColumnMetadata {
    pub formatter: Option<Formatter>,
    pub focusable: Option<bool>,
    pub selectable: Option<bool>,
    pub colspan: Option<Colspan>,
}

impl ColumnMetadata {
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = Some(focusable);
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = Some(selectable);
        self
    }

    pub fn with_colspan(mut self, colspan: Colspan) -> Self {
        self.colspan = Some(colspan);
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

impl core::fmt::Debug for ColumnMetadata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ColumnMetadata")
            .field("focusable", &self.focusable)
            .field("selectable", &self.selectable)
            .field("colspan", &self.colspan)
            .finish_non_exhaustive()
    }
}

/// Per-row rendering and interaction overrides.
#[derive(Clone, Default)]
pub struct ItemMetadata {
    pub css_classes: Option<String>,
    pub formatter: Option<Formatter>,
    pub focusable: Option<bool>,
    pub selectable: Option<bool>,
    pub columns: HashMap<ColumnKey, ColumnMetadata>,
}

impl ItemMetadata {
    /// Override for a column, looked up by id and then by index.
    pub fn column(&self, id: &str, index: usize) -> Option<&ColumnMetadata> {
        if self.columns.is_empty() {
            return None;
        }
        self.columns
            .get(&ColumnKey::Id(id.to_owned()))
            .or_else(|| self.columns.get(&ColumnKey::Index(index)))
    }

    pub fn with_css_classes(mut self, css: impl Into<String>) -> Self {
        self.css_classes = Some(css.into());
        self
    }

    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = Some(focusable);
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = Some(selectable);
        self
    }

    pub fn with_column(mut self, key: ColumnKey, meta: ColumnMetadata) -> Self {
        self.columns.insert(key, meta);
        self
    }
}

impl core::fmt::Debug for ItemMetadata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemMetadata")
            .field("css_classes", &self.css_classes)
            .field("focusable", &self.focusable)
            .field("selectable", &self.selectable)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}
