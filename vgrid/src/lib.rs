//! A headless, virtualized data grid engine.
//!
//! For adapter-level collaborators (an identity-indexed data view, row selection, selection
//! sync across data changes), see the `vgrid-adapter` crate.
//!
//! This crate holds the algorithms that keep a grid of millions of rows interactive:
//! paged virtual scrolling under a platform height limit, a row cache keyed by item id that is
//! reconciled against the rendered range, column layout with force-fit and resize drags, and
//! keyboard/pointer navigation over focusable cells.
//!
//! It is UI-agnostic. A host implementing [`RenderHost`] is expected to provide:
//! - viewport size
//! - scroll positions and input events
//! - a place to attach the row and cell markup the grid produces
//!
//! [`MemoryHost`] is an in-memory host for tests and headless use.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod cache;
mod column;
mod data;
mod error;
mod event;
mod events;
mod grid;
mod host;
mod interaction;
mod key;
mod layout;
mod memory;
pub mod navigation;
mod options;
mod paging;
mod plugin;
mod range;
mod render;
mod selection;
mod sort;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use column::{Column, ColumnGroup, FormatContext, Formatter, default_formatter};
pub use data::{
    Colspan, ColumnKey, ColumnMetadata, DataNotification, DataProvider, ItemId, ItemMetadata,
    Record,
};
pub use error::{GridError, InvariantViolation, Result};
pub use event::{Event, EventData, Handler, SubscriptionId, Subscriptions};
pub use events::{
    ActiveCellChangedArgs, CellArgs, CellCssHash, CellCssStylesChangedArgs, GridEvents,
    HeaderArgs, KeyDownArgs, ScrollArgs, SelectedRowsChangedArgs, SortArgs, ViewportChangedArgs,
};
pub use grid::Grid;
pub use host::{
    CellBoxMetrics, CellMarkup, HeaderMarkup, PlatformMetrics, RenderHost, RenderedRow,
    RowMarkup,
};
pub use key::GridKey;
pub use layout::{ColumnLayout, ColumnOffset, ReorderItem, ResizeDrag};
pub use memory::{HostStats, MemoryCell, MemoryHost, MemoryRow};
pub use options::{FormatterFactory, GridOptions};
pub use paging::PageMap;
pub use plugin::{Plugin, PluginId};
pub use range::CellRange;
pub use selection::{SelectionModel, ranges_to_rows, rows_to_ranges};
pub use sort::{SortMode, apply_header_click};
pub use state::{FrameState, ScrollState};
pub use types::{
    CellBox, CellPos, FocusSink, Key, Modifiers, Navigation, NodeHandle, ScrollDirection,
    SortColumn, ViewportRange, ViewportSize,
};
