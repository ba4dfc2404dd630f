//! Collaborators for the `vgrid` crate that live outside the grid engine.
//!
//! - [`DataView`]: an identity-indexed, sortable item collection that implements
//!   [`vgrid::DataProvider`] and reports its changes to the grid
//! - [`RowSelectionModel`]: a [`vgrid::SelectionModel`] that always selects whole rows
//! - [`SelectionSync`]: keeps the grid's selection attached to item ids across data changes
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod data_view;
mod row_selection;
mod selection_sync;


pub use data_view::{
    Comparer, DataView, MetadataProvider, RowCountChangedArgs, RowsChangedArgs,
};
pub use row_selection::RowSelectionModel;
pub use selection_sync::{SelectedRowIdsChangedArgs, SelectionSync};
