use std::collections::BTreeMap;

use crate::event::{Event, SubscriptionId, Subscriptions};
use crate::{CellPos, Key, Modifiers, SortColumn, ViewportRange};

/// Extra css classes per cell: row index, then column id, then class list.
pub type CellCssHash = BTreeMap<usize, BTreeMap<String, String>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollArgs {
    pub scroll_top: i64,
    pub scroll_left: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortArgs {
    /// `sort_asc == None` means the column went back to unsorted.
    Single {
        column_id: String,
        sort_asc: Option<bool>,
    },
    Multi { sort_columns: Vec<SortColumn> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderArgs {
    pub column_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellArgs {
    pub row: usize,
    pub cell: usize,
}

impl From<CellPos> for CellArgs {
    fn from(pos: CellPos) -> Self {
        Self {
            row: pos.row,
            cell: pos.cell,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyDownArgs {
    pub active: Option<CellPos>,
    pub key: Key,
    pub modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportChangedArgs {
    pub visible: ViewportRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveCellChangedArgs {
    pub active: Option<CellPos>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedRowsChangedArgs {
    pub rows: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellCssStylesChangedArgs {
    pub key: String,
    /// `None` when the key was removed.
    pub hash: Option<CellCssHash>,
}

macro_rules! grid_events {
    ($($(#[$meta:meta])* $name:ident: $args:ty,)*) => {
        /// Every notification a [`crate::Grid`] fires, one typed channel per event.
        #[derive(Debug, Default)]
        pub struct GridEvents {
            $($(#[$meta])* pub $name: Event<$args>,)*
        }

        impl GridEvents {
            /// Drops every handler recorded in `subs`, whichever event it belongs to.
            pub fn unsubscribe_all(&mut self, subs: &mut Subscriptions) {
                for id in subs.take() {
                    self.unsubscribe(id);
                }
            }

            pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
                $(if self.$name.unsubscribe(id) {
                    return true;
                })*
                false
            }
        }
    };
}

grid_events! {
    scroll: ScrollArgs,
    sort: SortArgs,
    header_mouse_enter: HeaderArgs,
    header_mouse_leave: HeaderArgs,
    header_context_menu: HeaderArgs,
    header_click: HeaderArgs,
    mouse_enter: CellArgs,
    mouse_leave: CellArgs,
    click: CellArgs,
    dbl_click: CellArgs,
    context_menu: CellArgs,
    /// Fired before the built-in key handling; stopping immediate propagation suppresses it.
    key_down: KeyDownArgs,
    viewport_changed: ViewportChangedArgs,
    columns_reordered: (),
    columns_resized: (),
    before_destroy: (),
    active_cell_changed: ActiveCellChangedArgs,
    active_cell_position_changed: (),
    selected_rows_changed: SelectedRowsChangedArgs,
    cell_css_styles_changed: CellCssStylesChangedArgs,
}
