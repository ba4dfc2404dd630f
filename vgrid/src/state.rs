use crate::{ScrollDirection, ViewportRange};

/// A lightweight, serializable snapshot of the current scroll state.
///
/// `scroll_top` is the real position inside the canvas; `offset` is what paging adds to it to
/// get the virtual position.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub scroll_top: i64,
    pub scroll_left: i64,
    pub page: u64,
    pub offset: i64,
    pub direction: Option<ScrollDirection>,
}

impl ScrollState {
    pub fn virtual_top(&self) -> i64 {
        self.scroll_top + self.offset
    }
}

/// Scroll state plus the ranges derived from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub scroll: ScrollState,
    pub visible: ViewportRange,
    pub rendered: ViewportRange,
}
