#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    /// Towards higher row indexes.
    Forward,
    /// Towards lower row indexes.
    Backward,
}

/// A logical cell position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPos {
    pub row: usize,
    pub cell: usize,
}

impl CellPos {
    pub fn new(row: usize, cell: usize) -> Self {
        Self { row, cell }
    }
}

/// Row indexes and horizontal pixel bounds of a viewport region.
///
/// `bottom` is inclusive. Pixel bounds are in canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportRange {
    pub top: usize,
    pub bottom: usize,
    pub left_px: i64,
    pub right_px: i64,
}

impl ViewportRange {
    /// Row indexes of this range that exist in a dataset of `len` rows.
    pub fn rows(&self, len: usize) -> core::ops::Range<usize> {
        let end = self.bottom.saturating_add(1).min(len);
        self.top.min(end)..end
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.top && row <= self.bottom
    }
}

/// An opaque handle to a node materialized by a [`crate::RenderHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeHandle(pub u64);

/// Size of the scrollable viewport, excluding headers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Geometry of one cell in canvas coordinates. `bottom` is inclusive, `right` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellBox {
    pub top: i64,
    pub left: i64,
    pub bottom: i64,
    pub right: i64,
}

/// Which of the two focus sinks should receive keyboard focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusSink {
    /// The sink before the canvas, used after backward navigation.
    Leading,
    /// The sink after the canvas.
    Trailing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }
}

/// Keys the grid reacts to. Everything else arrives as `Other` and is only forwarded to
/// `key_down` subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    Tab,
    Other(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Navigation {
    Up,
    Down,
    Left,
    Right,
    Prev,
    Next,
    PageUp,
    PageDown,
}

impl Navigation {
    pub(crate) fn focus_sink(self) -> FocusSink {
        match self {
            Self::Up | Self::Left | Self::Prev | Self::PageUp => FocusSink::Leading,
            Self::Down | Self::Right | Self::Next | Self::PageDown => FocusSink::Trailing,
        }
    }
}

/// One entry of the sort order. Unsorted columns are absent from the list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortColumn {
    pub column_id: String,
    pub sort_asc: bool,
}

impl SortColumn {
    pub fn new(column_id: impl Into<String>, sort_asc: bool) -> Self {
        Self {
            column_id: column_id.into(),
            sort_asc,
        }
    }
}
