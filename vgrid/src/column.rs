use std::sync::Arc;

/// Inputs handed to a [`Formatter`] for one cell.
#[derive(Clone, Copy, Debug)]
pub struct FormatContext<'a> {
    pub row: usize,
    pub cell: usize,
    /// The item's value for the column's `field`, if any.
    pub value: Option<&'a str>,
    pub column: &'a Column,
}

/// Produces the inner markup of a cell.
pub type Formatter = Arc<dyn Fn(&FormatContext<'_>) -> String + Send + Sync>;

/// Escapes `&`, `<` and `>`; renders a missing value as an empty string.
pub fn default_formatter(ctx: &FormatContext<'_>) -> String {
    let Some(value) = ctx.value else {
        return String::new();
    };
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// A column definition.
///
/// `width == 0` means "use the grid's default column width". Widths are clamped into
/// `[min_width, max_width]` whenever the column list is assigned and after every resize pass.
#[derive(Clone)]
pub struct Column {
    pub id: String,
    pub name: String,
    /// Field looked up on each item through [`crate::Record::value`].
    pub field: String,
    pub width: u32,
    pub min_width: u32,
    pub max_width: Option<u32>,
    pub resizable: bool,
    pub sortable: bool,
    pub focusable: bool,
    pub selectable: bool,
    /// Invalidate every row when this column's width changes.
    pub rerender_on_resize: bool,
    pub default_sort_asc: bool,
    pub css_class: Option<String>,
    pub header_css_class: Option<String>,
    pub tool_tip: Option<String>,
    /// Id of the [`ColumnGroup`] this column belongs to.
    pub group: Option<usize>,
    pub formatter: Option<Formatter>,
}

impl Column {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field: field.into(),
            width: 0,
            min_width: 30,
            max_width: None,
            resizable: true,
            sortable: false,
            focusable: true,
            selectable: true,
            rerender_on_resize: false,
            default_sort_asc: true,
            css_class: None,
            header_css_class: None,
            tool_tip: None,
            group: None,
            formatter: None,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn with_max_width(mut self, max_width: Option<u32>) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_rerender_on_resize(mut self, rerender_on_resize: bool) -> Self {
        self.rerender_on_resize = rerender_on_resize;
        self
    }

    pub fn with_default_sort_asc(mut self, default_sort_asc: bool) -> Self {
        self.default_sort_asc = default_sort_asc;
        self
    }

    pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = Some(css_class.into());
        self
    }

    pub fn with_header_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.header_css_class = Some(css_class.into());
        self
    }

    pub fn with_tool_tip(mut self, tool_tip: impl Into<String>) -> Self {
        self.tool_tip = Some(tool_tip.into());
        self
    }

    pub fn with_group(mut self, group: Option<usize>) -> Self {
        self.group = group;
        self
    }

    pub fn with_formatter(
        mut self,
        formatter: impl Fn(&FormatContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Applies the default width and the min/max clamp. `floor` is the narrowest width the host
    /// can draw; it raises `min_width` but never overrides `max_width`.
    pub(crate) fn normalize(&mut self, default_width: u32, floor: u32) {
        if self.width == 0 {
            self.width = default_width;
        }
        self.width = self.clamp_width(self.width, floor);
    }

    pub(crate) fn clamp_width(&self, width: u32, floor: u32) -> u32 {
        let w = width.max(self.min_width.max(floor));
        match self.max_width {
            Some(max) if w > max => max,
            _ => w,
        }
    }
}

impl core::fmt::Debug for Column {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("field", &self.field)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("resizable", &self.resizable)
            .field("sortable", &self.sortable)
            .field("focusable", &self.focusable)
            .field("selectable", &self.selectable)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnGroup {
    pub id: usize,
    pub name: String,
}

impl ColumnGroup {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
