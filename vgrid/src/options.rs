use std::sync::Arc;

use crate::column::{Column, FormatContext, Formatter, default_formatter};

/// Supplies a formatter for columns that do not carry their own.
pub type FormatterFactory = Arc<dyn Fn(&Column) -> Option<Formatter> + Send + Sync>;

/// Configuration for [`crate::Grid`].
///
/// Cheap to clone: callbacks live in `Arc`s, so adapters can tweak a few fields and call
/// `Grid::set_options` without reallocating closures.
pub struct GridOptions {
    pub row_height: u32,
    /// Width given to columns declared with `width == 0`.
    pub default_column_width: u32,
    pub enable_row_navigation: bool,
    pub enable_cell_navigation: bool,
    pub enable_column_reorder: bool,
    /// Keep the total column width equal to the viewport width.
    pub force_fit_columns: bool,
    /// Stretch the canvas to the viewport even when columns are narrower.
    pub full_width_rows: bool,
    /// Cycle sortable headers through an unsorted third state.
    pub enable_three_steps_sorting: bool,
    pub multi_column_sort: bool,
    pub multi_select: bool,
    /// Render every qualifying scroll synchronously instead of deferring large jumps.
    pub force_sync_scrolling: bool,
    /// Push column offsets to the host while a resize drag is in progress.
    pub sync_column_cell_resize: bool,
    /// Split very tall canvases into pages so they fit under the platform height limit.
    ///
    /// With this off the canvas is always a single page of `rows * row_height` pixels.
    pub virtual_paging: bool,
    pub formatter_factory: Option<FormatterFactory>,
    pub default_formatter: Formatter,
    pub add_new_row_css_class: String,
    /// Cell-css key used for the selection highlight.
    pub selected_cell_css_class: String,
    /// Delay before a deferred render fires.
    pub async_render_delay_ms: u64,
    /// Scroll distance since the last render below which no render is attempted.
    pub scroll_render_threshold_px: i64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row_height: 25,
            default_column_width: 80,
            enable_row_navigation: true,
            enable_cell_navigation: true,
            enable_column_reorder: true,
            force_fit_columns: false,
            full_width_rows: false,
            enable_three_steps_sorting: false,
            multi_column_sort: false,
            multi_select: true,
            force_sync_scrolling: false,
            sync_column_cell_resize: false,
            virtual_paging: true,
            formatter_factory: None,
            default_formatter: Arc::new(default_formatter),
            add_new_row_css_class: "new-row".to_owned(),
            selected_cell_css_class: "selected".to_owned(),
            async_render_delay_ms: 50,
            scroll_render_threshold_px: 20,
        }
    }
}

impl Clone for GridOptions {
    fn clone(&self) -> Self {
        Self {
            row_height: self.row_height,
            default_column_width: self.default_column_width,
            enable_row_navigation: self.enable_row_navigation,
            enable_cell_navigation: self.enable_cell_navigation,
            enable_column_reorder: self.enable_column_reorder,
            force_fit_columns: self.force_fit_columns,
            full_width_rows: self.full_width_rows,
            enable_three_steps_sorting: self.enable_three_steps_sorting,
            multi_column_sort: self.multi_column_sort,
            multi_select: self.multi_select,
            force_sync_scrolling: self.force_sync_scrolling,
            sync_column_cell_resize: self.sync_column_cell_resize,
            virtual_paging: self.virtual_paging,
            formatter_factory: self.formatter_factory.clone(),
            default_formatter: Arc::clone(&self.default_formatter),
            add_new_row_css_class: self.add_new_row_css_class.clone(),
            selected_cell_css_class: self.selected_cell_css_class.clone(),
            async_render_delay_ms: self.async_render_delay_ms,
            scroll_render_threshold_px: self.scroll_render_threshold_px,
        }
    }
}

impl GridOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height.max(1);
        self
    }

    pub fn with_default_column_width(mut self, width: u32) -> Self {
        self.default_column_width = width;
        self
    }

    pub fn with_row_navigation(mut self, enabled: bool) -> Self {
        self.enable_row_navigation = enabled;
        self
    }

    pub fn with_cell_navigation(mut self, enabled: bool) -> Self {
        self.enable_cell_navigation = enabled;
        self
    }

    pub fn with_column_reorder(mut self, enabled: bool) -> Self {
        self.enable_column_reorder = enabled;
        self
    }

    pub fn with_force_fit_columns(mut self, enabled: bool) -> Self {
        self.force_fit_columns = enabled;
        self
    }

    pub fn with_full_width_rows(mut self, enabled: bool) -> Self {
        self.full_width_rows = enabled;
        self
    }

    pub fn with_three_steps_sorting(mut self, enabled: bool) -> Self {
        self.enable_three_steps_sorting = enabled;
        self
    }

    pub fn with_multi_column_sort(mut self, enabled: bool) -> Self {
        self.multi_column_sort = enabled;
        self
    }

    pub fn with_multi_select(mut self, enabled: bool) -> Self {
        self.multi_select = enabled;
        self
    }

    pub fn with_force_sync_scrolling(mut self, enabled: bool) -> Self {
        self.force_sync_scrolling = enabled;
        self
    }

    pub fn with_sync_column_cell_resize(mut self, enabled: bool) -> Self {
        self.sync_column_cell_resize = enabled;
        self
    }

    pub fn with_virtual_paging(mut self, enabled: bool) -> Self {
        self.virtual_paging = enabled;
        self
    }

    pub fn with_formatter_factory(
        mut self,
        factory: Option<impl Fn(&Column) -> Option<Formatter> + Send + Sync + 'static>,
    ) -> Self {
        self.formatter_factory = factory.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_default_formatter(
        mut self,
        formatter: impl Fn(&FormatContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.default_formatter = Arc::new(formatter);
        self
    }

    pub fn with_add_new_row_css_class(mut self, css: impl Into<String>) -> Self {
        self.add_new_row_css_class = css.into();
        self
    }

    pub fn with_selected_cell_css_class(mut self, css: impl Into<String>) -> Self {
        self.selected_cell_css_class = css.into();
        self
    }

    pub fn with_async_render_delay_ms(mut self, delay_ms: u64) -> Self {
        self.async_render_delay_ms = delay_ms;
        self
    }

    pub fn with_scroll_render_threshold_px(mut self, threshold: i64) -> Self {
        self.scroll_render_threshold_px = threshold;
        self
    }
}

impl core::fmt::Debug for GridOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridOptions")
            .field("row_height", &self.row_height)
            .field("default_column_width", &self.default_column_width)
            .field("enable_row_navigation", &self.enable_row_navigation)
            .field("enable_cell_navigation", &self.enable_cell_navigation)
            .field("enable_column_reorder", &self.enable_column_reorder)
            .field("force_fit_columns", &self.force_fit_columns)
            .field("full_width_rows", &self.full_width_rows)
            .field(
                "enable_three_steps_sorting",
                &self.enable_three_steps_sorting,
            )
            .field("multi_column_sort", &self.multi_column_sort)
            .field("multi_select", &self.multi_select)
            .field("force_sync_scrolling", &self.force_sync_scrolling)
            .field("sync_column_cell_resize", &self.sync_column_cell_resize)
            .field("virtual_paging", &self.virtual_paging)
            .field("selected_cell_css_class", &self.selected_cell_css_class)
            .field("async_render_delay_ms", &self.async_render_delay_ms)
            .field(
                "scroll_render_threshold_px",
                &self.scroll_render_threshold_px,
            )
            .finish_non_exhaustive()
    }
}
