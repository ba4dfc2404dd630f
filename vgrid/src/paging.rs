use crate::host::PlatformMetrics;

/// Maps virtual scroll offsets onto a canvas that may be shorter than the data.
///
/// When `rows * row_height` fits under the platform limit there is a single page and virtual
/// and real offsets coincide. Otherwise the real canvas is `max_supported_height` tall and is
/// split into 100 pages; each page shifts real positions by a fixed `jump`, so that
/// `real = virtual - round(page * jump)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageMap {
    /// Virtual height of all rows.
    pub total_height: u64,
    /// Real canvas height.
    pub height: u64,
    pub page_height: f64,
    pub pages: u64,
    /// Offset increment per page.
    pub jump: f64,
}

impl Default for PageMap {
    fn default() -> Self {
        Self::single(0)
    }
}

impl PageMap {
    pub fn single(total_height: u64) -> Self {
        Self {
            total_height,
            height: total_height,
            page_height: total_height as f64,
            pages: 1,
            jump: 0.0,
        }
    }

    pub fn compute(
        rows: usize,
        row_height: u32,
        viewport_height: u32,
        metrics: &PlatformMetrics,
        paging: bool,
    ) -> Self {
        let content = (rows as u64).saturating_mul(u64::from(row_height));
        let floor = u64::from(viewport_height.saturating_sub(metrics.scrollbar_height));
        let total_height = content.max(floor);

        if !paging || total_height < metrics.max_supported_height {
            return Self::single(total_height);
        }

        let height = metrics.max_supported_height;
        let page_height = height as f64 / 100.0;
        let pages = ((total_height as f64 / page_height).floor() as u64).max(2);
        let jump = (total_height - height) as f64 / (pages - 1) as f64;
        Self {
            total_height,
            height,
            page_height,
            pages,
            jump,
        }
    }

    pub fn is_paged(&self) -> bool {
        self.pages > 1
    }

    /// Page holding the virtual offset `y`.
    pub fn page_at(&self, y: i64) -> u64 {
        if y <= 0 || self.page_height <= 0.0 {
            return 0;
        }
        let page = (y as f64 / self.page_height).floor() as u64;
        page.min(self.pages - 1)
    }

    /// Page for a real scroll position after a jump larger than the viewport.
    pub fn page_at_real(&self, real_top: i64, viewport_height: i64) -> u64 {
        let real_span = self.height as i64 - viewport_height;
        if real_span <= 0 || real_top <= 0 {
            return 0;
        }
        let ratio = (self.total_height as i64 - viewport_height) as f64 / real_span as f64;
        let page = (real_top as f64 * ratio / self.page_height).floor() as u64;
        page.min(self.pages - 1)
    }

    /// Difference between virtual and real positions on `page`.
    pub fn offset_of(&self, page: u64) -> i64 {
        (page as f64 * self.jump).round() as i64
    }
}
