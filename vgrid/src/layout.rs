use std::collections::HashMap;

use crate::{Column, ColumnGroup};

/// Stand-in for "no bound" in resize leeway sums.
const UNBOUNDED_LEEWAY: i64 = 100_000;
/// Growth cap for columns without a `max_width` during autosize.
const UNBOUNDED_GROWTH: i64 = 1_000_000;

/// Left and right offsets of one column inside a canvas, as handed to the render host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnOffset {
    pub left: i64,
    /// Distance from the column's right edge to the canvas' right edge.
    pub right: i64,
}

/// One entry of a top-level column reorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReorderItem {
    Column(String),
    /// Every column of the group, in its current order.
    Group(usize),
}

/// Column definitions plus the pixel position cache derived from them.
#[derive(Clone, Debug, Default)]
pub struct ColumnLayout {
    columns: Vec<Column>,
    groups: Vec<ColumnGroup>,
    by_id: HashMap<String, usize>,
    pos_left: Vec<i64>,
    pos_right: Vec<i64>,
    absolute_min_width: u32,
}

impl ColumnLayout {
    pub fn new(columns: Vec<Column>, default_width: u32, absolute_min_width: u32) -> Self {
        let mut layout = Self {
            absolute_min_width,
            ..Self::default()
        };
        layout.set_columns(columns, Vec::new(), default_width);
        layout
    }

    /// Replaces the column list, applies defaults and clamps, and rebuilds every cache.
    pub fn set_columns(&mut self, columns: Vec<Column>, groups: Vec<ColumnGroup>, default_width: u32) {
        self.columns = columns;
        self.groups = groups;
        self.by_id.clear();
        for (i, c) in self.columns.iter_mut().enumerate() {
            c.normalize(default_width, self.absolute_min_width);
            self.by_id.insert(c.id.clone(), i);
        }
        self.update_caches();
    }

    /// Rebuilds `pos_left` / `pos_right` from the current widths.
    pub fn update_caches(&mut self) {
        self.pos_left.clear();
        self.pos_right.clear();
        let mut x = 0i64;
        for c in &self.columns {
            self.pos_left.push(x);
            x += i64::from(c.width);
            self.pos_right.push(x);
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn pos_left(&self, index: usize) -> i64 {
        self.pos_left.get(index).copied().unwrap_or(0)
    }

    /// Right edge of `index`, clamped to the last column.
    pub fn pos_right(&self, index: usize) -> i64 {
        let last = self.columns.len().saturating_sub(1);
        self.pos_right.get(index.min(last)).copied().unwrap_or(0)
    }

    pub fn total_width(&self) -> i64 {
        self.pos_right.last().copied().unwrap_or(0)
    }

    pub fn absolute_min_width(&self) -> u32 {
        self.absolute_min_width
    }

    /// Changes the padding floor and re-clamps every column against it.
    pub fn set_absolute_min_width(&mut self, width: u32) {
        self.absolute_min_width = width;
        for c in &mut self.columns {
            c.width = c.clamp_width(c.width, width);
        }
        self.update_caches();
    }

    /// The smallest width a resize pass may give column `index`.
    pub fn effective_min_width(&self, index: usize) -> u32 {
        self.columns
            .get(index)
            .map_or(self.absolute_min_width, |c| c.min_width.max(self.absolute_min_width))
    }

    /// How far column `index` can shrink from `width`. A column already under its minimum has
    /// no leeway.
    fn shrink_leeway(&self, index: usize, width: u32) -> i64 {
        (i64::from(width) - i64::from(self.effective_min_width(index))).max(0)
    }

    /// Sets one width through the column's clamp and refreshes the caches.
    pub fn set_width(&mut self, index: usize, width: u32) -> bool {
        let Some(c) = self.columns.get_mut(index) else {
            return false;
        };
        c.width = c.clamp_width(width, self.absolute_min_width);
        self.update_caches();
        true
    }

    /// Column offsets for a canvas of `canvas_width` pixels.
    pub fn offsets(&self, canvas_width: i64) -> Vec<ColumnOffset> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| ColumnOffset {
                left: self.pos_left[i],
                right: canvas_width - self.pos_left[i] - i64::from(c.width),
            })
            .collect()
    }

    /// Redistributes widths so they sum to `available` where the min/max bounds allow.
    ///
    /// Returns `true` when a `rerender_on_resize` column changed width.
    pub fn autosize(&mut self, available: i64) -> bool {
        let mut widths: Vec<i64> = self.columns.iter().map(|c| i64::from(c.width)).collect();
        let mut total: i64 = widths.iter().sum();
        let mut shrink_leeway: i64 = 0;
        for (i, c) in self.columns.iter().enumerate() {
            if c.resizable {
                shrink_leeway += self.shrink_leeway(i, c.width);
            }
        }

        let mut prev_total = total;
        while total > available && shrink_leeway > 0 {
            let proportion = (total - available) as f64 / shrink_leeway as f64;
            for (i, c) in self.columns.iter().enumerate() {
                if total <= available {
                    break;
                }
                let width = widths[i];
                if !c.resizable
                    || width <= i64::from(c.min_width)
                    || width <= i64::from(self.absolute_min_width)
                {
                    continue;
                }
                let abs_min = i64::from(self.effective_min_width(i));
                let mut shrink = (proportion * (width - abs_min) as f64).floor() as i64;
                if shrink == 0 {
                    shrink = 1;
                }
                shrink = shrink.min(width - abs_min);
                total -= shrink;
                shrink_leeway -= shrink;
                widths[i] -= shrink;
            }
            if prev_total <= total {
                break;
            }
            prev_total = total;
        }

        prev_total = total;
        while total < available && total > 0 {
            let proportion = available as f64 / total as f64;
            for (i, c) in self.columns.iter().enumerate() {
                if total >= available {
                    break;
                }
                let current = widths[i];
                let grow = match c.max_width {
                    _ if !c.resizable => 0,
                    Some(max) if i64::from(max) <= current => 0,
                    max => {
                        let proportional = (proportion * current as f64).floor() as i64 - current;
                        let room = max.map_or(UNBOUNDED_GROWTH, |m| i64::from(m) - current);
                        let g = proportional.min(room);
                        if g == 0 { 1 } else { g }
                    }
                };
                total += grow;
                widths[i] += grow;
            }
            if prev_total >= total {
                break;
            }
            prev_total = total;
        }

        let mut rerender = false;
        for (c, w) in self.columns.iter_mut().zip(widths) {
            let w = u32::try_from(w.max(0)).unwrap_or(u32::MAX);
            if c.rerender_on_resize && c.width != w {
                rerender = true;
            }
            c.width = w;
        }
        self.update_caches();
        rerender
    }

    /// Columns that get a resize handle: from the first resizable column on, and under
    /// force-fit, excluding the last resizable one.
    pub fn resize_handles(&self, force_fit: bool) -> Vec<usize> {
        let first = self.columns.iter().position(|c| c.resizable);
        let last = self.columns.iter().rposition(|c| c.resizable);
        let (Some(first), Some(last)) = (first, last) else {
            return Vec::new();
        };
        (first..self.columns.len())
            .filter(|&i| !(force_fit && i >= last))
            .collect()
    }

    /// Starts a resize drag on the right edge of `column` with the pointer at `x`.
    pub fn begin_resize(&self, column: usize, x: i64, force_fit: bool) -> Option<ResizeDrag> {
        if !self.resize_handles(force_fit).contains(&column) {
            return None;
        }
        let previous: Vec<u32> = self.columns.iter().map(|c| c.width).collect();

        let (mut shrink_right, mut stretch_right) = (None, None);
        if force_fit {
            let (mut shrink, mut stretch) = (0i64, Some(0i64));
            for j in column + 1..self.columns.len() {
                let c = &self.columns[j];
                if c.resizable {
                    stretch = match (stretch, c.max_width) {
                        (Some(s), Some(max)) => {
                            Some(s + (i64::from(max) - i64::from(previous[j])).max(0))
                        }
                        _ => None,
                    };
                    shrink += self.shrink_leeway(j, previous[j]);
                }
            }
            shrink_right = Some(shrink);
            stretch_right = stretch;
        }

        let (mut shrink_left, mut stretch_left) = (0i64, Some(0i64));
        for j in 0..=column {
            let c = &self.columns[j];
            if c.resizable {
                stretch_left = match (stretch_left, c.max_width) {
                    (Some(s), Some(max)) => {
                        Some(s + (i64::from(max) - i64::from(previous[j])).max(0))
                    }
                    _ => None,
                };
                shrink_left += self.shrink_leeway(j, previous[j]);
            }
        }

        let shrink_right = shrink_right.unwrap_or(UNBOUNDED_LEEWAY);
        let stretch_right = stretch_right.unwrap_or(UNBOUNDED_LEEWAY);
        let stretch_left = stretch_left.unwrap_or(UNBOUNDED_LEEWAY);

        Some(ResizeDrag {
            column,
            start_x: x,
            min_x: x - shrink_left.min(stretch_right),
            max_x: x + shrink_right.min(stretch_left),
            previous,
            force_fit,
        })
    }

    /// Rebuilds the column order from top-level items. Returns `None` unless the result is a
    /// permutation of the current columns.
    pub fn reordered(&self, order: &[ReorderItem]) -> Option<Vec<Column>> {
        let mut out = Vec::with_capacity(self.columns.len());
        for item in order {
            match item {
                ReorderItem::Column(id) => out.push(self.columns[self.index_of(id)?].clone()),
                ReorderItem::Group(g) => out.extend(
                    self.columns
                        .iter()
                        .filter(|c| c.group == Some(*g))
                        .cloned(),
                ),
            }
        }
        self.is_permutation(&out).then_some(out)
    }

    /// Reorders the members of `group` in place, leaving every other column where it is.
    pub fn reordered_in_group(&self, group: usize, ids: &[String]) -> Option<Vec<Column>> {
        let mut next = ids.iter();
        let mut out = Vec::with_capacity(self.columns.len());
        for c in &self.columns {
            if c.group == Some(group) {
                let member = &self.columns[self.index_of(next.next()?)?];
                if member.group != Some(group) {
                    return None;
                }
                out.push(member.clone());
            } else {
                out.push(c.clone());
            }
        }
        if next.next().is_some() {
            return None;
        }
        self.is_permutation(&out).then_some(out)
    }

    fn is_permutation(&self, candidate: &[Column]) -> bool {
        if candidate.len() != self.columns.len() {
            return false;
        }
        let mut seen = vec![false; self.columns.len()];
        for c in candidate {
            match self.index_of(&c.id) {
                Some(i) if !seen[i] => seen[i] = true,
                _ => return false,
            }
        }
        true
    }
}

/// An in-progress column resize, created by [`ColumnLayout::begin_resize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeDrag {
    column: usize,
    start_x: i64,
    min_x: i64,
    max_x: i64,
    previous: Vec<u32>,
    force_fit: bool,
}

impl ResizeDrag {
    pub fn column(&self) -> usize {
        self.column
    }

    /// Pointer clamp computed at drag start.
    pub fn bounds(&self) -> (i64, i64) {
        (self.min_x, self.max_x)
    }

    pub fn previous_widths(&self) -> &[u32] {
        &self.previous
    }

    /// Applies the pointer position `x` to the layout's widths.
    pub fn update(&self, layout: &mut ColumnLayout, x: i64) {
        if layout.columns.len() != self.previous.len() {
            return;
        }
        let d = x.clamp(self.min_x, self.max_x) - self.start_x;
        let prev = |j: usize| i64::from(self.previous[j]);
        let mut widths: Vec<i64> = layout.columns.iter().map(|c| i64::from(c.width)).collect();
        let right_columns = self.column + 1..layout.columns.len();

        if d < 0 {
            let mut x = d;
            for j in (0..=self.column).rev() {
                if layout.columns[j].resizable {
                    let min = i64::from(layout.effective_min_width(j)).min(prev(j));
                    if x != 0 && prev(j) + x < min {
                        x += prev(j) - min;
                        widths[j] = min;
                    } else {
                        widths[j] = prev(j) + x;
                        x = 0;
                    }
                }
            }
            if self.force_fit {
                let mut x = -d;
                for j in right_columns {
                    let c = &layout.columns[j];
                    if c.resizable {
                        match c.max_width.map(i64::from) {
                            Some(max) if x != 0 && max - prev(j) < x => {
                                x -= max - prev(j);
                                widths[j] = max;
                            }
                            _ => {
                                widths[j] = prev(j) + x;
                                x = 0;
                            }
                        }
                    }
                }
            }
        } else {
            let mut x = d;
            for j in (0..=self.column).rev() {
                let c = &layout.columns[j];
                if c.resizable {
                    match c.max_width.map(i64::from) {
                        Some(max) if x != 0 && max - prev(j) < x => {
                            x -= max - prev(j);
                            widths[j] = max;
                        }
                        _ => {
                            widths[j] = prev(j) + x;
                            x = 0;
                        }
                    }
                }
            }
            if self.force_fit {
                let mut x = -d;
                for j in right_columns {
                    if layout.columns[j].resizable {
                        let min = i64::from(layout.effective_min_width(j)).min(prev(j));
                        if x != 0 && prev(j) + x < min {
                            x += prev(j) - min;
                            widths[j] = min;
                        } else {
                            widths[j] = prev(j) + x;
                            x = 0;
                        }
                    }
                }
            }
        }

        for (c, w) in layout.columns.iter_mut().zip(widths) {
            c.width = u32::try_from(w.max(0)).unwrap_or(u32::MAX);
        }
        layout.update_caches();
    }

    /// Returns `true` when a `rerender_on_resize` column ended with a different width.
    pub fn finish(&self, layout: &ColumnLayout) -> bool {
        layout
            .columns
            .iter()
            .zip(&self.previous)
            .any(|(c, &prev)| c.rerender_on_resize && c.width != prev)
    }
}
