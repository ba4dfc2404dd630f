use crate::*;

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_i64(&mut self, start: i64, end_exclusive: i64) -> i64 {
        start + self.gen_range_u64(0, (end_exclusive - start) as u64) as i64
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

#[derive(Clone, Debug)]
struct Row {
    id: u64,
    label: Option<String>,
}

impl Record for Row {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "label" => Some(match &self.label {
                Some(l) => Cow::Borrowed(l.as_str()),
                None => Cow::Owned(format!("Row {}", self.id)),
            }),
            _ => None,
        }
    }
}

/// Rows with `id == index` until reordered; lookups fall back to a scan.
#[derive(Debug, Default)]
struct TestData {
    rows: Vec<Row>,
    meta: HashMap<usize, ItemMetadata>,
    pending: Vec<DataNotification>,
}

impl TestData {
    fn new(n: usize) -> Self {
        Self {
            rows: (0..n as u64).map(|id| Row { id, label: None }).collect(),
            ..Self::default()
        }
    }

    fn with_metadata(mut self, row: usize, meta: ItemMetadata) -> Self {
        self.meta.insert(row, meta);
        self
    }

    fn truncate(&mut self, len: usize) {
        let previous = self.rows.len();
        self.rows.truncate(len);
        self.pending.push(DataNotification::RowCountChanged {
            previous,
            current: self.rows.len(),
        });
    }

    fn relabel(&mut self, row: usize, label: &str) {
        self.rows[row].label = Some(label.to_owned());
        self.pending.push(DataNotification::RowsChanged { rows: vec![row] });
    }
}

impl DataProvider for TestData {
    type Item = Row;

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn item(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    fn index_of_id(&self, id: &u64) -> Option<usize> {
        let guess = *id as usize;
        if self.rows.get(guess).is_some_and(|r| r.id == *id) {
            return Some(guess);
        }
        self.rows.iter().position(|r| r.id == *id)
    }

    fn item_metadata(&self, row: usize) -> Option<ItemMetadata> {
        self.meta.get(&row).cloned()
    }

    fn drain_notifications(&mut self) -> Vec<DataNotification> {
        std::mem::take(&mut self.pending)
    }
}

type TestGrid = Grid<TestData, MemoryHost>;

fn columns(n: usize) -> Vec<Column> {
    (0..n)
        .map(|i| {
            let field = if i == 0 { "id" } else { "label" };
            Column::new(format!("c{i}"), format!("C{i}"), field).with_width(100)
        })
        .collect()
}

fn grid_with(data: TestData, cols: Vec<Column>, w: u32, h: u32, options: GridOptions) -> TestGrid {
    Grid::new(MemoryHost::new(w, h), data, cols, options).expect("grid")
}

fn grid(rows: usize, cols: usize, w: u32, h: u32) -> TestGrid {
    grid_with(TestData::new(rows), columns(cols), w, h, GridOptions::default())
}

fn expected_rows(g: &TestGrid) -> Vec<usize> {
    let mut rows: Vec<usize> = g.rendered_range().rows(g.data_len()).collect();
    if let Some(active) = g.active_cell() {
        if !rows.contains(&active.row) {
            rows.push(active.row);
            rows.sort_unstable();
        }
    }
    rows
}

fn assert_host_matches_cache(g: &TestGrid) {
    assert_eq!(g.host().visible_row_count(), g.cached_row_count());
    let attached: Vec<usize> = g
        .host()
        .rows()
        .filter(|(_, r)| !r.hidden)
        .map(|(_, r)| r.row)
        .collect();
    let unique: HashSet<usize> = attached.iter().copied().collect();
    assert_eq!(unique.len(), attached.len(), "duplicate row nodes");
}

fn cell_html(g: &TestGrid, row: usize, cell: usize) -> String {
    let node = g.cell_node(row, cell).expect("cell node");
    g.host().cell(node).expect("host cell").html.clone()
}

#[test]
fn initial_render_fills_the_rendered_range() {
    let g = grid(100, 3, 300, 100);

    let range = g.rendered_range();
    assert_eq!((range.top, range.bottom), (0, 9));
    assert_eq!((range.left_px, range.right_px), (0, 300));
    assert_eq!(g.cached_rows(), (0..10).collect::<Vec<_>>());
    assert_eq!(g.host().stats().row_batches, 1);
    assert_eq!(g.host().cell_count(), 30);
    assert_eq!(g.host().canvas_size(), (300, 2500));
    assert_eq!(g.num_visible_rows(), 4);
    assert!(g.has_vertical_scrollbar());
    assert!(!g.has_horizontal_scrollbar());
    assert_host_matches_cache(&g);

    assert_eq!(cell_html(&g, 3, 0), "3");
    assert_eq!(cell_html(&g, 3, 1), "Row 3");
    let row_node = g.row_node(3).unwrap();
    let row = g.host().row(row_node).unwrap();
    assert_eq!(row.css, "vgrid-row");
    assert_eq!(row.top, 75);
    let cell = g.host().cell(g.cell_node(3, 2).unwrap()).unwrap();
    assert_eq!(cell.css, "vgrid-cell l2 r2");
}

#[test]
fn missing_viewport_is_a_configuration_error() {
    let err = Grid::new(
        MemoryHost::detached(),
        TestData::new(10),
        columns(2),
        GridOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.invariant().is_none());
}

#[test]
fn cache_tracks_rendered_range_under_random_scrolls() {
    let mut g = grid(1000, 5, 300, 200);
    let mut rng = Lcg::new(0x5eed);
    let max_top = 1000 * 25 - 200;
    let max_left = 500 - 300;
    let mut now = 0u64;

    for _ in 0..300 {
        now += 16;
        match rng.gen_range_usize(0, 4) {
            0 => {
                let top = rng.gen_range_i64(0, max_top + 1);
                let left = rng.gen_range_i64(0, max_left + 1);
                g.handle_scroll(top, left, now);
            }
            1 => {
                let start = rng.gen_range_usize(0, 1000);
                let rows: Vec<usize> = (start..(start + 5).min(1000)).collect();
                g.invalidate_rows(&rows);
            }
            2 => {
                let top = g.scroll_state().virtual_top();
                let delta = rng.gen_range_i64(-150, 150);
                g.handle_scroll((top + delta).clamp(0, max_top), g.scroll_state().scroll_left, now);
            }
            _ => {
                let y = rng.gen_range_i64(0, max_top + 1);
                g.scroll_to(y);
                if rng.gen_bool() {
                    g.invalidate_all_rows();
                }
            }
        }
        g.render();

        assert_eq!(g.cached_rows(), expected_rows(&g));
        assert_host_matches_cache(&g);
        assert!(!g.has_pending_render());
    }
}

#[test]
fn active_row_survives_cleanup() {
    let mut g = grid(200, 3, 300, 100);
    g.set_active_cell(3, 1);
    g.scroll_to(100 * 25);
    g.render();

    let cached = g.cached_rows();
    assert!(cached.contains(&3));
    assert_eq!(cached, expected_rows(&g));
    assert_eq!(g.active_cell(), Some(CellPos::new(3, 1)));
    assert!(g.active_cell_node().is_some());
}

#[test]
fn active_cell_node_is_reresolved_after_invalidation() {
    let mut g = grid(100, 3, 300, 100);
    g.set_active_cell(3, 1);
    let before = g.active_cell_node().expect("active node");
    assert!(g.host().cell(before).unwrap().active);

    g.invalidate_all_rows();
    assert_eq!(g.active_cell_node(), None);
    assert_eq!(g.active_cell(), Some(CellPos::new(3, 1)));

    g.render();
    let after = g.active_cell_node().expect("fresh node");
    assert_ne!(before, after);
    assert_eq!(g.active_cell(), Some(CellPos::new(3, 1)));
    let cell = g.host().cell(after).unwrap();
    assert!(cell.active);
    assert!(cell.css.contains("active"));
    assert_eq!(Some(cell.row_node), g.row_node(3));
    assert!(g.host().cell(before).is_none());
}

#[test]
fn million_rows_scroll_through_pages() {
    let mut g = grid(1_000_000, 3, 300, 500);
    let pages = *g.page_map();
    assert!(pages.is_paged());
    assert_eq!(pages.total_height, 25_000_000);
    assert_eq!(pages.height, 6_000_000);
    assert_eq!(pages.pages, 416);
    assert_eq!(g.host().canvas_size().1, 6_000_000);

    g.scroll_to(12_500_000);
    g.render();

    let state = g.scroll_state();
    assert_eq!(state.page, 208);
    assert_eq!(state.offset, 9_522_892);
    assert_eq!(state.scroll_top, 2_977_108);
    assert_eq!(state.virtual_top(), 12_500_000);
    assert_eq!(g.host().scroll_position().0, 2_977_108);
    assert_eq!(g.visible_range().top, 500_000);
    assert!(g.cached_rows().contains(&500_000));
    assert_eq!(g.cached_rows(), expected_rows(&g));
    assert_host_matches_cache(&g);

    let node = g.row_node(500_000).unwrap();
    assert_eq!(g.host().row(node).unwrap().top, 2_977_108);
    assert_eq!(g.row_top(500_000), 2_977_108);
}

#[test]
fn large_jump_switches_page_and_defers_render() {
    let mut g = grid(1_000_000, 3, 300, 500);

    g.handle_scroll(3_000_000, 0, 1_000);
    let state = g.scroll_state();
    assert_eq!(state.page, 208);
    assert_eq!(state.offset, 9_522_892);
    assert_eq!(g.cached_row_count(), 0);
    assert!(g.has_pending_render());

    assert!(!g.tick(1_049));
    assert!(g.tick(1_050));
    assert!(!g.has_pending_render());

    let top = g.visible_range().top;
    assert_eq!(top, (3_000_000 + 9_522_892) / 25);
    assert!(g.cached_rows().contains(&top));
    assert_eq!(g.cached_rows(), expected_rows(&g));
}

#[test]
fn deferred_render_is_rearmed_by_each_scroll() {
    let mut g = grid(1000, 3, 300, 100);

    g.handle_scroll(10, 0, 0);
    assert!(!g.has_pending_render());
    assert_eq!(g.cached_rows(), (0..10).collect::<Vec<_>>());

    g.handle_scroll(30, 0, 5);
    assert!(!g.has_pending_render());
    assert_eq!(g.cached_rows(), expected_rows(&g));

    g.handle_scroll(5000, 0, 100);
    assert!(g.has_pending_render());
    assert_eq!(g.visible_range().top, 200);
    assert!(!g.cached_rows().contains(&200));

    g.handle_scroll(6000, 0, 120);
    assert!(!g.tick(150));
    assert!(g.tick(170));
    assert!(g.cached_rows().contains(&240));
    assert_eq!(g.cached_rows(), expected_rows(&g));
}

#[test]
fn force_sync_scrolling_renders_large_jumps_immediately() {
    let options = GridOptions::default().with_force_sync_scrolling(true);
    let mut g = grid_with(TestData::new(1000), columns(3), 300, 100, options);

    g.handle_scroll(5000, 0, 0);
    assert!(!g.has_pending_render());
    assert!(g.cached_rows().contains(&200));
}

#[test]
fn scroll_events_fire_with_positions() {
    let mut g = grid(1000, 3, 300, 100);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    g.events.scroll.subscribe(move |_, args| sink.borrow_mut().push(*args));
    let viewport = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&viewport);
    g.events
        .viewport_changed
        .subscribe(move |_, _| counter.set(counter.get() + 1));

    g.handle_scroll(50, 0, 0);
    g.handle_scroll(50, 0, 16);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].scroll_top, 50);
    assert_eq!(viewport.get(), 1);
}

#[test]
fn wheel_row_is_hidden_then_removed() {
    let mut g = grid(100, 3, 300, 100);
    let wheel = g.row_node(2).unwrap();
    g.handle_mouse_wheel(Some(wheel));

    g.scroll_to(50 * 25);
    g.render();
    assert!(!g.cached_rows().contains(&2));
    assert!(g.host().row(wheel).unwrap().hidden);
    assert_eq!(g.host().hidden_row_count(), 1);
    assert_host_matches_cache(&g);

    let other = g.row_node(50).unwrap();
    g.handle_mouse_wheel(Some(other));
    assert!(g.host().row(wheel).is_none());
    assert_eq!(g.host().hidden_row_count(), 0);
}

#[test]
fn shrinking_data_resets_out_of_range_active_cell() {
    let mut g = grid(100, 3, 300, 100);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    g.events
        .active_cell_changed
        .subscribe(move |_, args| sink.borrow_mut().push(args.active));

    g.set_active_cell(5, 0);
    g.with_data_mut(|d| d.truncate(3));

    assert_eq!(g.active_cell(), None);
    assert_eq!(g.cached_rows(), vec![0, 1, 2]);
    assert_eq!(g.host().visible_row_count(), 3);
    assert_eq!(g.host().canvas_size().1, 100);
    assert!(!g.has_vertical_scrollbar());
    assert_eq!(
        *changes.borrow(),
        vec![Some(CellPos::new(5, 0)), None]
    );
}

#[test]
fn shrinking_data_while_scrolled_clamps_to_new_bottom() {
    let mut g = grid(1000, 3, 300, 100);
    g.scroll_to(900 * 25);
    g.render();

    g.with_data_mut(|d| d.truncate(50));
    assert_eq!(g.scroll_state().scroll_top, 50 * 25 - 100);
    assert_eq!(g.cached_rows(), expected_rows(&g));
    assert!(g.cached_rows().iter().all(|&r| r < 50));
}

#[test]
fn rendered_range_stays_ordered_before_data_sync() {
    let mut g = grid(1000, 3, 300, 100);
    g.scroll_to(900 * 25);
    g.render();

    g.data_mut().truncate(50);
    let range = g.rendered_range();
    assert!(range.top <= range.bottom);
    assert_eq!(range.bottom, 49);

    g.data_mut().truncate(0);
    let range = g.rendered_range();
    assert_eq!((range.top, range.bottom), (0, 0));
    assert!(range.rows(g.data_len()).next().is_none());

    g.sync_data();
    assert_eq!(g.cached_row_count(), 0);
}

#[test]
fn changed_rows_are_rebuilt() {
    let mut g = grid(100, 3, 300, 100);
    let before = g.row_node(1).unwrap();
    g.with_data_mut(|d| d.relabel(1, "changed"));

    let after = g.row_node(1).unwrap();
    assert_ne!(before, after);
    assert_eq!(cell_html(&g, 1, 1), "changed");
    assert_eq!(cell_html(&g, 2, 1), "Row 2");
}

#[test]
fn update_cell_rewrites_html_in_place() {
    let mut g = grid(100, 3, 300, 100);
    let node = g.cell_node(4, 1).unwrap();
    g.data_mut().rows[4].label = Some("<b>".to_owned());
    g.update_cell(4, 1);

    assert_eq!(g.cell_node(4, 1), Some(node));
    assert_eq!(cell_html(&g, 4, 1), "&lt;b&gt;");

    g.data_mut().rows[4].label = Some("x".to_owned());
    g.update_row(4);
    assert_eq!(cell_html(&g, 4, 1), "x");
    assert_eq!(cell_html(&g, 4, 2), "x");
    assert_eq!(g.host().stats().html_updates, 4);
}

#[test]
fn colspan_cells_are_removed_as_a_unit() {
    let meta = ItemMetadata::default().with_column(
        ColumnKey::Id("c0".to_owned()),
        ColumnMetadata::default().with_colspan(Colspan::Span(2)),
    );
    let data = TestData::new(20).with_metadata(0, meta);
    let options = GridOptions::default().with_force_sync_scrolling(true);
    let mut g = grid_with(data, columns(8), 100, 100, options);

    let row0 = g.row_node(0).unwrap();
    let row1 = g.row_node(1).unwrap();
    assert_eq!(g.host().row_columns(row0), vec![0, 2]);
    assert_eq!(g.host().row_columns(row1), vec![0, 1, 2]);
    let spanned = g.host().cell(g.cell_node(0, 0).unwrap()).unwrap();
    assert_eq!(spanned.css, "vgrid-cell l0 r1");
    assert_eq!(spanned.colspan, 2);

    g.handle_scroll(0, 350, 0);
    assert_eq!(g.host().row_columns(row0), vec![2, 3, 4, 5]);
    assert_eq!(g.host().row_columns(row1), vec![2, 3, 4, 5]);
    assert_eq!(g.cell_node(0, 0), None);
    assert_eq!(g.host().header_scroll_left(), 350);
}

#[test]
fn rest_colspan_covers_remaining_columns() {
    let meta = ItemMetadata::default().with_column(
        ColumnKey::Index(1),
        ColumnMetadata::default().with_colspan(Colspan::Rest),
    );
    let data = TestData::new(5).with_metadata(0, meta);
    let g = grid_with(data, columns(4), 400, 200, GridOptions::default());

    let row0 = g.row_node(0).unwrap();
    assert_eq!(g.host().row_columns(row0), vec![0, 1]);
    let cell = g.host().cell(g.cell_node(0, 1).unwrap()).unwrap();
    assert_eq!(cell.css, "vgrid-cell l1 r3");
}

#[test]
fn navigation_skips_unfocusable_columns() {
    let mut cols = columns(3);
    cols[1].focusable = false;
    let mut g = grid_with(TestData::new(10), cols, 300, 100, GridOptions::default());

    g.set_active_cell(0, 0);
    assert!(g.navigate_right());
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 2)));
    assert!(!g.navigate_right());
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 2)));
    assert!(g.navigate_left());
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 0)));
    assert_eq!(g.host().focused(), Some(FocusSink::Leading));
}

#[test]
fn cell_metadata_beats_row_and_column_focusability() {
    let meta = ItemMetadata::default().with_focusable(false).with_column(
        ColumnKey::Id("c2".to_owned()),
        ColumnMetadata::default().with_focusable(true),
    );
    let mut cols = columns(3);
    cols[0].selectable = false;
    let data = TestData::new(10).with_metadata(1, meta);
    let g = grid_with(data, cols, 300, 100, GridOptions::default());

    assert!(!g.can_cell_be_active(1, 0));
    assert!(!g.can_cell_be_active(1, 1));
    assert!(g.can_cell_be_active(1, 2));
    assert!(g.can_cell_be_active(2, 0));
    assert!(!g.can_cell_be_active(10, 0));
    assert!(!g.can_cell_be_active(0, 3));
    assert!(!g.can_cell_be_selected(0, 0));
    assert!(g.can_cell_be_selected(0, 1));
}

#[test]
fn vertical_moves_remember_column() {
    let meta = ItemMetadata::default().with_column(
        ColumnKey::Index(0),
        ColumnMetadata::default().with_colspan(Colspan::Rest),
    );
    let data = TestData::new(10).with_metadata(1, meta);
    let mut g = grid_with(data, columns(3), 300, 200, GridOptions::default());

    g.set_active_cell(0, 2);
    assert!(g.navigate_down());
    assert_eq!(g.active_cell(), Some(CellPos::new(1, 0)));
    assert_eq!(g.active_pos_x(), Some(2));
    assert!(g.navigate_down());
    assert_eq!(g.active_cell(), Some(CellPos::new(2, 2)));
}

#[test]
fn tab_wraps_between_rows() {
    let mut g = grid(10, 3, 300, 100);
    g.set_active_cell(0, 2);

    assert!(g.handle_key_down(Key::Tab, Modifiers::NONE));
    assert_eq!(g.active_cell(), Some(CellPos::new(1, 0)));
    assert!(g.handle_key_down(Key::Tab, Modifiers::shift()));
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 2)));
    assert!(!g.handle_key_down(Key::Other(65), Modifiers::NONE));
    assert!(!g.handle_key_down(Key::Down, Modifiers::ctrl()));
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 2)));
}

#[test]
fn next_without_active_cell_starts_top_left() {
    let mut g = grid(10, 3, 300, 100);
    assert!(!g.navigate_down());
    assert!(g.navigate_next());
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 0)));
}

#[test]
fn row_only_navigation_falls_back_to_vertical_moves() {
    let options = GridOptions::default().with_cell_navigation(false);
    let mut g = grid_with(TestData::new(10), columns(3), 300, 100, options);
    g.set_active_cell(2, 1);

    assert!(!g.navigate_right());
    assert!(g.navigate_next());
    assert_eq!(g.active_cell(), Some(CellPos::new(3, 1)));
    assert!(g.navigate_prev());
    assert_eq!(g.active_cell(), Some(CellPos::new(2, 1)));
    let node = g.active_cell_node().unwrap();
    assert!(!g.host().cell(node).unwrap().active);
    assert!(g.host().row(g.row_node(2).unwrap()).unwrap().active);
}

#[test]
fn page_down_moves_viewport_and_active_row() {
    let mut g = grid(100, 3, 300, 100);
    g.set_active_cell(0, 1);

    assert!(g.handle_key_down(Key::PageDown, Modifiers::NONE));
    assert_eq!(g.scroll_state().scroll_top, 100);
    assert_eq!(g.active_cell(), Some(CellPos::new(4, 1)));

    g.navigate_page_up();
    assert_eq!(g.scroll_state().scroll_top, 0);
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 1)));
}

#[test]
fn page_down_lands_on_spanning_cell() {
    let meta = ItemMetadata::default().with_column(
        ColumnKey::Index(0),
        ColumnMetadata::default().with_colspan(Colspan::Span(2)),
    );
    let data = TestData::new(100).with_metadata(4, meta);
    let mut g = grid_with(data, columns(3), 300, 100, GridOptions::default());
    g.set_active_cell(0, 1);

    g.navigate_page_down();
    assert_eq!(g.active_cell(), Some(CellPos::new(4, 0)));
    let node = g.active_cell_node().expect("spanning cell node");
    assert_eq!(g.host().cell(node).unwrap().colspan, 2);

    g.navigate_page_up();
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 1)));
    assert!(g.active_cell_node().is_some());
}

#[test]
fn key_down_handler_can_suppress_navigation() {
    let mut g = grid(10, 3, 300, 100);
    g.set_active_cell(0, 0);
    let later = Rc::new(Cell::new(false));
    let flag = Rc::clone(&later);
    g.events
        .key_down
        .subscribe(|e, args| {
            if args.key == Key::Down {
                e.stop_immediate_propagation();
            }
        });
    g.events.key_down.subscribe(move |_, _| flag.set(true));

    assert!(g.handle_key_down(Key::Down, Modifiers::NONE));
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 0)));
    assert!(!later.get());

    assert!(g.handle_key_down(Key::Right, Modifiers::NONE));
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 1)));
    assert!(later.get());
}

#[test]
fn click_activates_cell_unless_stopped() {
    let mut g = grid(20, 3, 300, 100);
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    let id = g
        .events
        .click
        .subscribe(move |_, _| counter.set(counter.get() + 1));

    g.handle_click(CellPos::new(2, 1));
    assert_eq!(g.active_cell(), Some(CellPos::new(2, 1)));
    assert_eq!(g.host().focused(), Some(FocusSink::Trailing));

    g.events.unsubscribe(id);
    g.events
        .click
        .subscribe(|e, _| e.stop_immediate_propagation());
    let e = g.handle_click(CellPos::new(3, 0));
    assert!(e.is_immediate_propagation_stopped());
    assert_eq!(g.active_cell(), Some(CellPos::new(2, 1)));
    assert_eq!(clicks.get(), 1);

    let e = g.handle_click(CellPos::new(99, 0));
    assert_eq!(e, EventData::new());
}

#[test]
fn three_step_sort_cycles_back_to_unsorted() {
    let cols = vec![Column::new("a", "A", "id").with_sortable(true)];
    let options = GridOptions::default().with_three_steps_sorting(true);
    let mut g = grid_with(TestData::new(5), cols, 300, 100, options);
    let sorts = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&sorts);
    g.events.sort.subscribe(move |_, args| sink.borrow_mut().push(args.clone()));
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    g.events
        .header_click
        .subscribe(move |_, _| counter.set(counter.get() + 1));

    for _ in 0..4 {
        g.handle_header_click(Some(0), Modifiers::NONE);
    }

    let single = |asc: Option<bool>| SortArgs::Single {
        column_id: "a".to_owned(),
        sort_asc: asc,
    };
    assert_eq!(
        *sorts.borrow(),
        vec![single(Some(true)), single(Some(false)), single(None), single(Some(true))]
    );
    assert_eq!(clicks.get(), 4);
    assert_eq!(g.sort_columns(), &[SortColumn::new("a", true)]);
    assert_eq!(g.host().headers()[0].sort_asc, Some(true));
}

#[test]
fn multi_column_sort_appends_and_removes() {
    let cols = vec![
        Column::new("a", "A", "id").with_sortable(true),
        Column::new("b", "B", "id").with_sortable(true),
        Column::new("c", "C", "id"),
    ];
    let options = GridOptions::default().with_multi_column_sort(true);
    let mut g = grid_with(TestData::new(5), cols, 300, 100, options);

    g.handle_header_click(Some(0), Modifiers::NONE);
    g.handle_header_click(Some(1), Modifiers::shift());
    assert_eq!(
        g.sort_columns(),
        &[SortColumn::new("a", true), SortColumn::new("b", true)]
    );
    g.handle_header_click(Some(1), Modifiers::shift());
    assert_eq!(
        g.sort_columns(),
        &[SortColumn::new("a", true), SortColumn::new("b", false)]
    );
    assert_eq!(g.host().headers()[1].sort_asc, Some(false));
    assert_eq!(g.host().headers()[1].sort_priority, Some(1));

    g.handle_header_click(Some(0), Modifiers::ctrl());
    assert_eq!(g.sort_columns(), &[SortColumn::new("b", false)]);
    assert_eq!(g.host().headers()[0].sort_asc, None);

    g.handle_header_click(Some(2), Modifiers::NONE);
    assert_eq!(g.sort_columns(), &[SortColumn::new("b", false)]);
}

#[test]
fn column_positions_stay_monotonic_under_resizes() {
    let cols: Vec<Column> = columns(6);
    let options = GridOptions::default().with_sync_column_cell_resize(true);
    let mut g = grid_with(TestData::new(50), cols, 400, 200, options);
    let mut rng = Lcg::new(42);

    for _ in 0..100 {
        let column = rng.gen_range_usize(0, 6);
        let x = rng.gen_range_i64(0, 1000);
        if g.begin_column_resize(column, x) {
            let to = x + rng.gen_range_i64(-300, 300);
            g.drag_column_resize(to);
            assert!(g.end_column_resize());
        }
        if rng.gen_range_usize(0, 10) == 0 {
            g.autosize_columns();
        }

        let layout = g.layout();
        for i in 0..layout.len() {
            let w = i64::from(layout.columns()[i].width);
            assert!(w >= 30);
            assert_eq!(layout.pos_right(i), layout.pos_left(i) + w);
            if i + 1 < layout.len() {
                assert!(layout.pos_left(i) <= layout.pos_left(i + 1));
            }
        }
        assert_eq!(g.canvas_width(), layout.total_width());
    }
}

#[test]
fn force_fit_autosize_matches_viewport() {
    let options = GridOptions::default().with_force_fit_columns(true);
    let g = grid_with(TestData::new(10), columns(4), 300, 400, options);
    let widths: Vec<u32> = g.columns().iter().map(|c| c.width).collect();
    assert_eq!(widths.iter().sum::<u32>(), 300);
    assert_eq!(g.canvas_width(), 300);

    let grow: Vec<Column> = (0..3)
        .map(|i| Column::new(format!("g{i}"), "G", "id").with_width(50))
        .collect();
    let mut layout = ColumnLayout::new(grow, 80, 0);
    layout.autosize(300);
    assert_eq!(layout.total_width(), 300);
}

#[test]
fn autosize_stops_at_max_widths() {
    let cols: Vec<Column> = (0..3)
        .map(|i| {
            Column::new(format!("m{i}"), "M", "id")
                .with_width(50)
                .with_max_width(Some(80))
        })
        .collect();
    let mut layout = ColumnLayout::new(cols, 80, 0);
    layout.autosize(300);
    assert_eq!(layout.total_width(), 240);

    let fixed: Vec<Column> = (0..2)
        .map(|i| Column::new(format!("f{i}"), "F", "id").with_width(200).with_resizable(false))
        .collect();
    let mut layout = ColumnLayout::new(fixed, 80, 0);
    layout.autosize(100);
    assert_eq!(layout.total_width(), 400);
}

#[test]
fn resize_drag_clamps_to_minimum_widths() {
    let mut g = grid(10, 3, 300, 100);
    let resized = Rc::new(Cell::new(0));
    let counter = Rc::clone(&resized);
    g.events
        .columns_resized
        .subscribe(move |_, _| counter.set(counter.get() + 1));

    assert!(g.begin_column_resize(1, 500));
    assert!(g.is_resizing());
    g.drag_column_resize(200);
    assert!(g.end_column_resize());

    let widths: Vec<u32> = g.columns().iter().map(|c| c.width).collect();
    assert_eq!(widths, vec![30, 30, 100]);
    assert_eq!(g.canvas_width(), 160);
    assert_eq!(resized.get(), 1);
    assert!(!g.end_column_resize());
}

#[test]
fn resize_respects_cell_padding_floor() {
    let cols = vec![
        Column::new("a", "A", "id")
            .with_width(30)
            .with_max_width(Some(30)),
        Column::new("b", "B", "label").with_width(30),
    ];
    let host = MemoryHost::new(300, 100).with_cell_box(CellBoxMetrics {
        header_width_diff: 40,
        cell_width_diff: 0,
        cell_height_diff: 0,
    });
    let mut g: TestGrid = Grid::new(host, TestData::new(3), cols, GridOptions::default()).unwrap();
    let widths = |g: &TestGrid| g.columns().iter().map(|c| c.width).collect::<Vec<u32>>();
    assert_eq!(g.layout().absolute_min_width(), 40);
    assert_eq!(widths(&g), vec![30, 40]);

    let drag = g.layout().begin_resize(0, 100, false).unwrap();
    assert_eq!(drag.bounds(), (100, 100));
    assert!(g.begin_column_resize(0, 100));
    g.drag_column_resize(105);
    g.drag_column_resize(0);
    assert!(g.end_column_resize());
    assert_eq!(widths(&g), vec![30, 40]);

    assert!(g.begin_column_resize(1, 200));
    g.drag_column_resize(260);
    assert!(g.end_column_resize());
    assert_eq!(widths(&g), vec![30, 100]);

    assert!(g.begin_column_resize(1, 300));
    assert_eq!(g.layout().begin_resize(1, 300, false).unwrap().bounds().0, 240);
    g.drag_column_resize(0);
    assert!(g.end_column_resize());
    assert_eq!(widths(&g), vec![30, 40]);
    assert_eq!(g.canvas_width(), 70);
}

#[test]
fn autosize_stops_at_cell_padding_floor() {
    let mut cols: Vec<Column> = (0..3)
        .map(|i| Column::new(format!("p{i}"), "P", "id").with_width(100))
        .collect();
    cols.push(Column::new("narrow", "N", "id").with_width(30).with_max_width(Some(30)));
    let mut layout = ColumnLayout::new(cols, 80, 40);
    layout.autosize(100);

    let widths: Vec<u32> = layout.columns().iter().map(|c| c.width).collect();
    assert_eq!(widths, vec![40, 40, 40, 30]);
    for i in 0..layout.len() {
        assert_eq!(layout.pos_right(i), layout.pos_left(i) + i64::from(widths[i]));
    }

    layout.set_absolute_min_width(50);
    let widths: Vec<u32> = layout.columns().iter().map(|c| c.width).collect();
    assert_eq!(widths, vec![50, 50, 50, 30]);
    assert_eq!(layout.total_width(), 180);

    let options = GridOptions::default().with_force_fit_columns(true);
    let host = MemoryHost::new(100, 100).with_cell_box(CellBoxMetrics {
        header_width_diff: 40,
        cell_width_diff: 0,
        cell_height_diff: 0,
    });
    let g: TestGrid = Grid::new(host, TestData::new(10), columns(4), options).unwrap();
    assert!(g.columns().iter().all(|c| c.width == 40));
    assert_eq!(g.canvas_width(), 160);
}

#[test]
fn force_fit_resize_moves_width_to_the_right() {
    let options = GridOptions::default().with_force_fit_columns(true);
    let mut g = grid_with(TestData::new(10), columns(3), 300, 400, options);
    assert!(!g.begin_column_resize(2, 300));

    assert!(g.begin_column_resize(0, 100));
    g.drag_column_resize(150);
    g.end_column_resize();

    let widths: Vec<u32> = g.columns().iter().map(|c| c.width).collect();
    assert_eq!(widths, vec![150, 50, 100]);
    assert_eq!(g.canvas_width(), 300);
}

#[test]
fn reorder_columns_rebuilds_rows() {
    let mut g = grid(10, 3, 300, 100);
    let reordered = Rc::new(Cell::new(0));
    let counter = Rc::clone(&reordered);
    g.events
        .columns_reordered
        .subscribe(move |_, _| counter.set(counter.get() + 1));

    let order = ["c2", "c0", "c1"].map(|id| ReorderItem::Column(id.to_owned()));
    assert!(g.reorder_columns(&order));
    let ids: Vec<&str> = g.columns().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c2", "c0", "c1"]);
    assert_eq!(g.column_index("c0"), Some(1));
    assert_eq!(cell_html(&g, 3, 1), "3");
    assert_eq!(reordered.get(), 1);

    let partial = [ReorderItem::Column("c0".to_owned())];
    assert!(!g.reorder_columns(&partial));
    assert_eq!(reordered.get(), 1);
}

#[test]
fn reorder_keeps_groups_together() {
    let cols = vec![
        Column::new("a", "A", "id").with_group(Some(1)),
        Column::new("b", "B", "id").with_group(Some(1)),
        Column::new("c", "C", "id"),
    ];
    let mut g = grid_with(TestData::new(5), cols, 300, 100, GridOptions::default());
    g.set_grouped_columns(g.columns().to_vec(), vec![ColumnGroup::new(1, "AB")]);

    assert!(g.reorder_columns(&[ReorderItem::Column("c".to_owned()), ReorderItem::Group(1)]));
    let ids: Vec<&str> = g.columns().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c", "a", "b"]);

    assert!(g.reorder_columns_in_group(1, &["b".to_owned(), "a".to_owned()]));
    let ids: Vec<&str> = g.columns().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c", "b", "a"]);
    assert_eq!(g.column_groups().len(), 1);

    assert!(!g.reorder_columns_in_group(1, &["c".to_owned(), "a".to_owned()]));
}

#[test]
fn formatter_precedence() {
    let cell_fmt: Formatter = Arc::new(|_: &FormatContext<'_>| "cell".to_owned());
    let row_fmt: Formatter = Arc::new(|_: &FormatContext<'_>| "row".to_owned());
    let meta = ItemMetadata {
        formatter: Some(row_fmt),
        ..ItemMetadata::default()
    }
    .with_column(
        ColumnKey::Id("c1".to_owned()),
        ColumnMetadata::default().with_formatter(cell_fmt),
    )
    .with_css_classes("special");
    let mut cols = columns(3);
    cols[2] = cols[2].clone().with_formatter(|_| "col".to_owned());
    let options = GridOptions::default().with_formatter_factory(Some(|c: &Column| {
        (c.id == "c0").then(|| Arc::new(|_: &FormatContext<'_>| "factory".to_owned()) as Formatter)
    }));
    let data = TestData::new(5).with_metadata(0, meta);
    let g = grid_with(data, cols, 300, 100, options);

    assert_eq!(cell_html(&g, 0, 0), "row");
    assert_eq!(cell_html(&g, 0, 1), "cell");
    assert_eq!(cell_html(&g, 0, 2), "row");
    assert_eq!(cell_html(&g, 1, 0), "factory");
    assert_eq!(cell_html(&g, 1, 1), "Row 1");
    assert_eq!(cell_html(&g, 1, 2), "col");
    let row = g.host().row(g.row_node(0).unwrap()).unwrap();
    assert_eq!(row.css, "vgrid-row special");
}

struct AcceptAll {
    ranges: Vec<CellRange>,
    follow_active: bool,
}

impl SelectionModel for AcceptAll {
    fn set_selected_ranges(&mut self, ranges: Vec<CellRange>) -> Vec<CellRange> {
        self.ranges = ranges;
        self.ranges.clone()
    }

    fn selected_ranges(&self) -> &[CellRange] {
        &self.ranges
    }

    fn active_cell_changed(&mut self, active: Option<CellPos>) -> Option<Vec<CellRange>> {
        if !self.follow_active {
            return None;
        }
        Some(active.map(|p| CellRange::cell(p.row, p.cell)).into_iter().collect())
    }
}

#[test]
fn selection_requires_a_model() {
    let mut g = grid(10, 3, 300, 100);
    let err = g.set_selected_rows(&[1]).unwrap_err();
    assert_eq!(err.invariant(), Some(&InvariantViolation::SelectionModelMissing));
    assert!(g.selected_rows().is_err());
}

#[test]
fn selected_rows_are_highlighted() {
    let mut g = grid(10, 3, 300, 100);
    g.set_selection_model(Box::new(AcceptAll {
        ranges: Vec::new(),
        follow_active: false,
    }));
    let changed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changed);
    g.events
        .selected_rows_changed
        .subscribe(move |_, args| sink.borrow_mut().push(args.rows.clone()));

    g.set_selected_rows(&[2, 1]).unwrap();
    assert_eq!(g.selected_rows().unwrap(), &[2, 1]);
    assert_eq!(g.selection_model().unwrap().selected_ranges().len(), 2);
    let cell = g.host().cell(g.cell_node(1, 0).unwrap()).unwrap();
    assert!(cell.css.ends_with(" selected"));
    let cell = g.host().cell(g.cell_node(3, 0).unwrap()).unwrap();
    assert!(!cell.css.contains("selected"));
    assert_eq!(g.cell_css_styles("selected").unwrap().len(), 2);

    g.set_selected_rows(&[]).unwrap();
    let cell = g.host().cell(g.cell_node(1, 0).unwrap()).unwrap();
    assert!(!cell.css.contains("selected"));
    assert_eq!(*changed.borrow(), vec![vec![2, 1], vec![]]);
}

#[test]
fn selection_model_follows_active_cell() {
    let mut g = grid(10, 3, 300, 100);
    g.set_selection_model(Box::new(AcceptAll {
        ranges: Vec::new(),
        follow_active: true,
    }));
    g.set_active_cell(4, 2);
    assert_eq!(g.selected_rows().unwrap(), &[4]);
    let styles = g.cell_css_styles("selected").unwrap();
    assert_eq!(styles.get(&4).unwrap().get("c2").map(String::as_str), Some("selected"));
    assert!(styles.get(&4).unwrap().get("c1").is_none());
}

#[test]
fn cell_css_styles_rerender_affected_rows() {
    let mut g = grid(10, 3, 300, 100);
    let untouched = g.row_node(5).unwrap();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    g.events
        .cell_css_styles_changed
        .subscribe(move |_, args| sink.borrow_mut().push((args.key.clone(), args.hash.is_some())));

    let mut hash = CellCssHash::new();
    hash.entry(2)
        .or_default()
        .insert("c1".to_owned(), "warn".to_owned());
    g.set_cell_css_styles("highlight", hash);
    let cell = g.host().cell(g.cell_node(2, 1).unwrap()).unwrap();
    assert_eq!(cell.css, "vgrid-cell l1 r1 warn");
    assert_eq!(g.row_node(5), Some(untouched));

    assert!(g.remove_cell_css_styles("highlight").is_some());
    assert!(g.remove_cell_css_styles("highlight").is_none());
    let cell = g.host().cell(g.cell_node(2, 1).unwrap()).unwrap();
    assert_eq!(cell.css, "vgrid-cell l1 r1");
    assert_eq!(
        *events.borrow(),
        vec![("highlight".to_owned(), true), ("highlight".to_owned(), false)]
    );
}

#[test]
fn geometry_lookups_map_back_to_cells() {
    let mut g = grid(100, 3, 300, 100);
    assert_eq!(g.cell_from_point(150, 60), Some(CellPos::new(2, 1)));
    assert_eq!(g.cell_from_point(350, 60), None);
    assert_eq!(g.cell_from_point(10, 100 * 25), None);

    let bx = g.cell_node_box(2, 1).unwrap();
    assert_eq!((bx.top, bx.left, bx.bottom, bx.right), (50, 100, 74, 200));
    assert!(g.cell_node_box(2, 3).is_none());

    let row_node = g.row_node(2).unwrap();
    let cell_node = g.cell_node(2, 1).unwrap();
    assert_eq!(g.cell_from_nodes(row_node, cell_node), Some(CellPos::new(2, 1)));
    assert_eq!(g.cell_from_nodes(row_node, NodeHandle(u64::MAX)), None);

    g.scroll_row_into_view(50, false);
    let visible = g.visible_range();
    assert!(visible.contains_row(50));
    assert_eq!(g.scroll_state().scroll_top, 51 * 25 - 100);
    g.scroll_row_to_top(20);
    assert_eq!(g.visible_range().top, 20);
}

#[test]
fn scroll_cell_into_view_scrolls_horizontally() {
    let mut g = grid(100, 8, 300, 100);
    g.scroll_cell_into_view(0, 5, false);
    assert_eq!(g.scroll_state().scroll_left, 300);
    assert_eq!(g.host().scroll_position().1, 300);
    g.scroll_cell_into_view(0, 1, false);
    assert_eq!(g.scroll_state().scroll_left, 100);
}

#[test]
fn full_width_rows_stretch_the_canvas() {
    let options = GridOptions::default().with_full_width_rows(true);
    let g = grid_with(TestData::new(2), columns(2), 500, 100, options);
    assert_eq!(g.canvas_width(), 500);
    assert_eq!(g.host().column_offsets()[1].right, 300);
}

#[test]
fn paging_can_be_disabled() {
    let options = GridOptions::default().with_virtual_paging(false);
    let mut g = grid_with(TestData::new(1_000_000), columns(2), 200, 500, options);
    assert!(!g.page_map().is_paged());
    g.scroll_to(12_500_000);
    assert_eq!(g.scroll_state().offset, 0);
    assert_eq!(g.scroll_state().scroll_top, 12_500_000);
}

#[test]
fn resize_canvas_picks_up_new_viewport() {
    let mut g = grid(100, 3, 300, 100);
    g.host_mut().set_viewport(Some(ViewportSize::new(300, 200)));
    g.resize_canvas();
    assert_eq!(g.num_visible_rows(), 8);
    assert_eq!(g.cached_rows(), expected_rows(&g));
    assert_eq!(g.rendered_range().bottom, 9 + 8);

    g.host_mut().set_viewport(None);
    g.resize_canvas();
    assert_eq!(g.num_visible_rows(), 8);
}

#[test]
fn set_columns_drops_out_of_range_active_cell() {
    let mut g = grid(10, 3, 300, 100);
    g.set_active_cell(1, 2);
    g.set_columns(columns(2));
    assert_eq!(g.active_cell(), None);
    assert_eq!(g.host().cell_count(), g.cached_row_count() * 2);
    assert_eq!(g.host().headers().len(), 2);
}

#[test]
fn set_data_replaces_provider() {
    let mut g = grid(100, 3, 300, 100);
    g.scroll_to(50 * 25);
    g.render();
    let old = g.set_data(TestData::new(20), true);
    g.render();
    assert_eq!(old.len(), 100);
    assert_eq!(g.data_len(), 20);
    assert_eq!(g.scroll_state().scroll_top, 0);
    assert_eq!(g.cached_rows(), expected_rows(&g));
}

#[test]
fn options_update_rerenders_with_new_row_height() {
    let mut g = grid(100, 3, 300, 100);
    g.update_options(|o| o.row_height = 50);
    assert_eq!(g.options().row_height, 50);
    assert_eq!(g.host().canvas_size().1, 5000);
    let node = g.row_node(3).unwrap();
    assert_eq!(g.host().row(node).unwrap().top, 150);
    assert_eq!(g.cached_rows(), expected_rows(&g));
}

struct Recorder {
    inits: Rc<Cell<usize>>,
    destroys: Rc<Cell<usize>>,
    subs: Subscriptions,
}

impl Plugin<TestData, MemoryHost> for Recorder {
    fn init(&mut self, grid: &mut TestGrid) {
        self.inits.set(self.inits.get() + 1);
        let id = grid.events.before_destroy.subscribe(|_, _| {});
        self.subs.push(id);
    }

    fn destroy(&mut self, grid: &mut TestGrid) {
        self.destroys.set(self.destroys.get() + 1);
        grid.events.unsubscribe_all(&mut self.subs);
    }
}

#[test]
fn plugins_and_destroy_release_everything() {
    let mut g = grid(100, 3, 300, 100);
    let inits = Rc::new(Cell::new(0));
    let destroys = Rc::new(Cell::new(0));
    let recorder = || Recorder {
        inits: Rc::clone(&inits),
        destroys: Rc::clone(&destroys),
        subs: Subscriptions::new(),
    };

    let first = g.register_plugin(Box::new(recorder()));
    g.register_plugin(Box::new(recorder()));
    assert_eq!(inits.get(), 2);
    assert_eq!(g.plugin_count(), 2);
    assert_eq!(g.events.before_destroy.handler_count(), 2);

    assert!(g.unregister_plugin(first).is_some());
    assert!(g.unregister_plugin(first).is_none());
    assert_eq!(destroys.get(), 1);
    assert_eq!(g.events.before_destroy.handler_count(), 1);

    let wheel = g.row_node(1).unwrap();
    g.handle_mouse_wheel(Some(wheel));
    let before = Rc::new(Cell::new(false));
    let flag = Rc::clone(&before);
    g.events.before_destroy.subscribe(move |_, _| flag.set(true));

    let (data, host) = g.destroy();
    assert!(before.get());
    assert_eq!(destroys.get(), 2);
    assert_eq!(data.len(), 100);
    assert_eq!(host.rows().count(), 0);
    assert_eq!(host.cell_count(), 0);
}

#[test]
fn events_respect_stop_flags() {
    let mut event: Event<u32> = Event::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let a = Rc::clone(&calls);
    event.subscribe(move |e, v| {
        a.borrow_mut().push(("a", *v));
        if *v == 2 {
            e.stop_propagation();
        }
    });
    let b = Rc::clone(&calls);
    let id = event.subscribe(move |_, v| b.borrow_mut().push(("b", *v)));

    let e = event.notify(&1);
    assert!(!e.is_propagation_stopped());
    let e = event.notify(&2);
    assert!(e.is_propagation_stopped());
    assert_eq!(*calls.borrow(), vec![("a", 1), ("b", 1), ("a", 2)]);

    let mut stopped = EventData::new();
    stopped.prevent_default();
    stopped.stop_immediate_propagation();
    event.notify_with(&mut stopped, &3);
    assert!(stopped.is_default_prevented());
    assert_eq!(calls.borrow().len(), 3);

    assert!(event.unsubscribe(id));
    assert!(!event.unsubscribe(id));
    assert_eq!(event.handler_count(), 1);
}

#[test]
fn cell_range_normalizes_and_formats() {
    let r = CellRange::new(5, 3, 1, 0);
    assert_eq!((r.from_row, r.from_cell, r.to_row, r.to_cell), (1, 0, 5, 3));
    assert!(r.contains(3, 2));
    assert!(!r.contains(6, 2));
    assert!(!r.is_single_row());
    assert_eq!(r.to_string(), "(1:0 - 5:3)");
    assert_eq!(CellRange::cell(2, 4).to_string(), "(2:4)");
    assert_eq!(CellRange::full_row(7, 4), CellRange::new(7, 0, 7, 3));

    let rows = ranges_to_rows(&[CellRange::new(1, 0, 3, 0), CellRange::cell(2, 1), CellRange::cell(0, 0)]);
    assert_eq!(rows, vec![1, 2, 3, 0]);
    assert_eq!(rows_to_ranges(&[4], 3), vec![CellRange::new(4, 0, 4, 2)]);
}

#[test]
fn colspan_resolution_clamps_to_grid() {
    assert_eq!(Colspan::Span(3).resolve(0, 5), 3);
    assert_eq!(Colspan::Span(9).resolve(3, 5), 2);
    assert_eq!(Colspan::Span(0).resolve(1, 5), 1);
    assert_eq!(Colspan::Rest.resolve(2, 5), 3);
    assert_eq!(Colspan::Rest.resolve(7, 5), 1);
}

#[test]
fn page_map_offsets_cross_boundaries() {
    let metrics = PlatformMetrics::default();
    let map = PageMap::compute(1_000_000, 25, 500, &metrics, true);
    assert_eq!(map.page_at(0), 0);
    assert_eq!(map.page_at(59_999), 0);
    assert_eq!(map.page_at(60_000), 1);
    assert_eq!(map.page_at(i64::MAX / 2), map.pages - 1);
    assert_eq!(map.offset_of(0), 0);
    assert_eq!(map.offset_of(1), 45_783);
    assert_eq!(map.offset_of(map.pages - 1), 19_000_000);

    let small = PageMap::compute(10, 25, 500, &metrics, true);
    assert!(!small.is_paged());
    assert_eq!(small.total_height, 500);
    assert_eq!(small.page_at(100), 0);
}

#[test]
fn header_markup_tracks_columns() {
    let cols = vec![
        Column::new("a", "A", "id")
            .with_width(120)
            .with_tool_tip("tip")
            .with_header_css_class("hdr"),
        Column::new("b", "B", "id").with_resizable(false),
    ];
    let host = MemoryHost::new(300, 100).with_cell_box(CellBoxMetrics {
        header_width_diff: 10,
        cell_width_diff: 8,
        cell_height_diff: 2,
    });
    let g: TestGrid = Grid::new(host, TestData::new(3), cols, GridOptions::default()).unwrap();

    let headers = g.host().headers();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].width, 110);
    assert_eq!(headers[0].tool_tip.as_deref(), Some("tip"));
    assert_eq!(headers[0].css.as_deref(), Some("hdr"));
    assert!(headers[0].resizable_handle);
    assert!(headers[1].resizable_handle);
    assert_eq!(g.layout().absolute_min_width(), 10);

    let mut g = g;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    g.events
        .header_mouse_enter
        .subscribe(move |_, args| sink.borrow_mut().push(args.column_id.clone()));
    g.handle_header_mouse_enter(Some(1));
    g.handle_header_mouse_enter(None);
    assert_eq!(*seen.borrow(), vec![Some("b".to_owned()), None]);
}

#[test]
fn active_cell_changed_fires_once_per_move() {
    let mut g = grid(10, 3, 300, 100);
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    g.events
        .active_cell_changed
        .subscribe(move |_, _| counter.set(counter.get() + 1));

    g.set_active_cell(1, 1);
    g.set_active_cell(1, 1);
    assert!(g.navigate_up());
    assert_eq!(g.active_cell(), Some(CellPos::new(0, 1)));
    g.reset_active_cell();
    assert_eq!(count.get(), 3);
    assert_eq!(g.active_cell(), None);

    let moved = Rc::new(Cell::new(0));
    let counter = Rc::clone(&moved);
    g.events
        .active_cell_position_changed
        .subscribe(move |_, _| counter.set(counter.get() + 1));
    g.handle_active_cell_position_change();
    g.goto_cell(2, 2);
    g.handle_active_cell_position_change();
    assert_eq!(moved.get(), 1);
}
