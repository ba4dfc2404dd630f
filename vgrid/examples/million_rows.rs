// Example: paged scrolling over a million rows.
use std::borrow::Cow;

use vgrid::{Column, DataProvider, Grid, GridOptions, MemoryHost, Record};

struct Index(u64);

impl Record for Index {
    type Id = u64;

    fn id(&self) -> u64 {
        self.0
    }

    fn value(&self, _field: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.0.to_string()))
    }
}

struct Sequence(Vec<Index>);

impl DataProvider for Sequence {
    type Item = Index;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn item(&self, row: usize) -> Option<&Index> {
        self.0.get(row)
    }

    fn index_of_id(&self, id: &u64) -> Option<usize> {
        usize::try_from(*id).ok().filter(|&i| i < self.0.len())
    }
}

fn main() -> vgrid::Result<()> {
    let data = Sequence((0..1_000_000).map(Index).collect());
    let columns = vec![Column::new("n", "N", "n").with_width(120)];
    let mut grid = Grid::new(MemoryHost::new(300, 500), data, columns, GridOptions::default())?;

    let pages = *grid.page_map();
    println!(
        "virtual height={} canvas height={} pages={} jump={:.1}",
        pages.total_height, pages.height, pages.pages, pages.jump
    );

    // A large jump from the host is deferred until the next tick.
    grid.handle_scroll(3_000_000, 0, 0);
    println!("pending={} state={:?}", grid.has_pending_render(), grid.scroll_state());
    grid.tick(50);
    println!("visible={:?} cached={}", grid.visible_range(), grid.cached_row_count());

    grid.scroll_to(12_500_000);
    grid.render();
    let state = grid.scroll_state();
    println!(
        "virtual_top={} real_top={} page={} first visible row={}",
        state.virtual_top(),
        state.scroll_top,
        state.page,
        grid.visible_range().top
    );
    Ok(())
}
