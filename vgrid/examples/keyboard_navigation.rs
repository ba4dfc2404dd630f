// Example: keyboard navigation, sorting and event subscriptions.
use std::borrow::Cow;

use vgrid::{
    Column, ColumnKey, ColumnMetadata, Colspan, DataProvider, Grid, GridOptions, ItemMetadata,
    Key, MemoryHost, Modifiers, Record,
};

struct Cell(usize);

impl Record for Cell {
    type Id = usize;

    fn id(&self) -> usize {
        self.0
    }

    fn value(&self, field: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(format!("{field}{}", self.0)))
    }
}

struct Sheet(Vec<Cell>);

impl DataProvider for Sheet {
    type Item = Cell;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn item(&self, row: usize) -> Option<&Cell> {
        self.0.get(row)
    }

    fn index_of_id(&self, id: &usize) -> Option<usize> {
        (*id < self.0.len()).then_some(*id)
    }

    fn item_metadata(&self, row: usize) -> Option<ItemMetadata> {
        // Every fifth row shows a title spanning the whole width.
        (row % 5 == 0).then(|| {
            ItemMetadata::default().with_column(
                ColumnKey::Index(0),
                ColumnMetadata::default().with_colspan(Colspan::Rest),
            )
        })
    }
}

fn main() -> vgrid::Result<()> {
    let columns = ["a", "b", "c", "d"]
        .iter()
        .map(|f| Column::new(*f, f.to_uppercase(), *f).with_width(80).with_sortable(true))
        .collect();
    let options = GridOptions::default().with_multi_column_sort(true);
    let mut grid = Grid::new(
        MemoryHost::new(320, 200),
        Sheet((0..100).map(Cell).collect()),
        columns,
        options,
    )?;

    grid.events.active_cell_changed.subscribe(|_, args| {
        println!("active cell -> {:?}", args.active);
    });
    grid.events.sort.subscribe(|_, args| println!("sort -> {args:?}"));

    grid.set_active_cell(1, 3);
    for key in [Key::Down, Key::Down, Key::Down, Key::Down, Key::Tab, Key::PageDown] {
        let handled = grid.handle_key_down(key, Modifiers::NONE);
        println!("{key:?}: handled={handled} pos_x={:?}", grid.active_pos_x());
    }

    grid.handle_header_click(Some(1), Modifiers::NONE);
    grid.handle_header_click(Some(2), Modifiers::shift());
    println!("sort columns: {:?}", grid.sort_columns());
    Ok(())
}
