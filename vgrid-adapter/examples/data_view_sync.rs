// Example: a data view behind a grid, with the row selection following item ids.
use std::borrow::Cow;

use vgrid::{CellPos, Column, Grid, GridOptions, MemoryHost, Record};
use vgrid_adapter::{DataView, RowSelectionModel, SelectionSync};

#[derive(Clone)]
struct Ticket {
    id: u32,
    title: String,
    votes: u32,
}

impl Record for Ticket {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "title" => Some(Cow::Borrowed(&self.title)),
            "votes" => Some(Cow::Owned(self.votes.to_string())),
            _ => None,
        }
    }
}

fn main() -> vgrid::Result<()> {
    let tickets = (0..200)
        .map(|id| Ticket {
            id,
            title: format!("Ticket #{id}"),
            votes: (id * 37) % 101,
        })
        .collect();
    let columns = vec![
        Column::new("id", "Id", "id").with_width(60),
        Column::new("title", "Title", "title").with_width(220),
        Column::new("votes", "Votes", "votes").with_width(80),
    ];
    let mut grid = Grid::new(
        MemoryHost::new(360, 200),
        DataView::from_items(tickets)?,
        columns,
        GridOptions::default(),
    )?;
    grid.set_selection_model(Box::new(RowSelectionModel::new(grid.columns().len())));

    let mut sync = SelectionSync::attach(&mut grid, true, true)?;
    sync.on_selected_row_ids_changed
        .subscribe(|_, args| println!("selected ids: {:?}", args.ids));

    grid.handle_click(CellPos::new(2, 1));
    sync.sync(&mut grid)?;

    // Most votes first; the selected ticket moves, the selection follows it.
    grid.with_data_mut(|view| view.sort_by(|a, b| a.votes.cmp(&b.votes), false));
    sync.sync(&mut grid)?;
    println!("selected rows after sort: {:?}", grid.selected_rows()?);

    let removed = grid.with_data_mut(|view| view.delete_item(&2))?;
    sync.sync(&mut grid)?;
    println!(
        "removed {:?}; still selected: {:?}; rows: {}",
        removed.title,
        sync.selected_ids(),
        grid.data_len()
    );

    sync.detach(&mut grid);
    Ok(())
}
