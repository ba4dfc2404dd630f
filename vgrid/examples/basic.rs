// Example: a small grid rendered into the in-memory host.
use std::borrow::Cow;

use vgrid::{Column, DataProvider, Grid, GridOptions, MemoryHost, Record};

struct Person {
    id: u32,
    name: String,
}

impl Record for Person {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "name" => Some(Cow::Borrowed(&self.name)),
            _ => None,
        }
    }
}

struct People(Vec<Person>);

impl DataProvider for People {
    type Item = Person;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn item(&self, row: usize) -> Option<&Person> {
        self.0.get(row)
    }

    fn index_of_id(&self, id: &u32) -> Option<usize> {
        self.0.iter().position(|p| p.id == *id)
    }
}

fn main() -> vgrid::Result<()> {
    let people = People(
        (0..50)
            .map(|id| Person {
                id,
                name: format!("Person {id}"),
            })
            .collect(),
    );
    let columns = vec![
        Column::new("id", "Id", "id").with_width(60),
        Column::new("name", "Name", "name").with_width(200),
    ];
    let mut grid = Grid::new(MemoryHost::new(260, 100), people, columns, GridOptions::default())?;

    println!("visible={:?}", grid.visible_range());
    println!("rendered={:?}", grid.rendered_range());
    println!("cached_rows={:?}", grid.cached_rows());

    grid.scroll_row_into_view(30, false);
    println!("after scroll: visible={:?}", grid.visible_range());

    if let Some(node) = grid.row_node(30) {
        if let Some(row) = grid.host().row(node) {
            println!("row 30: top={} css={:?} cells={}", row.top, row.css, row.cells.len());
        }
    }
    Ok(())
}
