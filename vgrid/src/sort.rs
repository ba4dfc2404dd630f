use crate::events::SortArgs;
use crate::{Column, Modifiers, SortColumn};

/// Sorting switches read by [`apply_header_click`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortMode {
    pub multi_column: bool,
    pub three_steps: bool,
}

/// Applies a click on a sortable header to the sort order.
///
/// - A plain click sorts by `column` alone, toggling direction if it was already sorted. With
///   three-step sorting, a column that has left its default direction is cleared instead.
/// - Shift (or ctrl/meta) adds the column to a multi-column sort.
/// - Ctrl/meta on a column that is already sorted removes it from a multi-column sort.
///
/// Returns the notification payload, or `None` when `column` is not sortable.
pub fn apply_header_click(
    sort_columns: &mut Vec<SortColumn>,
    column: &Column,
    modifiers: Modifiers,
    mode: SortMode,
) -> Option<SortArgs> {
    if !column.sortable {
        return None;
    }
    let meta = modifiers.meta || modifiers.ctrl;

    let mut found: Option<(usize, Option<bool>)> = None;
    if let Some(i) = sort_columns.iter().position(|s| s.column_id == column.id) {
        let current = sort_columns[i].sort_asc;
        let next = if mode.three_steps && current != column.default_sort_asc {
            None
        } else {
            Some(!current)
        };
        found = Some((i, next));
    }

    let cleared = matches!(found, Some((_, None))) && mode.three_steps;
    let mut sort_asc = found.and_then(|(_, asc)| asc);

    if (meta && mode.multi_column) || cleared {
        if let Some((i, _)) = found {
            sort_columns.remove(i);
        }
    } else {
        let keep_others = (modifiers.shift || meta) && mode.multi_column;
        match found {
            Some((i, asc)) => {
                let asc = asc.unwrap_or(true);
                if keep_others {
                    sort_columns[i].sort_asc = asc;
                } else {
                    sort_columns.clear();
                    sort_columns.push(SortColumn::new(column.id.clone(), asc));
                }
                sort_asc = Some(asc);
            }
            None => {
                if !keep_others {
                    sort_columns.clear();
                }
                sort_columns.push(SortColumn::new(column.id.clone(), column.default_sort_asc));
                sort_asc = Some(column.default_sort_asc);
            }
        }
    }

    Some(if mode.multi_column {
        SortArgs::Multi {
            sort_columns: sort_columns.clone(),
        }
    } else {
        SortArgs::Single {
            column_id: column.id.clone(),
            sort_asc,
        }
    })
}
