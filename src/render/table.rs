//! Table adapter: row records to a table view.

use crate::model::descriptor::scalar_to_string;
use crate::model::{Column, Row, Table, TableCell, TableRow};

/// Table adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableAdapter;

impl TableAdapter {
    /// Create a new table adapter.
    pub fn new() -> Self {
        Self
    }

    /// Render rows under the given columns.
    ///
    /// Cells missing from a row render empty. With no columns, the
    /// columns are derived from the row keys.
    pub fn render(&self, data: &[Row], columns: &[Column], title: Option<&str>) -> Table {
        let columns = effective_columns(data, columns);

        let header = TableRow::new(
            columns
                .iter()
                .map(|column| cell_for(column, column.display_label().to_string()))
                .collect(),
        );

        let mut table = Table::with_header(header);
        table.caption = title.map(str::to_string);

        for record in data {
            let cells = columns
                .iter()
                .map(|column| {
                    let text = record.get(&column.id).map(scalar_to_string).unwrap_or_default();
                    cell_for(column, text)
                })
                .collect();
            table.add_row(TableRow::new(cells));
        }

        table
    }
}

fn cell_for(column: &Column, text: String) -> TableCell {
    if column.numeric {
        TableCell::numeric(text)
    } else {
        TableCell::text(text)
    }
}

/// The columns a table is shown and exported with.
///
/// Declared columns win. Otherwise every key seen in the rows becomes a
/// column, in first-seen order.
pub fn effective_columns(data: &[Row], columns: &[Column]) -> Vec<Column> {
    if !columns.is_empty() {
        return columns.to_vec();
    }

    let mut derived: Vec<Column> = Vec::new();
    for record in data {
        for (key, value) in record {
            if derived.iter().any(|c| &c.id == key) {
                continue;
            }
            let column = if value.is_number() {
                Column::numeric(key.clone(), key.clone())
            } else {
                Column::new(key.clone(), key.clone())
            };
            derived.push(column);
        }
    }
    derived
}
