use crate::schema;
use serde_json::Value;
use std::collections::HashMap;

/// Rectangular flat table. Columns keep their insertion order; every row has
/// exactly one cell per column, with cells that were never supplied holding
/// the sentinel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    index:   HashMap<String, usize>,
    rows:    Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given columns. Repeated column names
    /// are kept only once.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for column in columns {
            table.add_column(column.into());
        }
        table
    }

    /// Appends a column if it is not already present, back-filling existing
    /// rows with the sentinel. Returns the column position.
    pub fn add_column(&mut self, column: String) -> usize {
        if let Some(&position) = self.index.get(&column) {
            return position;
        }

        let position = self.columns.len();
        self.index.insert(column.clone(), position);
        self.columns.push(column);
        for row in &mut self.rows {
            row.push(schema::sentinel());
        }
        position
    }

    /// Appends a row from `(column, cell)` pairs. Unknown columns are added
    /// to the table, columns missing from the row and null cells are filled
    /// with the sentinel.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut row: Vec<Value> = vec![schema::sentinel(); self.columns.len()];
        for (column, cell) in cells {
            let position = self.add_column(column);
            if position >= row.len() {
                row.resize(position + 1, schema::sentinel());
            }
            row[position] = match cell {
                Value::Null => schema::sentinel(),
                cell => cell,
            };
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] { &self.columns }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Gets the cell at the given row and column, if both exist
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let position = *self.index.get(column)?;
        self.rows.get(row).map(|cells| &cells[position])
    }

    pub fn row(&self, row: usize) -> Option<Row<'_>> {
        self.rows.get(row).map(|cells| Row { table: self, cells })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }
}

/// Borrowed view of one table row
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.table.index.get(column).map(|&position| &self.cells[position])
    }

    /// Iterates `(column, cell)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let (table, cells) = (self.table, self.cells);
        table.columns.iter().map(String::as_str).zip(cells.iter())
    }

    pub fn cells(&self) -> &'a [Value] { self.cells }
}
