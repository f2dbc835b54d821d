use crate::io::{xlsx, IoError};
use crate::schema;
use crate::table::Table;
use csv::{ReaderBuilder, WriterBuilder};
use serde_json::Value;
use std::io::{Read, Seek, Write};
use std::path::Path;
use strum_macros::{EnumString, IntoStaticStr};

/// File layout used for flat tables
#[derive(EnumString, IntoStaticStr, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TableFormat {
    /// Spreadsheet workbook with typed cells
    Xlsx,
    /// Comma-separated text; every cell reads back as a string
    Csv,
    /// Tab-separated text; every cell reads back as a string
    Tsv,
}

impl TableFormat {
    /// Extension given to files written in this format
    pub fn extension(self) -> &'static str { self.into() }

    /// Infers the format from a file extension, if it is a known one
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "xlsx" => Some(TableFormat::Xlsx),
            "csv" => Some(TableFormat::Csv),
            "tsv" | "tab" | "txt" => Some(TableFormat::Tsv),
            _ => None,
        }
    }
}

/// Writes the table with a header row in column order
pub fn write_table<W: Write>(writer: W, table: &Table, format: TableFormat) -> Result<(), IoError> {
    match format {
        TableFormat::Xlsx => xlsx::write_workbook(writer, table),
        TableFormat::Csv => write_delimited(writer, table, b','),
        TableFormat::Tsv => write_delimited(writer, table, b'\t'),
    }
}

/// Reads a table whose first row holds the column names. Empty cells become
/// the sentinel.
pub fn read_table<R: Read + Seek>(reader: R, format: TableFormat) -> Result<Table, IoError> {
    match format {
        TableFormat::Xlsx => xlsx::read_workbook(reader),
        TableFormat::Csv => read_delimited(reader, b','),
        TableFormat::Tsv => read_delimited(reader, b'\t'),
    }
}

/// Strings are written raw; every other cell is written as its JSON text
fn write_delimited<W: Write>(writer: W, table: &Table, delimiter: u8) -> Result<(), IoError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.cells().iter().map(render_cell))?;
    }

    writer.flush()?;
    Ok(())
}

/// Text carries no cell types, so every non-empty cell stays a string
fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Table, IoError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let mut table = Table::new(columns.iter().cloned());
    for record in reader.records() {
        let record = record?;
        table.push_row(columns.iter().cloned().zip(record.iter().map(text_cell)));
    }

    Ok(table)
}

fn render_cell(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn text_cell(text: &str) -> Value {
    match text.is_empty() {
        true => schema::sentinel(),
        false => Value::String(text.to_owned()),
    }
}
