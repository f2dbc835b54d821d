use crate::io::IoError;
use crate::schema;
use crate::table::Table;
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet};
use serde_json::{Number, Value};
use std::io::{Read, Seek, Write};

/// Largest integer an XLSX number cell holds exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Writes the table to the first worksheet of a new workbook, header row
/// first. Cells keep their JSON type: strings, numbers and booleans are
/// written as such.
pub fn write_workbook<W: Write>(mut writer: W, table: &Table) -> Result<(), IoError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, column) in table.columns().iter().enumerate() {
        let (row, col) = position(0, col, table)?;
        sheet.write_string(row, col, column.as_str())?;
    }
    for (index, row) in table.rows().enumerate() {
        for (col, cell) in row.cells().iter().enumerate() {
            let (row, col) = position(index + 1, col, table)?;
            write_cell(sheet, row, col, cell)?;
        }
    }

    writer.write_all(&workbook.save_to_buffer()?)?;
    Ok(())
}

/// Reads the first worksheet; its first row holds the column names. Empty
/// cells become the sentinel and typed cells keep their type.
pub fn read_workbook<R: Read + Seek>(reader: R) -> Result<Table, IoError> {
    let mut workbook: Xlsx<R> = Xlsx::new(reader)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IoError::NoWorksheet)??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(ToString::to_string).collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(columns.iter().cloned());
    for row in rows {
        table.push_row(columns.iter().cloned().zip(row.iter().map(read_cell)));
    }

    Ok(table)
}

fn position(row: usize, col: usize, table: &Table) -> Result<(RowNum, ColNum), IoError> {
    match (RowNum::try_from(row), ColNum::try_from(col)) {
        (Ok(row), Ok(col)) => Ok((row, col)),
        _ => Err(IoError::SheetBounds {
            rows:    table.len(),
            columns: table.columns().len(),
        }),
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &Value,
) -> Result<(), IoError> {
    match cell {
        Value::String(text) => sheet.write_string(row, col, text.as_str())?,
        Value::Bool(flag) => sheet.write_boolean(row, col, *flag)?,
        Value::Number(number) => match number.as_f64() {
            Some(float) => sheet.write_number(row, col, float)?,
            None => sheet.write_string(row, col, &number.to_string())?,
        },
        other => sheet.write_string(row, col, &other.to_string())?,
    };
    Ok(())
}

fn read_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => schema::sentinel(),
        Data::String(text) if text.is_empty() => schema::sentinel(),
        Data::String(text) => Value::String(text.clone()),
        Data::Bool(flag) => Value::Bool(*flag),
        Data::Int(int) => Value::Number((*int).into()),
        Data::Float(float) => read_number(*float),
        other => Value::String(other.to_string()),
    }
}

/// Spreadsheets store every number as a float; whole values come back as
/// integers
fn read_number(float: f64) -> Value {
    if float.fract() == 0.0 && float.abs() < MAX_EXACT_INT {
        return Value::Number((float as i64).into());
    }

    match Number::from_f64(float) {
        Some(number) => Value::Number(number),
        None => schema::sentinel(),
    }
}
