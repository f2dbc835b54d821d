use crate::convert::ConvertError;
use crate::schema::{self, MetadataAttr, MetadataColumn, FIXED_FIELDS};
use crate::shared::{MetadataShape, MetadataValue};
use crate::table::Table;
use crate::track::Track;
use serde_json::Value;

/// Flattens nested track records into one table, one row per record in input
/// order. The column set is the fixed columns followed by the union of every
/// record's metadata columns in first-seen order.
///
/// Fails on the first metadata value that is neither a string nor an object.
pub fn flatten(records: &[Value]) -> Result<Table, ConvertError> {
    let mut table = Table::new(FIXED_FIELDS.iter().map(|field| field.column));
    for (index, record) in records.iter().enumerate() {
        let row = flatten_track(index, Track::new(record))?;
        table.push_row(row);
    }

    Ok(table)
}

/// Produces the `(column, cell)` pairs for a single track
fn flatten_track(index: usize, track: Track<'_>) -> Result<Vec<(String, Value)>, ConvertError> {
    let mut cells: Vec<(String, Value)> = FIXED_FIELDS
        .iter()
        .map(|field| (field.column.to_owned(), track.field(field)))
        .collect();

    let metadata = match track.metadata() {
        Some(metadata) => metadata,
        None => return Ok(cells),
    };

    for (key, value) in metadata {
        let (name, color) = match MetadataValue::try_from(value) {
            Ok(entry) => entry.into_cells(),
            Err(MetadataShape::Incomplete) => (schema::error_marker(), schema::error_marker()),
            Err(MetadataShape::Unrecognized(found)) => {
                return Err(ConvertError::Metadata {
                    index,
                    key: key.clone(),
                    found,
                })
            },
        };

        cells.push((MetadataColumn::new(key, MetadataAttr::Name).column_name(), name));
        cells.push((MetadataColumn::new(key, MetadataAttr::Color).column_name(), color));
    }

    Ok(cells)
}

/// Lists `(row, metadata key)` for every metadata entry whose cells carry the
/// error marker, so incomplete entries can be reported for manual correction
pub fn marked_entries(table: &Table) -> Vec<(usize, String)> {
    let mut marked = Vec::new();
    for (index, row) in table.rows().enumerate() {
        for (column, cell) in row.iter() {
            let parsed = match MetadataColumn::parse(column) {
                Some(parsed) if parsed.attr == MetadataAttr::Name => parsed,
                _ => continue,
            };
            if cell.as_str() == Some(schema::ERROR_MARKER) {
                marked.push((index, parsed.key.to_owned()));
            }
        }
    }
    marked
}
