use crate::schema::{self, FieldPath, FixedField, MetadataAttr, MetadataColumn, FIXED_FIELDS};
use crate::shared::{Extension, HubTrack, MetadataValue};
use crate::table::{Row, Table};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Rebuilds one nested track per table row, in row order. Never fails:
/// missing columns read as the sentinel and unrecognized columns are ignored.
pub fn unflatten(table: &Table) -> Vec<HubTrack> {
    table.rows().map(|row| unflatten_row(&row)).collect()
}

fn unflatten_row(row: &Row<'_>) -> HubTrack {
    HubTrack {
        name:       scalar(row, &schema::NAME),
        track_type: scalar(row, &schema::TYPE),
        label:      scalar(row, &schema::LABEL),
        url:        scalar(row, &schema::URL),
        options:    options(row),
        metadata:   metadata(row),
        extension:  Extension::default(),
    }
}

/// Top-level fields are copied as-is, sentinel included
fn scalar(row: &Row<'_>, field: &FixedField) -> Value {
    row.get(field.column)
        .cloned()
        .unwrap_or_else(schema::sentinel)
}

/// Collects every option whose cell is not the sentinel
fn options(row: &Row<'_>) -> Map<String, Value> {
    let mut options = Map::new();
    for field in FIXED_FIELDS {
        let key = match field.path {
            FieldPath::Option(key) => key,
            FieldPath::Top(_) => continue,
        };

        let cell = match option_cell(row, field) {
            Some(cell) if !schema::is_sentinel(cell) => cell,
            _ => continue,
        };
        options.insert(key.to_owned(), cell.clone());
    }
    options
}

fn option_cell<'a>(row: &Row<'a>, field: &FixedField) -> Option<&'a Value> {
    match row.get(field.column) {
        None if *field == schema::OPTIONS_BACKGROUND_COLOR => {
            row.get(schema::LEGACY_BACKGROUND_COLOR_COLUMN)
        },
        found => found,
    }
}

/// Groups the non-sentinel `metadata.<key>.<Attr>` cells by lowercase key and
/// folds each group back into a metadata value
fn metadata(row: &Row<'_>) -> BTreeMap<String, MetadataValue> {
    let mut grouped: BTreeMap<String, (Option<Value>, Option<Value>)> = BTreeMap::new();
    for (column, cell) in row.iter() {
        let parsed = match MetadataColumn::parse(column) {
            Some(parsed) => parsed,
            None => continue,
        };
        if schema::is_sentinel(cell) {
            continue;
        }

        let (name, color) = grouped.entry(parsed.key.to_lowercase()).or_default();
        match parsed.attr {
            MetadataAttr::Name => *name = Some(cell.clone()),
            MetadataAttr::Color => *color = Some(cell.clone()),
        }
    }

    grouped
        .into_iter()
        .filter_map(|(key, (name, color))| {
            MetadataValue::from_attributes(name, color).map(|value| (key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table_of(columns: &[&str], rows: &[Vec<Value>]) -> Table {
        let mut table = Table::new(columns.iter().copied());
        for row in rows {
            table.push_row(
                columns
                    .iter()
                    .map(|column| column.to_string())
                    .zip(row.iter().cloned()),
            );
        }
        table
    }

    #[test]
    fn scalars_copied_and_sentinel_options_dropped() {
        let table = table_of(
            &["name", "type", "label", "url", "options_color", "options_height"],
            &[vec![
                json!("t"),
                json!("bigwig"),
                json!("None"),
                json!("https://example.org/t.bw"),
                json!("#000"),
                json!("None"),
            ]],
        );
        let tracks = unflatten(&table);

        assert_eq!(tracks.len(), 1);
        let track = &tracks[0];
        assert_eq!(track.name, json!("t"));
        assert_eq!(track.track_type, json!("bigwig"));
        assert_eq!(track.label, json!("None"));
        assert_eq!(track.url, json!("https://example.org/t.bw"));
        assert_eq!(Value::Object(track.options.clone()), json!({ "color": "#000" }));
    }

    #[test]
    fn missing_top_level_columns_read_as_sentinel() {
        let table = table_of(&["options_group"], &[vec![json!(2)]]);
        let track = &unflatten(&table)[0];

        assert_eq!(track.name, json!("None"));
        assert_eq!(track.url, json!("None"));
        assert_eq!(Value::Object(track.options.clone()), json!({ "group": 2 }));
    }

    #[test]
    fn legacy_background_color_column_is_accepted() {
        let table = table_of(&["options_bgColor"], &[vec![json!("#eee")]]);
        let track = &unflatten(&table)[0];
        assert_eq!(
            Value::Object(track.options.clone()),
            json!({ "backgroundColor": "#eee" })
        );
    }

    #[test]
    fn metadata_keys_lowercased_and_collapsed() {
        let table = table_of(
            &[
                "metadata.CohortA.Name",
                "metadata.CohortA.Color",
                "metadata.Tissue.Name",
                "metadata.Tissue.Color",
                "metadata.Unused.Name",
                "metadata.Unused.Color",
            ],
            &[vec![
                json!("Alice"),
                json!("None"),
                json!("liver"),
                json!("#f00"),
                json!("None"),
                json!("None"),
            ]],
        );
        let track = &unflatten(&table)[0];

        let mut expected = BTreeMap::new();
        expected.insert(String::from("cohorta"), MetadataValue::Plain(json!("Alice")));
        expected.insert(String::from("tissue"), MetadataValue::Named {
            name:  json!("liver"),
            color: json!("#f00"),
        });
        assert_eq!(track.metadata, expected);
    }

    #[test]
    fn color_without_name_keeps_record_shape() {
        let table = table_of(
            &["metadata.assay.Name", "metadata.assay.Color"],
            &[vec![json!("None"), json!("#0f0")]],
        );
        let track = &unflatten(&table)[0];
        assert_eq!(
            serde_json::to_value(&track.metadata).unwrap(),
            json!({ "assay": { "color": "#0f0" } })
        );
    }

    #[test]
    fn extension_block_ignores_table_content() {
        let table = table_of(
            &["isSelected", "datahub", "urlError"],
            &[vec![json!(true), json!("Mine"), json!("broken")]],
        );
        let track = &unflatten(&table)[0];
        assert_eq!(track.extension, Extension::default());

        let value = serde_json::to_value(track).unwrap();
        assert_eq!(value["isSelected"], json!(false));
        assert_eq!(value["datahub"], json!("Custom hub"));
        assert_eq!(value["urlError"], json!(""));
    }

    #[test]
    fn output_follows_row_order() {
        let rows: Vec<Vec<Value>> = (0..4).map(|i| vec![json!(format!("t{}", i))]).collect();
        let tracks = unflatten(&table_of(&["name"], &rows));

        let names: Vec<Value> = tracks.into_iter().map(|track| track.name).collect();
        assert_eq!(names, vec![json!("t0"), json!("t1"), json!("t2"), json!("t3")]);
    }

    #[test]
    fn empty_table_yields_no_tracks() {
        assert!(unflatten(&Table::default()).is_empty());
    }
}
