//! Conversion between nested track records and flat tables.
//!
//! The two directions are deliberately not symmetric: flattening always
//! writes every fixed column (absent fields become the sentinel), while
//! unflattening drops sentinel options and metadata cells and always appends
//! the default extension block.

mod errors;
mod flatten;
mod unflatten;

// Re-export the public surface
pub use crate::convert::errors::ConvertError;
pub use crate::convert::flatten::{flatten, marked_entries};
pub use crate::convert::unflatten::unflatten;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Extension;
    use serde_json::{json, Value};

    fn round_trip(records: &[Value]) -> Vec<Value> {
        let table = flatten(records).unwrap();
        unflatten(&table)
            .iter()
            .map(|track| serde_json::to_value(track).unwrap())
            .collect()
    }

    #[test]
    fn options_survive_round_trip_and_absent_options_stay_absent() {
        let records = vec![
            json!({
                "name": "full",
                "options": {
                    "label": "L",
                    "color": "#123456",
                    "backgroundColor": "#ffffff",
                    "height": 60,
                    "yScale": "auto",
                    "yMax": 10,
                    "group": 3
                }
            }),
            json!({ "name": "sparse", "options": { "height": 20 } }),
            json!({ "name": "none" }),
        ];
        let tracks = round_trip(&records);

        assert_eq!(tracks[0]["options"], records[0]["options"]);
        assert_eq!(tracks[1]["options"], json!({ "height": 20 }));
        assert_eq!(tracks[2]["options"], json!({}));
    }

    #[test]
    fn plain_metadata_collapses_back_to_string() {
        let tracks = round_trip(&[json!({ "metadata": { "sample": "Alice" } })]);
        assert_eq!(tracks[0]["metadata"], json!({ "sample": "Alice" }));
    }

    #[test]
    fn named_metadata_round_trips_identically() {
        let metadata = json!({ "sample": { "name": "Alice", "color": "#fff" } });
        let tracks = round_trip(&[json!({ "metadata": metadata.clone() })]);
        assert_eq!(tracks[0]["metadata"], metadata);
    }

    #[test]
    fn metadata_keys_come_back_lowercase() {
        let table = flatten(&[json!({ "metadata": { "CohortA": "x" } })]).unwrap();
        assert!(table.columns().iter().any(|c| c == "metadata.CohortA.Name"));

        let tracks = round_trip(&[json!({ "metadata": { "CohortA": "x" } })]);
        assert_eq!(tracks[0]["metadata"], json!({ "cohorta": "x" }));
    }

    #[test]
    fn union_columns_do_not_leak_into_other_tracks() {
        let tracks = round_trip(&[
            json!({ "name": "a", "metadata": { "cohorta": "x" } }),
            json!({ "name": "b" }),
        ]);
        assert_eq!(tracks[0]["metadata"], json!({ "cohorta": "x" }));
        assert_eq!(tracks[1]["metadata"], json!({}));
    }

    #[test]
    fn reconstructed_tracks_carry_exactly_the_extension_keys() {
        let extension = serde_json::to_value(Extension::default()).unwrap();
        let extension = extension.as_object().unwrap();
        assert_eq!(extension.len(), 13);

        let tracks = round_trip(&[json!({ "name": "x", "metadata": { "k": "v" } })]);
        let track = tracks[0].as_object().unwrap();
        for (key, value) in extension {
            assert_eq!(track.get(key), Some(value), "extension key {}", key);
        }
        let modeled = ["name", "type", "label", "url", "options", "metadata"];
        assert_eq!(track.len(), modeled.len() + extension.len());
    }

    #[test]
    fn option_spelled_as_sentinel_is_lost() {
        let tracks = round_trip(&[json!({ "options": { "label": "None" } })]);
        assert_eq!(tracks[0]["options"], json!({}));
    }

    #[test]
    fn fatal_metadata_produces_no_output() {
        let result = flatten(&[
            json!({ "metadata": { "a": "ok" } }),
            json!({ "metadata": { "b": true } }),
        ]);
        assert!(matches!(result, Err(ConvertError::Metadata { index: 1, .. })));
    }
}
