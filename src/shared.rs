use crate::schema::{self, MetadataAttr};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Nested track record as reconstructed from one flat row
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HubTrack {
    pub name:       Value,
    #[serde(rename = "type")]
    pub track_type: Value,
    pub label:      Value,
    pub url:        Value,
    /// Only the options whose cells were not the sentinel
    pub options:    Map<String, Value>,
    /// Metadata entries keyed by lowercase metadata key
    pub metadata:   BTreeMap<String, MetadataValue>,
    #[serde(flatten)]
    pub extension:  Extension,
}

/// Auxiliary browser fields attached to every reconstructed track. These are
/// never read from the table.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub is_selected:        bool,
    pub file_obj:           String,
    pub files:              Vec<Value>,
    pub tracks:             Vec<Value>,
    pub querygenome:        String,
    pub is_text:            bool,
    pub text_config:        Map<String, Value>,
    pub api_config:         Map<String, Value>,
    pub query_endpoint:     Map<String, Value>,
    pub datahub:            String,
    pub selected_tab_index: u32,
    pub track_added:        bool,
    pub url_error:          String,
}

impl Default for Extension {
    fn default() -> Self {
        Self {
            is_selected:        false,
            file_obj:           String::new(),
            files:              Vec::new(),
            tracks:             Vec::new(),
            querygenome:        String::new(),
            is_text:            false,
            text_config:        Map::new(),
            api_config:         Map::new(),
            query_endpoint:     Map::new(),
            datahub:            String::from("Custom hub"),
            selected_tab_index: 0,
            track_added:        false,
            url_error:          String::new(),
        }
    }
}

/// One metadata entry of a nested track. Serializes to the bare value for
/// `Plain` and to a `{name, color}` object otherwise.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Display name with no explicit color
    Plain(Value),
    Named {
        name:  Value,
        color: Value,
    },
    /// Color whose name cell was the sentinel; only produced when
    /// reconstructing from a table
    ColorOnly {
        color: Value,
    },
}

/// Reason a nested metadata value could not be read as a [`MetadataValue`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataShape {
    /// An object lacking `name` or `color`
    Incomplete,
    /// Neither a string nor an object; holds the JSON type that was found
    Unrecognized(&'static str),
}

impl MetadataValue {
    /// Rebuilds an entry from the attributes that survived sentinel
    /// filtering. A lone name collapses to the plain form.
    pub fn from_attributes(name: Option<Value>, color: Option<Value>) -> Option<Self> {
        match (name, color) {
            (Some(name), None) => Some(MetadataValue::Plain(name)),
            (Some(name), Some(color)) => Some(MetadataValue::Named { name, color }),
            (None, Some(color)) => Some(MetadataValue::ColorOnly { color }),
            (None, None) => None,
        }
    }

    /// Splits the entry into its `(Name, Color)` flat cells
    pub fn into_cells(self) -> (Value, Value) {
        match self {
            MetadataValue::Plain(name) => (name, schema::sentinel()),
            MetadataValue::Named { name, color } => (name, color),
            MetadataValue::ColorOnly { color } => (schema::sentinel(), color),
        }
    }
}

impl TryFrom<&Value> for MetadataValue {
    type Error = MetadataShape;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(_) => Ok(MetadataValue::Plain(value.clone())),
            Value::Object(fields) => {
                let name = fields.get(MetadataAttr::Name.nested_key());
                let color = fields.get(MetadataAttr::Color.nested_key());
                match (name, color) {
                    (Some(name), Some(color)) => Ok(MetadataValue::Named {
                        name:  name.clone(),
                        color: color.clone(),
                    }),
                    _ => Err(MetadataShape::Incomplete),
                }
            },
            other => Err(MetadataShape::Unrecognized(json_type(other))),
        }
    }
}

/// Human-readable JSON type name used in error messages
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
