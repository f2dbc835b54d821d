//! Field schema shared by the flattening and unflattening directions.
//!
//! The fixed part of a flat row is described by [`FIXED_FIELDS`], a static
//! table pairing each nested field path with its flat column name. The
//! dynamic part follows a single naming convention,
//! `metadata.<key>.<Attr>`, rendered and parsed only through
//! [`MetadataColumn`].

use serde_json::Value;
use strum_macros::{EnumString, IntoStaticStr};

/// Literal written into a flat cell whenever a field is absent
pub const SENTINEL: &str = "None";

/// Literal written into both metadata cells of a `{name, color}` entry that
/// is missing one of its sub-fields
pub const ERROR_MARKER: &str = "Error";

/// Prefix of every dynamically-named metadata column
const METADATA_PREFIX: &str = "metadata.";

/// Column name still found in spreadsheets produced by older exports for
/// `options.backgroundColor`
pub const LEGACY_BACKGROUND_COLOR_COLUMN: &str = "options_bgColor";

/// Builds a fresh sentinel cell
pub fn sentinel() -> Value { Value::String(String::from(SENTINEL)) }

/// Builds a fresh error marker cell
pub fn error_marker() -> Value { Value::String(String::from(ERROR_MARKER)) }

/// Whether a flat cell holds the sentinel
pub fn is_sentinel(cell: &Value) -> bool {
    matches!(cell, Value::String(s) if s == SENTINEL)
}

/// Location of a fixed field inside a nested track record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldPath {
    /// Key directly on the track object
    Top(&'static str),
    /// Key inside the track's `options` object
    Option(&'static str),
}

/// One entry of the fixed nested <-> flat mapping table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedField {
    pub column: &'static str,
    pub path:   FieldPath,
}

impl FixedField {
    const fn top(key: &'static str) -> Self {
        Self {
            column: key,
            path:   FieldPath::Top(key),
        }
    }

    const fn option(column: &'static str, key: &'static str) -> Self {
        Self {
            column,
            path: FieldPath::Option(key),
        }
    }
}

pub const NAME: FixedField = FixedField::top("name");
pub const TYPE: FixedField = FixedField::top("type");
pub const LABEL: FixedField = FixedField::top("label");
pub const URL: FixedField = FixedField::top("url");
pub const OPTIONS_LABEL: FixedField = FixedField::option("options_label", "label");
pub const OPTIONS_COLOR: FixedField = FixedField::option("options_color", "color");
pub const OPTIONS_BACKGROUND_COLOR: FixedField =
    FixedField::option("options_backgroundColor", "backgroundColor");
pub const OPTIONS_HEIGHT: FixedField = FixedField::option("options_height", "height");
pub const OPTIONS_Y_SCALE: FixedField = FixedField::option("options_yScale", "yScale");
pub const OPTIONS_Y_MAX: FixedField = FixedField::option("options_yMax", "yMax");
pub const OPTIONS_GROUP: FixedField = FixedField::option("options_group", "group");

/// Fixed columns of a flat table, in output order
pub const FIXED_FIELDS: &[FixedField] = &[
    NAME,
    TYPE,
    LABEL,
    OPTIONS_LABEL,
    OPTIONS_COLOR,
    OPTIONS_BACKGROUND_COLOR,
    OPTIONS_HEIGHT,
    OPTIONS_Y_SCALE,
    OPTIONS_Y_MAX,
    OPTIONS_GROUP,
    URL,
];

/// Attribute suffix of a metadata column
#[derive(EnumString, IntoStaticStr, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[strum(ascii_case_insensitive)]
pub enum MetadataAttr {
    Name,
    Color,
}

impl MetadataAttr {
    /// Key used for this attribute in a nested `{name, color}` record
    pub fn nested_key(self) -> &'static str {
        match self {
            MetadataAttr::Name => "name",
            MetadataAttr::Color => "color",
        }
    }
}

/// A parsed `metadata.<key>.<Attr>` column label
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataColumn<'a> {
    pub key:  &'a str,
    pub attr: MetadataAttr,
}

impl<'a> MetadataColumn<'a> {
    pub const fn new(key: &'a str, attr: MetadataAttr) -> Self { Self { key, attr } }

    /// Renders the column label, keeping the key's original case
    pub fn column_name(&self) -> String {
        let attr: &'static str = self.attr.into();
        format!("{}{}.{}", METADATA_PREFIX, self.key, attr)
    }

    /// Parses a column label. The attribute is split off at the last dot, so
    /// keys may themselves contain dots. Returns `None` for anything that is
    /// not a metadata column with a recognized attribute.
    pub fn parse(column: &'a str) -> Option<Self> {
        let rest = column.strip_prefix(METADATA_PREFIX)?;
        let (key, attr) = rest.rsplit_once('.')?;
        if key.is_empty() {
            return None;
        }

        let attr = attr.parse::<MetadataAttr>().ok()?;
        Some(Self { key, attr })
    }
}
