use crate::schema::{self, FieldPath, FixedField};
use serde_json::{Map, Value};

/// Read-only view over one nested track record. Every accessor degrades to
/// the sentinel cell instead of failing, whether the field is missing, null,
/// or sits under a container that is not an object.
#[derive(Clone, Copy, Debug)]
pub struct Track<'a> {
    data: &'a Value,
}

impl<'a> Track<'a> {
    pub const fn new(data: &'a Value) -> Self { Self { data } }

    /// Reads the field described by an entry of the fixed mapping table
    pub fn field(&self, field: &FixedField) -> Value {
        let found = match field.path {
            FieldPath::Top(key) => self.data.get(key),
            FieldPath::Option(key) => self.options().and_then(|options| options.get(key)),
        };

        match found {
            None | Some(Value::Null) => schema::sentinel(),
            Some(value) => value.clone(),
        }
    }

    pub fn name(&self) -> Value { self.field(&schema::NAME) }

    pub fn track_type(&self) -> Value { self.field(&schema::TYPE) }

    pub fn label(&self) -> Value { self.field(&schema::LABEL) }

    pub fn url(&self) -> Value { self.field(&schema::URL) }

    pub fn options_label(&self) -> Value { self.field(&schema::OPTIONS_LABEL) }

    pub fn options_color(&self) -> Value { self.field(&schema::OPTIONS_COLOR) }

    pub fn options_background_color(&self) -> Value {
        self.field(&schema::OPTIONS_BACKGROUND_COLOR)
    }

    pub fn options_height(&self) -> Value { self.field(&schema::OPTIONS_HEIGHT) }

    pub fn options_y_scale(&self) -> Value { self.field(&schema::OPTIONS_Y_SCALE) }

    pub fn options_y_max(&self) -> Value { self.field(&schema::OPTIONS_Y_MAX) }

    pub fn options_group(&self) -> Value { self.field(&schema::OPTIONS_GROUP) }

    /// Gets the metadata object, or `None` if it is absent or not an object.
    /// `None` stands in for the sentinel here: the flattener then emits no
    /// metadata columns for the track, and the column union back-fills them
    /// with the sentinel.
    pub fn metadata(&self) -> Option<&'a Map<String, Value>> {
        self.data.get("metadata").and_then(Value::as_object)
    }

    fn options(&self) -> Option<&'a Map<String, Value>> {
        self.data.get("options").and_then(Value::as_object)
    }
}
