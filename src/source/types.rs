//! Data source classification and field type inference.

use serde::Serialize;
use serde_json::{Map, Value};
use strum::{Display, IntoStaticStr};

use super::schema::FilterSchema;

/// Primitive type tag inferred from a sampled JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldType {
    /// JSON `null`.
    Null,
    /// JSON `true` / `false`.
    Boolean,
    /// Number representable as `i64` or `u64`.
    Integer,
    /// Any other number.
    Float,
    /// JSON string.
    String,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl FieldType {
    /// Infer the type tag of a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => FieldType::Null,
            Value::Bool(_) => FieldType::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => FieldType::Integer,
            Value::Number(_) => FieldType::Float,
            Value::String(_) => FieldType::String,
            Value::Array(_) => FieldType::Array,
            Value::Object(_) => FieldType::Object,
        }
    }

    /// Whether a value of this type can be supplied through a query string.
    pub fn is_bindable(self) -> bool {
        matches!(
            self,
            FieldType::Boolean | FieldType::Integer | FieldType::Float | FieldType::String
        )
    }
}

/// The decoded JSON value backing one endpoint, classified once.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// `null`, boolean, number or string.
    Scalar(Value),
    /// A single JSON object.
    Object(Map<String, Value>),
    /// A non-empty array whose first element is an object.
    ObjectList(Vec<Value>),
    /// An empty array, or an array whose first element is not an object.
    OtherList(Vec<Value>),
}

impl DataSource {
    /// Classify a decoded JSON value.
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) if matches!(items.first(), Some(Value::Object(_))) => {
                DataSource::ObjectList(items)
            }
            Value::Array(items) => DataSource::OtherList(items),
            Value::Object(map) => DataSource::Object(map),
            scalar => DataSource::Scalar(scalar),
        }
    }

    /// Whether the source supports filtering.
    pub fn is_queryable(&self) -> bool {
        matches!(self, DataSource::ObjectList(_))
    }

    /// Derive the filter schema, if the source is an object list.
    pub fn schema(&self) -> Option<FilterSchema> {
        match self {
            DataSource::ObjectList(items) => items
                .first()
                .and_then(Value::as_object)
                .map(FilterSchema::from_sample),
            _ => None,
        }
    }

    /// Convert back into the JSON value it was built from.
    pub fn into_value(self) -> Value {
        match self {
            DataSource::Scalar(value) => value,
            DataSource::Object(map) => Value::Object(map),
            DataSource::ObjectList(items) | DataSource::OtherList(items) => Value::Array(items),
        }
    }
}

impl From<Value> for DataSource {
    fn from(value: Value) -> Self {
        DataSource::classify(value)
    }
}
