//! Filter schema inference, query binding and equality filtering.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::types::FieldType;
use crate::error::BindError;

/// One filterable field of an object list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    /// Top-level key of the records.
    pub name: String,
    /// Type of the key's value in the first record.
    #[serde(rename = "type")]
    pub kind: FieldType,
}

/// Filterable fields of an object list, inferred from its first element.
///
/// Every field is optional: an unset field does not constrain the result.
/// The schema is frozen once built and is never checked against the
/// remaining elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSchema {
    fields: Vec<SchemaField>,
}

impl FilterSchema {
    /// Build the schema from a sample record, keeping its key order.
    pub fn from_sample(sample: &Map<String, Value>) -> Self {
        let fields = sample
            .iter()
            .map(|(name, value)| SchemaField {
                name: name.clone(),
                kind: FieldType::of(value),
            })
            .collect();
        Self { fields }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Number of filterable fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Type of a field, if declared.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.kind)
    }

    /// Parameters with every field unset.
    pub fn empty_params(&self) -> FilterParams {
        FilterParams {
            values: self
                .fields
                .iter()
                .map(|field| (field.name.clone(), None))
                .collect(),
        }
    }

    /// Bind raw query-string values against the schema.
    ///
    /// Keys the schema does not declare are ignored and empty values are
    /// treated as unset.
    pub fn bind(&self, raw: &HashMap<String, String>) -> Result<FilterParams, BindError> {
        let mut params = self.empty_params();
        for field in &self.fields {
            let Some(text) = raw.get(&field.name).filter(|text| !text.is_empty()) else {
                continue;
            };
            let value = coerce(&field.name, field.kind, text)?;
            params.set(&field.name, value);
        }
        Ok(params)
    }
}

fn coerce(field: &str, kind: FieldType, text: &str) -> Result<Value, BindError> {
    let invalid = || BindError::InvalidValue {
        field: field.to_string(),
        value: text.to_string(),
        expected: kind,
    };

    match kind {
        FieldType::String => Ok(Value::String(text.to_string())),
        FieldType::Integer => {
            let trimmed = text.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                Ok(Value::from(n))
            } else {
                trimmed.parse::<u64>().map(Value::from).map_err(|_| invalid())
            }
        }
        FieldType::Float => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid),
        FieldType::Boolean => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        FieldType::Null | FieldType::Array | FieldType::Object => Err(BindError::Unsupported {
            field: field.to_string(),
            kind,
        }),
    }
}

/// Request-time filter values, one optional slot per schema field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    values: Vec<(String, Option<Value>)>,
}

impl FilterParams {
    /// Set a field's value. Returns `false` when the field is not declared.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.values.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Value bound for a field, if set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// The explicitly set fields.
    pub fn assigned(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.as_str(), v)))
    }

    /// Whether no field is set.
    pub fn is_unset(&self) -> bool {
        self.assigned().next().is_none()
    }
}

/// Keep the records whose top-level fields equal every set parameter.
///
/// The result preserves the input order. A record lacking a key never
/// matches a filter on that key.
pub fn filter(items: &[Value], params: &FilterParams) -> Vec<Value> {
    if params.is_unset() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| {
            params.assigned().all(|(key, expected)| {
                item.get(key)
                    .is_some_and(|actual| values_equal(actual, expected))
            })
        })
        .cloned()
        .collect()
}

// Integers and floats compare by value; everything else compares structurally.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() != y.is_f64() => {
            matches!((x.as_f64(), y.as_f64()), (Some(x), Some(y)) if x == y)
        }
        _ => a == b,
    }
}
