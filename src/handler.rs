//! Handler factories for JSON-backed GET endpoints.
//!
//! A [`Handler`] is built once per endpoint from the endpoint's decoded data
//! (or from the error that prevented decoding it) and then invoked for every
//! request. Handlers never fail and never perform I/O.
//!
//! ```text
//! [{"a":1,"b":"x"}, {"a":2,"b":"y"}]   ?a=1   ->  [{"a":1,"b":"x"}]
//! {"a":1}                              ?a=2   ->  {"a":1}
//! ```

use std::fmt::Display;

use serde::Serialize;
use serde_json::{json, Value};
use strum::Display as StrumDisplay;

use crate::source::{filter, DataSource, FilterParams, FilterSchema};

/// Default name of a handler serving data that cannot be filtered.
pub const OPAQUE_HANDLER_NAME: &str = "non_queryable_api_data";
/// Default name of a handler serving a filterable object list.
pub const QUERYABLE_HANDLER_NAME: &str = "querable_api_data";
/// Default name of a handler reporting a decode failure.
pub const ERROR_HANDLER_NAME: &str = "json_decode_error";

/// Response body served in place of data that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// Which file is broken.
    pub detail: String,
    /// The decoder's message.
    pub error: String,
}

impl ErrorPayload {
    /// Render a decode failure for `file_name`.
    pub fn new(error: &dyn Display, file_name: &str) -> Self {
        Self {
            detail: format!("The file {file_name} is not valid json."),
            error: format!("Json decode error: {error}."),
        }
    }

    /// Response body form of the payload.
    pub fn to_value(&self) -> Value {
        json!({
            "detail": self.detail,
            "error": self.error,
        })
    }
}

/// Handler variant, decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, StrumDisplay)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HandlerKind {
    /// Returns its data unchanged.
    Opaque,
    /// Filters an object list by query parameters.
    Queryable,
    /// Returns an [`ErrorPayload`].
    DecodeFailure,
}

#[derive(Debug, Clone)]
enum Body {
    Opaque(Value),
    Queryable {
        items: Vec<Value>,
        schema: FilterSchema,
    },
    DecodeFailure(Value),
}

/// A named request handler bound to one endpoint's data.
#[derive(Debug, Clone)]
pub struct Handler {
    name: String,
    body: Body,
}

impl Handler {
    /// Registration/display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handler variant.
    pub fn kind(&self) -> HandlerKind {
        match self.body {
            Body::Opaque(_) => HandlerKind::Opaque,
            Body::Queryable { .. } => HandlerKind::Queryable,
            Body::DecodeFailure(_) => HandlerKind::DecodeFailure,
        }
    }

    /// Filter schema, for queryable handlers only.
    pub fn schema(&self) -> Option<&FilterSchema> {
        match &self.body {
            Body::Queryable { schema, .. } => Some(schema),
            _ => None,
        }
    }

    /// Parameters with every field unset. Empty for non-queryable handlers.
    pub fn empty_params(&self) -> FilterParams {
        self.schema()
            .map(FilterSchema::empty_params)
            .unwrap_or_default()
    }

    /// Produce the response payload for one request.
    ///
    /// Only queryable handlers consult `params`.
    pub fn call(&self, params: &FilterParams) -> Value {
        match &self.body {
            Body::Opaque(data) => data.clone(),
            Body::Queryable { items, .. } => Value::Array(filter(items, params)),
            Body::DecodeFailure(payload) => payload.clone(),
        }
    }
}

/// Build the handler serving `data`.
///
/// Object lists get a queryable handler whose schema is taken from the first
/// element; every other value is served unchanged.
pub fn create_handler(data: impl Into<DataSource>, name: Option<&str>) -> Handler {
    let source: DataSource = data.into();
    let body = match (source.schema(), source) {
        (Some(schema), DataSource::ObjectList(items)) => Body::Queryable { items, schema },
        (_, other) => Body::Opaque(other.into_value()),
    };
    let default_name = match body {
        Body::Queryable { .. } => QUERYABLE_HANDLER_NAME,
        _ => OPAQUE_HANDLER_NAME,
    };

    Handler {
        name: name.unwrap_or(default_name).to_string(),
        body,
    }
}

/// Build a handler that reports `error` for `file_name` on every request.
pub fn create_error_handler(error: &dyn Display, file_name: &str, name: Option<&str>) -> Handler {
    Handler {
        name: name.unwrap_or(ERROR_HANDLER_NAME).to_string(),
        body: Body::DecodeFailure(ErrorPayload::new(error, file_name).to_value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_records() -> Value {
        json!([{"a": 1, "b": "x"}, {"a": 2, "b": "y"}])
    }

    #[test]
    fn filters_object_list_by_one_field() {
        let handler = create_handler(two_records(), None);
        let mut params = handler.empty_params();
        params.set("a", json!(1));
        assert_eq!(handler.call(&params), json!([{"a": 1, "b": "x"}]));
    }

    #[test]
    fn unset_params_return_whole_list() {
        let handler = create_handler(two_records(), None);
        assert_eq!(handler.call(&handler.empty_params()), two_records());
    }

    #[test]
    fn first_element_always_matches_its_own_value() {
        let handler = create_handler(two_records(), None);
        let mut params = handler.empty_params();
        params.set("b", json!("x"));
        let result = handler.call(&params);
        assert_eq!(result[0], json!({"a": 1, "b": "x"}));
    }

    #[test]
    fn object_is_served_unchanged() {
        let handler = create_handler(json!({"a": 1}), None);
        assert_eq!(handler.kind(), HandlerKind::Opaque);
        assert!(handler.schema().is_none());

        let mut foreign = create_handler(two_records(), None).empty_params();
        foreign.set("a", json!(2));
        assert_eq!(handler.call(&foreign), json!({"a": 1}));
        assert_eq!(handler.call(&FilterParams::default()), json!({"a": 1}));
    }

    #[test]
    fn empty_and_scalar_lists_are_opaque() {
        for data in [json!([]), json!([1, 2, 3]), json!("text"), json!(null)] {
            let handler = create_handler(data.clone(), None);
            assert_eq!(handler.kind(), HandlerKind::Opaque);
            assert_eq!(handler.name(), OPAQUE_HANDLER_NAME);
            assert_eq!(handler.call(&handler.empty_params()), data);
        }
    }

    #[test]
    fn names_default_per_variant_and_can_be_overridden() {
        assert_eq!(create_handler(two_records(), None).name(), QUERYABLE_HANDLER_NAME);
        assert_eq!(create_handler(two_records(), Some("users")).name(), "users");
        assert_eq!(create_handler(json!(1), Some("count")).name(), "count");
    }

    #[test]
    fn error_handler_renders_payload() {
        let handler = create_error_handler(&"Unexpected token", "users.json", None);
        let expected = json!({
            "detail": "The file users.json is not valid json.",
            "error": "Json decode error: Unexpected token.",
        });
        assert_eq!(handler.kind(), HandlerKind::DecodeFailure);
        assert_eq!(handler.name(), ERROR_HANDLER_NAME);
        assert_eq!(handler.call(&FilterParams::default()), expected);
        assert_eq!(handler.call(&FilterParams::default()), expected);
    }

    #[test]
    fn error_payload_value_matches_its_serde_form() {
        let payload = ErrorPayload::new(&"eof", "a.json");
        assert_eq!(payload.to_value(), serde_json::to_value(&payload).unwrap());
    }

    #[test]
    fn error_handler_accepts_a_name() {
        let handler = create_error_handler(&"eof", "a.json", Some("a"));
        assert_eq!(handler.name(), "a");
    }

    #[test]
    fn handler_kind_names() {
        assert_eq!(HandlerKind::DecodeFailure.to_string(), "decode_failure");
    }
}
