//! JSON data sources: classification, filter schemas and filtering.

pub mod schema;
pub mod types;

pub use schema::{filter, FilterParams, FilterSchema, SchemaField};
pub use types::{DataSource, FieldType};
