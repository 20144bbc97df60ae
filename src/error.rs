//! Unified error types for the JSON endpoint server.

use std::path::PathBuf;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::source::FieldType;

/// Unified error type for the JSON endpoint server.
#[derive(Error, Debug)]
pub enum AppError {
    /// Data directory loading error.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while walking the data directory.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The configured data directory does not exist.
    #[error("data directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    /// A directory or file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Errors raised while binding raw query parameters against a filter schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The raw value cannot be parsed as the field's type.
    #[error("value {value:?} for {field} is not a valid {expected}")]
    InvalidValue {
        /// Query parameter name.
        field: String,
        /// Raw query value.
        value: String,
        /// Type inferred for the field.
        expected: FieldType,
    },

    /// The field's type cannot be filtered on from a query string.
    #[error("filtering on {field} ({kind}) is not supported")]
    Unsupported {
        /// Query parameter name.
        field: String,
        /// Type inferred for the field.
        kind: FieldType,
    },
}

impl BindError {
    /// Name of the offending query parameter.
    pub fn field(&self) -> &str {
        match self {
            BindError::InvalidValue { field, .. } | BindError::Unsupported { field, .. } => field,
        }
    }

    fn error_type(&self) -> String {
        match self {
            BindError::InvalidValue { expected, .. } => format!("{expected}_parsing"),
            BindError::Unsupported { .. } => "unsupported_filter".to_string(),
        }
    }
}

impl IntoResponse for BindError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({
            "detail": [{
                "loc": ["query", self.field()],
                "msg": self.to_string(),
                "type": self.error_type(),
            }]
        });
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
