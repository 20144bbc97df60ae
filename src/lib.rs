//! Serve a directory of JSON files as HTTP GET endpoints.
//!
//! Every `*.json` file under the data directory becomes one route. Files
//! holding a list of objects can be filtered by equality on the top-level
//! fields of their first record:
//!
//! ```text
//! data/users.json   [{"id":1,"role":"admin"}, {"id":2,"role":"dev"}]
//!
//! GET /users?role=dev   ->  [{"id":2,"role":"dev"}]
//! GET /users            ->  both records, in file order
//! ```
//!
//! Any other JSON value is served unchanged, and a file that fails to decode
//! is served as a fixed `{detail, error}` payload.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`source`]: Data classification, filter schemas and filtering
//! - [`handler`]: Handler factories
//! - [`loader`]: Data directory walking
//! - [`api`]: HTTP routes
//! - [`metrics`]: Prometheus metrics
//! - [`server`]: Process wiring
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod loader;
pub mod metrics;
pub mod server;
pub mod source;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use handler::{create_error_handler, create_handler, ErrorPayload, Handler, HandlerKind};
