//! HTTP API module: data endpoints plus health, index, OpenAPI and metrics.

pub mod handlers;
pub mod openapi;
pub mod routes;

pub use handlers::AppState;
pub use openapi::build_openapi;
pub use routes::create_router;
