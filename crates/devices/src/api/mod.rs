//! HTTP API for device control

pub mod auth;
pub mod handlers;
pub mod models;
pub mod routes;

pub use auth::{require_api_key, ApiKey, API_KEY_HEADER};
pub use handlers::DeviceApiState;
pub use models::{ApiError, CommandResponse, DeviceView, ErrorResponse};
pub use routes::create_router;
