//! API routes for the device service

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use super::auth::require_api_key;
use super::handlers::*;

/// Create the device router
///
/// `/on` and `/off` require the `api_key` header; `/` and `/status` are open.
pub fn create_router(state: DeviceApiState) -> Router {
    let protected = Router::new()
        .route("/on/:name", put(turn_on))
        .route("/off/:name", put(turn_off))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/", get(list_devices))
        .route("/status/:name", get(device_status))
        .merge(protected)
        .with_state(state)
}
