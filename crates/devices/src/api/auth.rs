//! API key check for state-changing routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::fmt;
use std::sync::Arc;
use tracing::error;

use super::handlers::DeviceApiState;
use super::models::ApiError;
use observability::CommandOutcome;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "api_key";

/// The server's API key
///
/// Debug output never shows the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// True when `presented` is exactly the configured key
    pub fn matches(&self, presented: Option<&str>) -> bool {
        presented.is_some_and(|p| p == &*self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Reject the request with 403 unless the `api_key` header matches
///
/// Runs before the handler, so a rejected request never reaches a device.
pub async fn require_api_key(
    State(state): State<DeviceApiState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if !state.api_key.matches(presented) {
        error!(path = %request.uri().path(), "Could not validate API key");
        state
            .metrics
            .record_refused(command_label(request.uri().path()), CommandOutcome::Rejected);
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}

fn command_label(path: &str) -> &'static str {
    if path.starts_with("/on/") {
        "on"
    } else if path.starts_with("/off/") {
        "off"
    } else {
        "other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_must_match_exactly() {
        let key = ApiKey::new("Abc123");
        assert!(key.matches(Some("Abc123")));
        assert!(!key.matches(Some("abc123")));
        assert!(!key.matches(Some("Abc123 ")));
        assert!(!key.matches(Some("")));
        assert!(!key.matches(None));
    }

    #[test]
    fn test_debug_redacts_key() {
        assert_eq!(format!("{:?}", ApiKey::new("Abc123")), "ApiKey(***)");
    }

    #[test]
    fn test_command_label() {
        assert_eq!(command_label("/on/lamp"), "on");
        assert_eq!(command_label("/off/lamp"), "off");
        assert_eq!(command_label("/status/lamp"), "other");
    }
}
