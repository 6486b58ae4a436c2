//! Request/response models for the device API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::record::{DeviceRecord, PowerState};

/// One entry of `GET /`
///
/// `key` is only present when the server runs with key exposure enabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    pub name: String,
    pub device_id: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub version: f64,
}

impl DeviceView {
    pub fn from_record(record: &DeviceRecord, expose_key: bool) -> Self {
        Self {
            name: record.name.clone(),
            device_id: record.device_id.clone(),
            address: record.address.clone(),
            key: expose_key.then(|| record.key.clone()),
            version: record.version,
        }
    }
}

/// Body of `/status`, `/on` and `/off` responses
///
/// Either `{"status": "on"|"off"}` or a bare JSON string `"<Err>: <Error>"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandResponse {
    Power { status: PowerState },
    Fault(String),
}

/// Error body, `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Request failures surfaced as HTTP errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Device name not in the registry
    NotFound(String),
    /// Missing or wrong `api_key` header
    Forbidden,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::NotFound(name) => format!("Device not found: {}", name),
            Self::Forbidden => "Could not validate API key".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse { detail: self.detail() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lamp() -> DeviceRecord {
        DeviceRecord {
            name: "lamp".into(),
            device_id: "abc".into(),
            address: "10.0.0.1".into(),
            key: "secret".into(),
            version: 3.3,
        }
    }

    #[test]
    fn test_device_view_hides_key() {
        let view = serde_json::to_value(DeviceView::from_record(&lamp(), false)).unwrap();
        assert_eq!(
            view,
            json!({"name": "lamp", "device_id": "abc", "address": "10.0.0.1", "version": 3.3})
        );

        let view = serde_json::to_value(DeviceView::from_record(&lamp(), true)).unwrap();
        assert_eq!(view["key"], "secret");
    }

    #[test]
    fn test_command_response_shapes() {
        let on = CommandResponse::Power { status: PowerState::On };
        assert_eq!(serde_json::to_value(on).unwrap(), json!({"status": "on"}));

        let fault = CommandResponse::Fault("905: Device Unreachable".into());
        assert_eq!(serde_json::to_value(fault).unwrap(), json!("905: Device Unreachable"));
    }

    #[test]
    fn test_api_error_details() {
        assert_eq!(ApiError::NotFound("fan".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotFound("fan".into()).detail(), "Device not found: fan");
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
