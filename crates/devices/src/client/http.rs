//! Device-control bridge reached over HTTP
//!
//! The bridge speaks the vendor protocol on our behalf. For every command it
//! receives `POST {base}/devices/{device_id}/{status|on|off}` with the device
//! address, local key and protocol version, and answers with the raw reply
//! object (`{"dps": {...}}` or `{"Error": ..., "Err": ...}`).

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{Command, ControlError, ControlResult, DeviceControl, DeviceReply};
use crate::record::DeviceRecord;

#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    address: &'a str,
    key: &'a str,
    version: f64,
}

impl<'a> From<&'a DeviceRecord> for BridgeRequest<'a> {
    fn from(device: &'a DeviceRecord) -> Self {
        Self {
            address: &device.address,
            key: &device.key,
            version: device.version,
        }
    }
}

impl From<reqwest::Error> for ControlError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ControlError::Timeout
        } else if e.is_decode() {
            ControlError::Payload(e.to_string())
        } else {
            ControlError::Unreachable(e.to_string())
        }
    }
}

/// HTTP-based device-control client
#[derive(Clone)]
pub struct HttpDeviceControl {
    client: Client,
    base_url: Url,
}

impl HttpDeviceControl {
    /// Create a client for the bridge at `base_url`
    ///
    /// `timeout` bounds each device round trip.
    pub fn new(base_url: Url, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, device_id: &str, command: Command) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["devices", device_id, command.as_str()]);
        }
        url
    }

    async fn send(&self, device: &DeviceRecord, command: Command) -> ControlResult<DeviceReply> {
        let url = self.endpoint(&device.device_id, command);
        debug!(%url, device = %device.name, "Forwarding command to device-control bridge");

        let response = self
            .client
            .post(url)
            .json(&BridgeRequest::from(device))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ControlError::Timeout
            } else {
                ControlError::Payload(format!("bridge answered HTTP {status} without a JSON reply"))
            }
        })?;

        DeviceReply::from_value(body)
    }
}

#[async_trait]
impl DeviceControl for HttpDeviceControl {
    async fn status(&self, device: &DeviceRecord) -> ControlResult<DeviceReply> {
        self.send(device, Command::Status).await
    }

    async fn turn_on(&self, device: &DeviceRecord) -> ControlResult<DeviceReply> {
        self.send(device, Command::TurnOn).await
    }

    async fn turn_off(&self, device: &DeviceRecord) -> ControlResult<DeviceReply> {
        self.send(device, Command::TurnOff).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, routing::post, Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn lamp() -> DeviceRecord {
        DeviceRecord {
            name: "lamp".into(),
            device_id: "bf1234".into(),
            address: "10.0.0.1".into(),
            key: "secret".into(),
            version: 3.3,
        }
    }

    async fn bridge(router: Router) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api/")).unwrap()
    }

    #[test]
    fn test_endpoint_layout() {
        let client = HttpDeviceControl::new(
            Url::parse("http://127.0.0.1:8888/bridge").unwrap(),
            TIMEOUT,
        )
        .unwrap();

        assert_eq!(
            client.endpoint("bf1234", Command::TurnOn).as_str(),
            "http://127.0.0.1:8888/bridge/devices/bf1234/on"
        );
    }

    #[tokio::test]
    async fn test_forwards_device_credentials() {
        let router = Router::new().route(
            "/api/devices/:id/:action",
            post(|Path((id, action)): Path<(String, String)>, Json(body): Json<Value>| async move {
                assert_eq!(id, "bf1234");
                assert_eq!(action, "off");
                assert_eq!(body, json!({"address": "10.0.0.1", "key": "secret", "version": 3.3}));
                Json(json!({"dps": {"1": false}}))
            }),
        );
        let client = HttpDeviceControl::new(bridge(router).await, TIMEOUT).unwrap();

        let reply = client.turn_off(&lamp()).await.unwrap();
        assert_eq!(reply, DeviceReply::power(false));
    }

    #[tokio::test]
    async fn test_passes_through_device_fault() {
        let router = Router::new().route(
            "/api/devices/:id/:action",
            post(|| async { Json(json!({"Error": "Device Unreachable", "Err": "905"})) }),
        );
        let client = HttpDeviceControl::new(bridge(router).await, TIMEOUT).unwrap();

        let reply = client.status(&lamp()).await.unwrap();
        assert_eq!(reply, DeviceReply::fault("905", "Device Unreachable"));
    }

    #[tokio::test]
    async fn test_non_json_answer_is_payload_error() {
        let router = Router::new().route("/api/devices/:id/:action", post(|| async { "nope" }));
        let client = HttpDeviceControl::new(bridge(router).await, TIMEOUT).unwrap();

        let err = client.status(&lamp()).await.unwrap_err();
        assert_eq!(err.code(), "904");
    }

    #[tokio::test]
    async fn test_unreachable_bridge() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpDeviceControl::new(
            Url::parse(&format!("http://{addr}")).unwrap(),
            TIMEOUT,
        )
        .unwrap();

        let err = client.status(&lamp()).await.unwrap_err();
        assert!(matches!(err, ControlError::Unreachable(_)));
    }
}
