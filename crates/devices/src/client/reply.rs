//! Device replies as reported by the device-control library

use serde_json::{Map, Value};
use std::fmt;

use super::ControlError;
use crate::record::PowerState;

/// Data point carrying the plug's power state
pub const POWER_DPS: &str = "1";

/// An error reported by the device or the device-control library
///
/// Rendered as `"<Err>: <Error>"`, e.g. `901: Network Error: Unable to Connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFault {
    pub err: String,
    pub error: String,
}

impl DeviceFault {
    pub fn new(err: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            err: err.into(),
            error: error.into(),
        }
    }
}

impl fmt::Display for DeviceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.err, self.error)
    }
}

/// What a device returned for a status/on/off command
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceReply {
    /// `{"dps": {...}}`
    State { dps: Map<String, Value> },
    /// `{"Error": "...", "Err": "..."}`
    Fault(DeviceFault),
}

impl DeviceReply {
    /// Reply reporting a plug switched on or off
    pub fn power(on: bool) -> Self {
        let mut dps = Map::new();
        dps.insert(POWER_DPS.to_string(), Value::Bool(on));
        Self::State { dps }
    }

    pub fn fault(err: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Fault(DeviceFault::new(err, error))
    }

    /// Interpret the raw JSON object returned by the device-control library
    ///
    /// An `Error` field takes precedence over `dps`, as the library may
    /// return both.
    pub fn from_value(value: Value) -> Result<Self, ControlError> {
        let mut obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(ControlError::Payload(format!("expected an object, got {other}")))
            }
        };

        if let Some(error) = obj.remove("Error") {
            let err = obj.remove("Err").map_or_else(|| "unknown".to_string(), text);
            return Ok(Self::fault(err, text(error)));
        }

        match obj.remove("dps") {
            Some(Value::Object(dps)) => Ok(Self::State { dps }),
            Some(other) => Err(ControlError::Payload(format!("dps is not an object: {other}"))),
            None => Err(ControlError::Payload("reply has neither dps nor Error".to_string())),
        }
    }

    /// Power state carried by this reply, or the fault explaining why there is none
    pub fn power_state(&self) -> Result<PowerState, DeviceFault> {
        match self {
            Self::Fault(fault) => Err(fault.clone()),
            Self::State { dps } => dps
                .get(POWER_DPS)
                .and_then(Value::as_bool)
                .map(PowerState::from)
                .ok_or_else(|| {
                    ControlError::Payload(format!("dps {POWER_DPS} is missing or not a bool"))
                        .fault()
                }),
        }
    }
}

fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dps_true_is_on() {
        let reply = DeviceReply::from_value(json!({"devId": "abc", "dps": {"1": true, "9": 0}})).unwrap();
        assert_eq!(reply.power_state(), Ok(PowerState::On));
    }

    #[test]
    fn test_dps_false_is_off() {
        let reply = DeviceReply::from_value(json!({"dps": {"1": false}})).unwrap();
        assert_eq!(reply.power_state(), Ok(PowerState::Off));
    }

    #[test]
    fn test_error_reply_combines_fields() {
        let reply = DeviceReply::from_value(json!({
            "Error": "Network Error: Device Unreachable",
            "Err": "905",
            "Payload": null
        }))
        .unwrap();

        let fault = reply.power_state().unwrap_err();
        assert_eq!(fault.to_string(), "905: Network Error: Device Unreachable");
    }

    #[test]
    fn test_numeric_err_code() {
        let reply = DeviceReply::from_value(json!({"Error": "Timeout", "Err": 902})).unwrap();
        assert_eq!(reply, DeviceReply::fault("902", "Timeout"));
    }

    #[test]
    fn test_missing_power_dps_is_payload_fault() {
        let reply = DeviceReply::from_value(json!({"dps": {"20": true}})).unwrap();
        assert_eq!(reply.power_state().unwrap_err().err, "904");
    }

    #[test]
    fn test_unexpected_shapes_are_rejected() {
        assert!(DeviceReply::from_value(json!([1, 2])).is_err());
        assert!(DeviceReply::from_value(json!({"dps": "on"})).is_err());
        assert!(DeviceReply::from_value(json!({})).is_err());
    }
}
