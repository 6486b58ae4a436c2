//! Controllable device records

use serde::{Deserialize, Serialize};
use std::fmt;

/// A device that can be addressed by name
///
/// Built once at startup from `names.json` and the inventory; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRecord {
    pub name: String,
    pub device_id: String,
    pub address: String,
    pub key: String,
    pub version: f64,
}

/// Power state reported by a plug (data point `"1"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
