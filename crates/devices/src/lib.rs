//! Smart plug devices for plugd
//!
//! - [`registry`] reconciles `names.json` with the device inventory
//! - [`client`] forwards status/on/off commands to a device
//! - [`api`] exposes the registry and commands over HTTP (feature `api`)

pub mod client;
pub mod error;
pub mod record;
pub mod registry;

#[cfg(feature = "api")]
pub mod api;

pub use client::{Command, ControlError, ControlResult, DeviceControl, DeviceReply, MockDeviceControl};
pub use error::{RegistryError, Result};
pub use record::{DeviceRecord, PowerState};
pub use registry::{create_devices, DeviceRegistry};

#[cfg(feature = "client")]
pub use client::http::HttpDeviceControl;
