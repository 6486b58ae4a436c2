//! Device-control client - trait and implementations
//!
//! The vendor wire protocol lives outside this crate. [`DeviceControl`] is the
//! narrow seam the HTTP handlers call through; [`http::HttpDeviceControl`]
//! reaches a local device-control bridge and [`MockDeviceControl`] stands in
//! for it in tests.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::record::DeviceRecord;

pub mod mock;
pub mod reply;

#[cfg(feature = "client")]
pub mod http;

pub use mock::MockDeviceControl;
pub use reply::{DeviceFault, DeviceReply, POWER_DPS};

/// A command forwarded to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Status,
    TurnOn,
    TurnOff,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::TurnOn => "on",
            Self::TurnOff => "off",
        }
    }

    /// Capitalized name used in log messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::TurnOn => "On",
            Self::TurnOff => "Off",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to obtain any reply from a device
///
/// Carries the device-control library's numeric codes so callers can render
/// it the same way as a fault the device itself reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Network Error: Unable to Connect ({0})")]
    Unreachable(String),

    #[error("Timeout Waiting for Device")]
    Timeout,

    #[error("Unexpected Payload from Device ({0})")]
    Payload(String),
}

impl ControlError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "901",
            Self::Timeout => "902",
            Self::Payload(_) => "904",
        }
    }

    /// Render as the fault shape a device would have reported
    pub fn fault(&self) -> DeviceFault {
        let message = match self {
            Self::Unreachable(_) => "Network Error: Unable to Connect",
            Self::Timeout => "Timeout Waiting for Device",
            Self::Payload(_) => "Unexpected Payload from Device",
        };
        DeviceFault::new(self.code(), message)
    }
}

pub type ControlResult<T> = Result<T, ControlError>;

/// Client for the device-control library
///
/// Each call opens a fresh session to the device; nothing is cached.
#[async_trait]
pub trait DeviceControl: Send + Sync {
    async fn status(&self, device: &DeviceRecord) -> ControlResult<DeviceReply>;

    async fn turn_on(&self, device: &DeviceRecord) -> ControlResult<DeviceReply>;

    async fn turn_off(&self, device: &DeviceRecord) -> ControlResult<DeviceReply>;

    /// Dispatch `command` to the matching method
    async fn execute(&self, device: &DeviceRecord, command: Command) -> ControlResult<DeviceReply> {
        match command {
            Command::Status => self.status(device).await,
            Command::TurnOn => self.turn_on(device).await,
            Command::TurnOff => self.turn_off(device).await,
        }
    }
}
