use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Command, ControlResult, DeviceControl, DeviceReply};
use crate::record::DeviceRecord;

/// Mock device-control client for testing
///
/// Answers every command with the same canned result and records which
/// device/command pairs it was asked for.
pub struct MockDeviceControl {
    reply: ControlResult<DeviceReply>,
    calls: Mutex<Vec<(String, Command)>>,
}

impl MockDeviceControl {
    pub fn new(reply: ControlResult<DeviceReply>) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every device reports `dps["1"] == on`
    pub fn power(on: bool) -> Self {
        Self::new(Ok(DeviceReply::power(on)))
    }

    /// Every device reports `{"Err": err, "Error": error}`
    pub fn fault(err: &str, error: &str) -> Self {
        Self::new(Ok(DeviceReply::fault(err, error)))
    }

    /// Device names and commands received so far
    pub fn calls(&self) -> Vec<(String, Command)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn answer(&self, device: &DeviceRecord, command: Command) -> ControlResult<DeviceReply> {
        self.calls.lock().push((device.name.clone(), command));
        tracing::debug!("Mock device control: {} {}", command, device.name);
        self.reply.clone()
    }
}

#[async_trait]
impl DeviceControl for MockDeviceControl {
    async fn status(&self, device: &DeviceRecord) -> ControlResult<DeviceReply> {
        self.answer(device, Command::Status)
    }

    async fn turn_on(&self, device: &DeviceRecord) -> ControlResult<DeviceReply> {
        self.answer(device, Command::TurnOn)
    }

    async fn turn_off(&self, device: &DeviceRecord) -> ControlResult<DeviceReply> {
        self.answer(device, Command::TurnOff)
    }
}
