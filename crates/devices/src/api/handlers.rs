//! API handlers for device HTTP endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use observability::{CommandOutcome, DeviceMetrics};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::auth::ApiKey;
use super::models::{ApiError, CommandResponse, DeviceView};
use crate::client::{Command, DeviceControl};
use crate::registry::DeviceRegistry;

/// Shared state for the device API
///
/// Registry and key are fixed at startup; the control client is shared by
/// all in-flight requests.
#[derive(Clone)]
pub struct DeviceApiState {
    pub registry: Arc<DeviceRegistry>,
    pub control: Arc<dyn DeviceControl>,
    pub api_key: ApiKey,
    pub metrics: DeviceMetrics,
    pub expose_keys: bool,
}

impl DeviceApiState {
    pub fn new(registry: DeviceRegistry, control: Arc<dyn DeviceControl>, api_key: ApiKey) -> Self {
        Self {
            registry: Arc::new(registry),
            control,
            api_key,
            metrics: DeviceMetrics::new(),
            expose_keys: false,
        }
    }

    /// Include each device's local key in `GET /`
    pub fn with_expose_keys(mut self, expose: bool) -> Self {
        self.expose_keys = expose;
        self
    }
}

/// `GET /` - every controllable device
pub async fn list_devices(State(state): State<DeviceApiState>) -> Json<Vec<DeviceView>> {
    let views = state
        .registry
        .records()
        .iter()
        .map(|record| DeviceView::from_record(record, state.expose_keys))
        .collect();
    Json(views)
}

/// `GET /status/:name`
pub async fn device_status(
    State(state): State<DeviceApiState>,
    Path(name): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    run_command(&state, &name, Command::Status).await
}

/// `PUT /on/:name`
pub async fn turn_on(
    State(state): State<DeviceApiState>,
    Path(name): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    run_command(&state, &name, Command::TurnOn).await
}

/// `PUT /off/:name`
pub async fn turn_off(
    State(state): State<DeviceApiState>,
    Path(name): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    run_command(&state, &name, Command::TurnOff).await
}

async fn run_command(
    state: &DeviceApiState,
    name: &str,
    command: Command,
) -> Result<Json<CommandResponse>, ApiError> {
    let Some(device) = state.registry.get(name) else {
        info!(device = %name, %command, "Unknown device");
        state
            .metrics
            .record_refused(command.as_str(), CommandOutcome::NotFound);
        return Err(ApiError::NotFound(name.to_string()));
    };

    let started = Instant::now();
    let result = state.control.execute(device, command).await;

    // Faults are reported in a 200 body, not as HTTP errors
    let (response, outcome) = match result.map_err(|e| e.fault()).and_then(|r| r.power_state()) {
        Ok(status) => {
            info!(
                device = %name,
                %command,
                "Device control {} {}: Status: {}",
                command.label(),
                name,
                status
            );
            (CommandResponse::Power { status }, CommandOutcome::Ok)
        }
        Err(fault) => {
            error!(device = %name, %command, "Error accessing device {}: {}", name, fault);
            (CommandResponse::Fault(fault.to_string()), CommandOutcome::Fault)
        }
    };

    state
        .metrics
        .record_command(command.as_str(), outcome, started.elapsed());
    Ok(Json(response))
}
