//! Prometheus metrics for device commands

use anyhow::Context;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Initialize the Prometheus metrics exporter
///
/// Starts an HTTP listener on `host:port` that serves metrics at `/metrics`.
/// Without this call every recorder in this module is a no-op.
///
/// # Arguments
///
/// * `host` - IP address to bind, IPv4 or IPv6 (brackets optional)
/// * `port` - Port to expose metrics on
///
/// # Example
///
/// ```ignore
/// observability::init_metrics("0.0.0.0", 9100)?;
/// // Metrics available at http://localhost:9100/metrics
/// ```
pub fn init_metrics(host: &str, port: u16) -> anyhow::Result<()> {
    let addr = metrics_addr(host, port)?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Socket address for the exporter; `::` and `[::1]` are both accepted
fn metrics_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .with_context(|| format!("Invalid metrics host '{}'", host))?;
    Ok(SocketAddr::new(ip, port))
}

/// How a device command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Device answered with its power state
    Ok,
    /// Device or bridge reported an error
    Fault,
    /// Name not in the registry
    NotFound,
    /// Missing or wrong API key
    Rejected,
}

impl CommandOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Fault => "fault",
            Self::NotFound => "not_found",
            Self::Rejected => "rejected",
        }
    }
}

/// Recorders for device commands
///
/// # Metrics
///
/// * `device_commands_total{command, outcome}` - commands handled
/// * `device_command_duration_seconds{command}` - round trip to the device
///
/// # Example
///
/// ```ignore
/// let metrics = DeviceMetrics::new();
///
/// let started = Instant::now();
/// // ... call the device ...
/// metrics.record_command("on", CommandOutcome::Ok, started.elapsed());
///
/// // Refused before reaching a device
/// metrics.record_refused("off", CommandOutcome::Rejected);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DeviceMetrics;

impl DeviceMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Record a command that reached the device-control client
    ///
    /// # Arguments
    ///
    /// * `command` - `"status"`, `"on"` or `"off"`
    /// * `outcome` - [`CommandOutcome::Ok`] or [`CommandOutcome::Fault`]
    /// * `duration` - Time spent waiting for the device
    pub fn record_command(&self, command: &'static str, outcome: CommandOutcome, duration: Duration) {
        counter!(
            "device_commands_total",
            "command" => command,
            "outcome" => outcome.as_str()
        )
        .increment(1);
        histogram!("device_command_duration_seconds", "command" => command)
            .record(duration.as_secs_f64());
    }

    /// Record a command that was refused before any device call
    ///
    /// Only the counter moves; there is no duration to report.
    pub fn record_refused(&self, command: &'static str, outcome: CommandOutcome) {
        counter!(
            "device_commands_total",
            "command" => command,
            "outcome" => outcome.as_str()
        )
        .increment(1);
    }
}
