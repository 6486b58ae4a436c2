//! Port validation utilities
//!
//! Checking a port before binding is racy: another process may take it in
//! between. This only gives early feedback; the real bind is authoritative.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Check that the configured HTTP port can be bound
pub async fn validate_port_available(config: &ServerConfig) -> Result<()> {
    validate_port_range(config.port)?;

    let addr = config.bind_addr()?;
    debug!(%addr, "Checking HTTP port");

    match TcpListener::bind(addr).await {
        Ok(listener) => {
            drop(listener);
            info!(port = config.port, "HTTP port is available");
            Ok(())
        }
        Err(e) => {
            error!("HTTP port {} is NOT available: {}", config.port, e);
            Err(ServerError::port_in_use(config.port, e.to_string()))
        }
    }
}

/// Validate port range
///
/// Port 0 is accepted (ephemeral); ports below 1024 only warn.
pub fn validate_port_range(port: u16) -> Result<()> {
    if port != 0 && port < 1024 {
        warn!(
            "Port {} is a privileged port (requires root/admin privileges)",
            port
        );
    }
    Ok(())
}
