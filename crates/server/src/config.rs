//! Server bind configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Port the HTTP API listens on unless overridden
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Host the HTTP API binds to unless overridden
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Where the HTTP API listens
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 8000);
/// assert_eq!(config.bind_addr().unwrap().port(), 8000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// HTTP port; 0 asks the OS for an ephemeral port
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse host and port into a socket address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        // IPv6 literals need brackets in the host:port form
        let addr = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        };

        addr.parse()
            .map_err(|_| ServerError::InvalidAddress(addr.clone()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_HTTP_PORT)
    }
}
