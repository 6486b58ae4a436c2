//! HTTP server infrastructure for plugd
//!
//! [`HttpServer`] wraps an Axum router with request tracing, a `/health`
//! route and graceful shutdown. Servers implement the [`Server`] trait;
//! [`ServerExt`] adds `spawn()` and `run_until_signal()`.
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt};
//!
//! let server = HttpServer::new(ServerConfig::default(), router);
//! server.run_until_signal().await?;
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use config::{ServerConfig, DEFAULT_HOST, DEFAULT_HTTP_PORT};
pub use error::{Result, ServerError};
pub use http::HttpServer;
pub use port_validator::validate_port_available;
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
