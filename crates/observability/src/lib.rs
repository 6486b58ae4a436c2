//! Observability for plugd
//!
//! - Structured logging via tracing
//! - Prometheus metrics for device commands
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("plugd", LogFormat::Pretty)?;
//! observability::init_metrics("0.0.0.0", 9100)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, CommandOutcome, DeviceMetrics};
