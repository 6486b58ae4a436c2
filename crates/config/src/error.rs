//! Configuration error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading the config directory
///
/// Every variant is fatal at startup: the service refuses to run with a
/// partially loaded configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {path}: line {line}, column {column}: {message}")]
    Json {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{path} must contain a JSON object")]
    NotAnObject { path: PathBuf },

    /// Valid JSON whose top level is not what the file should hold
    #[error("{path} must contain {expected}")]
    UnexpectedShape { path: PathBuf, expected: &'static str },

    /// One device entry does not match the inventory format
    #[error("Invalid device entry {entry} in {path}: {message}")]
    InvalidEntry {
        path: PathBuf,
        entry: String,
        message: String,
    },

    #[error("No devices.json or snapshot.json found in {dir}")]
    NoDeviceSource { dir: PathBuf },

    #[error("Name '{name}' has no ip key and snapshot.json does not exist")]
    MissingIp { name: String },

    #[error("Name '{name}' does not have a valid ip address: '{ip}'")]
    InvalidIp { name: String, ip: String },
}

impl ConfigError {
    /// Create an I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error, keeping the position reported by serde_json
    pub fn json(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
