//! Registry error types

use config::ConfigError;
use thiserror::Error;

/// Errors that prevent building the device registry
///
/// All of them abort startup.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Loading one of the config files failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reconciliation produced no controllable device
    #[error("No controllable devices: no entry in names.json matches a device in {source_file}")]
    Empty { source_file: &'static str },

    /// Inventory `ver` is not a number
    #[error("Device '{name}' has an invalid protocol version: '{value}'")]
    InvalidVersion { name: String, value: String },
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
