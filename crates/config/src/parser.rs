use crate::error::{ConfigError, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, instrument};

/// Directory holding `config.json`, `devices.json`, `snapshot.json` and `names.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    root: PathBuf,
}

impl ConfigDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file inside the directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Read and deserialize a JSON file
///
/// Parse failures are logged with their line and column before being returned.
#[instrument(level = "debug")]
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    debug!(bytes = content.len(), "Read configuration file");

    serde_json::from_str(&content).map_err(|e| {
        error!(
            path = %path.display(),
            line = e.line(),
            column = e.column(),
            "Invalid JSON: {}",
            e
        );
        ConfigError::json(path, &e)
    })
}

/// Serialize a value as JSON with one-space indentation and write it out
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| ConfigError::json(path, &e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
    }

    fs::write(path, buf).map_err(|e| ConfigError::io(path, e))
}
