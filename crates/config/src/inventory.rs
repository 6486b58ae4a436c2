//! Device inventory loading (`snapshot.json` / `devices.json`)

use crate::defaults::{DEVICES_FILE, SNAPSHOT_FILE};
use crate::error::{ConfigError, Result};
use crate::parser::{read_json, ConfigDir};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{error, info, instrument, warn};

/// Raw device definition as exported by the vendor tooling
///
/// Extra fields present in vendor exports are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InventoryEntry {
    #[serde(default)]
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub ip: Option<String>,
    pub key: String,
    /// Protocol version, written as `"3.3"` or `3.3` depending on the exporter
    #[serde(default, alias = "version", deserialize_with = "deserialize_version")]
    pub ver: Option<String>,
}

impl InventoryEntry {
    /// Address recorded in the inventory, if any
    pub fn address(&self) -> Option<&str> {
        self.ip.as_deref().filter(|ip| !ip.trim().is_empty())
    }
}

fn deserialize_version<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Version>::deserialize(deserializer)?.map(|v| match v {
        Version::Text(s) => s,
        Version::Number(n) => n.to_string(),
    }))
}

/// Where the device inventory came from
///
/// A snapshot already carries device addresses, which relaxes the address
/// requirement on `names.json`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceSource {
    Snapshot(Vec<InventoryEntry>),
    Inventory(Vec<InventoryEntry>),
}

impl DeviceSource {
    pub fn entries(&self) -> &[InventoryEntry] {
        match self {
            Self::Snapshot(entries) | Self::Inventory(entries) => entries,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, Self::Snapshot(_))
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// File name the entries were read from
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Snapshot(_) => SNAPSHOT_FILE,
            Self::Inventory(_) => DEVICES_FILE,
        }
    }
}

/// Deserialize one inventory entry, labelling failures with `entry`
fn parse_entry(path: &Path, entry: String, value: Value) -> Result<InventoryEntry> {
    serde_json::from_value(value).map_err(|e| {
        error!(path = %path.display(), %entry, "Invalid device entry: {}", e);
        ConfigError::InvalidEntry {
            path: path.to_path_buf(),
            entry,
            message: e.to_string(),
        }
    })
}

/// Entries of a JSON list, labelled by position
fn parse_list(path: &Path, items: Vec<Value>) -> Result<Vec<InventoryEntry>> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, value)| parse_entry(path, format!("#{}", idx), value))
        .collect()
}

/// Entries of an object keyed by device name; the key fills a missing `name`
fn parse_keyed(path: &Path, map: Map<String, Value>) -> Result<Vec<InventoryEntry>> {
    map.into_iter()
        .map(|(name, value)| {
            let mut entry = parse_entry(path, format!("'{}'", name), value)?;
            if entry.name.is_empty() {
                entry.name = name;
            }
            Ok(entry)
        })
        .collect()
}

/// `snapshot.json`: `{"devices": [...]}`, other top-level fields ignored
fn read_snapshot(path: &Path) -> Result<Vec<InventoryEntry>> {
    match read_json::<Value>(path)? {
        Value::Object(mut obj) => match obj.remove("devices") {
            Some(Value::Array(items)) => parse_list(path, items),
            _ => Err(ConfigError::UnexpectedShape {
                path: path.to_path_buf(),
                expected: "a \"devices\" list",
            }),
        },
        _ => Err(ConfigError::UnexpectedShape {
            path: path.to_path_buf(),
            expected: "an object with a \"devices\" list",
        }),
    }
}

/// `devices.json`: a list of entries or an object keyed by device name
fn read_inventory(path: &Path) -> Result<Vec<InventoryEntry>> {
    match read_json::<Value>(path)? {
        Value::Array(items) => parse_list(path, items),
        Value::Object(map) => parse_keyed(path, map),
        _ => Err(ConfigError::UnexpectedShape {
            path: path.to_path_buf(),
            expected: "a list or an object of devices",
        }),
    }
}

/// Load the device inventory, preferring `snapshot.json` over `devices.json`
#[instrument]
pub fn load_devices(dir: &ConfigDir) -> Result<DeviceSource> {
    let snapshot_path = dir.file(SNAPSHOT_FILE);
    let devices_path = dir.file(DEVICES_FILE);

    let source = if snapshot_path.exists() {
        DeviceSource::Snapshot(read_snapshot(&snapshot_path).map_err(|e| {
            error!("Snapshot loading failed");
            e
        })?)
    } else if devices_path.exists() {
        DeviceSource::Inventory(read_inventory(&devices_path).map_err(|e| {
            error!("Devices loading failed");
            e
        })?)
    } else {
        error!("No devices.json or snapshot.json found. Please read README.md.");
        return Err(ConfigError::NoDeviceSource {
            dir: dir.root().to_path_buf(),
        });
    };

    if source.is_empty() {
        warn!("{} lists no devices", source.file_name());
    }
    info!("Loaded {} devices from {}", source.len(), source.file_name());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_config() -> (tempfile::TempDir, ConfigDir) {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ConfigDir::new(tmp.path());
        (tmp, dir)
    }

    #[test]
    fn test_load_devices_list() {
        let (_tmp, dir) = temp_config();
        fs::write(
            dir.file(DEVICES_FILE),
            r#"[{"name": "lamp", "id": "abc", "key": "k1", "ver": "3.3", "mac": "aa:bb"}]"#,
        )
        .unwrap();

        let source = load_devices(&dir).unwrap();
        assert!(!source.is_snapshot());
        assert_eq!(source.len(), 1);
        assert_eq!(source.entries()[0].ver.as_deref(), Some("3.3"));
        assert_eq!(source.entries()[0].ip, None);
    }

    #[test]
    fn test_load_devices_keyed_object() {
        let (_tmp, dir) = temp_config();
        fs::write(
            dir.file(DEVICES_FILE),
            r#"{"heater": {"id": "h1", "key": "k"}, "fan": {"name": "Fan", "id": "f1", "key": "k"}}"#,
        )
        .unwrap();

        let source = load_devices(&dir).unwrap();
        let names: Vec<_> = source.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Fan", "heater"]);
    }

    #[test]
    fn test_snapshot_takes_precedence() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(DEVICES_FILE), r#"[]"#).unwrap();
        fs::write(
            dir.file(SNAPSHOT_FILE),
            r#"{"timestamp": 1, "devices": [{"name": "lamp", "id": "abc", "ip": "10.0.0.5", "key": "k", "ver": 3.4}]}"#,
        )
        .unwrap();

        let source = load_devices(&dir).unwrap();
        assert!(source.is_snapshot());
        assert_eq!(source.file_name(), SNAPSHOT_FILE);
        assert_eq!(source.entries()[0].ver.as_deref(), Some("3.4"));
        assert_eq!(source.entries()[0].address(), Some("10.0.0.5"));
    }

    #[test]
    fn test_malformed_devices_is_error() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(DEVICES_FILE), r#"[{"name": "lamp",]"#).unwrap();

        assert!(matches!(load_devices(&dir), Err(ConfigError::Json { .. })));
    }

    #[test]
    fn test_entry_missing_key_names_the_entry() {
        let (_tmp, dir) = temp_config();
        fs::write(
            dir.file(DEVICES_FILE),
            r#"[{"name": "lamp", "id": "abc", "key": "k"}, {"name": "other", "id": "x"}]"#,
        )
        .unwrap();

        match load_devices(&dir).unwrap_err() {
            ConfigError::InvalidEntry { path, entry, message } => {
                assert_eq!(path, dir.file(DEVICES_FILE));
                assert_eq!(entry, "#1");
                assert!(message.contains("missing field `key`"), "{message}");
            }
            other => panic!("expected InvalidEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_keyed_entry_error_names_the_key() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(DEVICES_FILE), r#"{"heater": {"key": "k"}}"#).unwrap();

        let err = load_devices(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntry { ref entry, .. } if entry == "'heater'"));
        assert!(err.to_string().contains("missing field `id`"));
    }

    #[test]
    fn test_snapshot_without_devices_list_is_error() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(SNAPSHOT_FILE), r#"{"devices": {"lamp": 1}}"#).unwrap();

        assert!(matches!(
            load_devices(&dir),
            Err(ConfigError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_scalar_devices_file_is_error() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(DEVICES_FILE), "42").unwrap();

        assert!(matches!(
            load_devices(&dir),
            Err(ConfigError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_missing_sources_is_error() {
        let (_tmp, dir) = temp_config();
        assert!(matches!(
            load_devices(&dir),
            Err(ConfigError::NoDeviceSource { .. })
        ));
    }

    #[test]
    fn test_blank_ip_is_not_an_address() {
        let entry = InventoryEntry {
            name: "lamp".into(),
            id: "abc".into(),
            ip: Some(String::new()),
            key: "k".into(),
            ver: None,
        };
        assert_eq!(entry.address(), None);
    }
}
