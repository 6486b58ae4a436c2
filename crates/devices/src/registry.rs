//! Device registry: reconciles `names.json` with the device inventory

use config::{
    load_devices, load_names, ConfigDir, DeviceSource, InventoryEntry, NameEntry,
    DEFAULT_PROTOCOL_VERSION,
};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use crate::error::{RegistryError, Result};
use crate::record::DeviceRecord;

/// Build one record per (name, inventory entry) pair that share a name
///
/// The inventory address wins over the name-list address. A pair that ends
/// up without an address, id or key is skipped with a warning.
pub fn create_devices(source: &DeviceSource, names: &[NameEntry]) -> Result<Vec<DeviceRecord>> {
    let mut records = Vec::new();

    for name in names {
        let mut matched = false;

        for entry in source.entries().iter().filter(|e| e.name == name.name) {
            matched = true;

            let fallback = name.ip.as_deref().filter(|ip| !ip.trim().is_empty());
            let Some(address) = entry.address().or(fallback) else {
                warn!(device = %entry.name, "Device has no address in {} or names.json, skipping", source.file_name());
                continue;
            };

            if entry.id.is_empty() || entry.key.is_empty() {
                warn!(device = %entry.name, "Device is missing its id or key, skipping");
                continue;
            }

            records.push(DeviceRecord {
                name: entry.name.clone(),
                device_id: entry.id.clone(),
                address: address.to_string(),
                key: entry.key.clone(),
                version: protocol_version(entry)?,
            });
        }

        if !matched {
            warn!(name = %name.name, "No device in {} matches this name", source.file_name());
        }
    }

    info!("Processed {} controllable devices", records.len());
    Ok(records)
}

fn protocol_version(entry: &InventoryEntry) -> Result<f64> {
    match entry.ver.as_deref().map(str::trim) {
        None | Some("") => Ok(DEFAULT_PROTOCOL_VERSION),
        Some(ver) => ver
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RegistryError::InvalidVersion {
                name: entry.name.clone(),
                value: ver.to_string(),
            }),
    }
}

/// Read-only set of controllable devices, looked up by name
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    records: Vec<DeviceRecord>,
    by_name: HashMap<String, usize>,
}

impl DeviceRegistry {
    /// Index records by name; the first record with a given name wins
    pub fn new(records: Vec<DeviceRecord>) -> Self {
        let mut by_name = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            by_name.entry(record.name.clone()).or_insert(idx);
        }
        Self { records, by_name }
    }

    /// Reconcile names with the inventory, refusing an empty result
    pub fn build(source: &DeviceSource, names: &[NameEntry]) -> Result<Self> {
        let records = create_devices(source, names)?;
        if records.is_empty() {
            return Err(RegistryError::Empty {
                source_file: source.file_name(),
            });
        }
        Ok(Self::new(records))
    }

    /// Load the inventory and names from `dir` and build the registry
    #[instrument]
    pub fn load(dir: &ConfigDir) -> Result<Self> {
        let source = load_devices(dir)?;
        let names = load_names(dir, &source)?;
        Self::build(&source, &names)
    }

    pub fn get(&self, name: &str) -> Option<&DeviceRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// All records in reconciliation order
    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
