//! Name list loading (`names.json`)

use crate::defaults::NAMES_FILE;
use crate::error::Result;
use crate::inventory::DeviceSource;
use crate::parser::{read_json, ConfigDir};
use crate::validator::validate_names;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// Human-readable device name, optionally with the device's address
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NameEntry {
    pub name: String,
    #[serde(default)]
    pub ip: Option<String>,
}

impl NameEntry {
    pub fn new(name: impl Into<String>, ip: Option<&str>) -> Self {
        Self {
            name: name.into(),
            ip: ip.map(str::to_string),
        }
    }
}

/// Load `names.json` and validate it against the device source
///
/// Without a snapshot every entry must carry a valid IP address; one bad
/// entry fails the whole load.
#[instrument(skip(source), fields(snapshot = source.is_snapshot()))]
pub fn load_names(dir: &ConfigDir, source: &DeviceSource) -> Result<Vec<NameEntry>> {
    let names: Vec<NameEntry> = read_json(&dir.file(NAMES_FILE)).map_err(|e| {
        error!("Names loading failed");
        e
    })?;

    validate_names(&names, source)?;

    info!("Loaded {} names from {}", names.len(), NAMES_FILE);
    Ok(names)
}
