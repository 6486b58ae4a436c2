use crate::error::{ConfigError, Result};
use crate::inventory::DeviceSource;
use crate::names::NameEntry;
use std::net::IpAddr;
use tracing::error;

/// Whether `ip` is a syntactically valid IPv4 or IPv6 address
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// Check that the name list can supply device addresses
///
/// A snapshot already embeds addresses, so nothing is checked in that case.
/// Otherwise the first entry without a valid `ip` is returned as an error.
pub fn validate_names(names: &[NameEntry], source: &DeviceSource) -> Result<()> {
    if source.is_snapshot() {
        return Ok(());
    }

    for entry in names {
        let Some(ip) = entry.ip.as_deref() else {
            error!("names.json does not appear to contain an ip key and snapshot.json does not exist.");
            return Err(ConfigError::MissingIp {
                name: entry.name.clone(),
            });
        };

        if !is_valid_ip(ip) {
            error!(
                "{} does not have a valid ip address specified in the ip key. It is currently: {}",
                entry.name, ip
            );
            return Err(ConfigError::InvalidIp {
                name: entry.name.clone(),
                ip: ip.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("10.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("10.0.0.256"));
        assert!(!is_valid_ip("lamp.local"));
        assert!(!is_valid_ip(""));
    }

    #[test]
    fn test_invalid_ip_rejected_for_inventory() {
        let names = vec![
            NameEntry::new("lamp", Some("10.0.0.2")),
            NameEntry::new("fan", Some("10.0.0")),
        ];

        let err = validate_names(&names, &DeviceSource::Inventory(vec![])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIp { ref name, .. } if name == "fan"));
    }

    #[test]
    fn test_snapshot_accepts_anything() {
        let names = vec![NameEntry::new("lamp", None), NameEntry::new("fan", Some("?"))];
        assert!(validate_names(&names, &DeviceSource::Snapshot(vec![])).is_ok());
    }
}
