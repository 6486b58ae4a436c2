//! API key store (`config.json`)
//!
//! The key is the only state this service ever writes to disk. It is generated
//! on first run and read back on every start after that.

use crate::defaults::{API_KEY_LENGTH, CONFIG_FILE};
use crate::error::{ConfigError, Result};
use crate::parser::{read_json, write_json, ConfigDir};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::{Map, Value};
use tracing::{error, info, instrument, warn};

/// Field holding the key inside `config.json`
const API_KEY_FIELD: &str = "api_key";

/// Generate a random alphanumeric key of `len` characters
pub fn generate_api_key(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Store `key` in `config.json`
///
/// Other fields of an existing file are preserved. An existing file that
/// cannot be parsed is left untouched and reported as an error.
#[instrument(skip(key))]
pub fn save_api_key(dir: &ConfigDir, key: &str) -> Result<()> {
    let path = dir.file(CONFIG_FILE);

    let mut config = if path.exists() {
        match read_json::<Value>(&path) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(ConfigError::NotAnObject { path }),
            Err(e) => {
                error!("save_api_key: invalid JSON while loading existing {}", path.display());
                return Err(e);
            }
        }
    } else {
        Map::new()
    };

    config.insert(API_KEY_FIELD.to_string(), Value::String(key.to_string()));
    write_json(&path, &Value::Object(config))?;

    info!(path = %path.display(), "API key saved");
    Ok(())
}

/// Read the stored API key without creating one
///
/// Returns `None` when `config.json` is missing or holds no non-empty
/// `api_key`. Nothing is written.
#[instrument]
pub fn read_api_key(dir: &ConfigDir) -> Result<Option<String>> {
    let path = dir.file(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let config = read_json::<Value>(&path).map_err(|e| {
        error!("invalid JSON while loading existing {}", path.display());
        e
    })?;

    Ok(config
        .get(API_KEY_FIELD)
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .map(str::to_string))
}

/// Load the API key, generating and persisting a new one when none exists
///
/// Only an unparsable `config.json` is an error; a missing file or a missing
/// key both lead to a fresh key.
///
/// # Arguments
///
/// * `dir` - Config directory holding `config.json`
pub fn load_api_key(dir: &ConfigDir) -> Result<String> {
    match read_api_key(dir)? {
        Some(key) => Ok(key),
        None => {
            warn!("API key not found in {}, generating new", CONFIG_FILE);
            generate_and_save(dir)
        }
    }
}

fn generate_and_save(dir: &ConfigDir) -> Result<String> {
    let key = generate_api_key(API_KEY_LENGTH);
    save_api_key(dir, &key)?;
    info!(api_key = %key, "API key generated");
    Ok(key)
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
    fn test_generate_api_key_is_alphanumeric() {
        let key = generate_api_key(32);
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(key, generate_api_key(32));
    }

    #[test]
    fn test_save_then_load() {
        let (_tmp, dir) = temp_config();
        save_api_key(&dir, "secret-key").unwrap();
        assert_eq!(load_api_key(&dir).unwrap(), "secret-key");
    }

    #[test]
    fn test_load_generates_once() {
        let (_tmp, dir) = temp_config();

        let first = load_api_key(&dir).unwrap();
        assert_eq!(first.len(), API_KEY_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(dir.file(CONFIG_FILE).exists());

        let second = load_api_key(&dir).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_generates_when_field_missing() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(CONFIG_FILE), r#"{"other": 1}"#).unwrap();

        let key = load_api_key(&dir).unwrap();
        assert_eq!(key.len(), API_KEY_LENGTH);

        let stored: Value = read_json(&dir.file(CONFIG_FILE)).unwrap();
        assert_eq!(stored["api_key"], Value::String(key));
        assert_eq!(stored["other"], Value::from(1));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(CONFIG_FILE), "{not json").unwrap();

        assert!(matches!(load_api_key(&dir), Err(ConfigError::Json { .. })));
        assert!(matches!(read_api_key(&dir), Err(ConfigError::Json { .. })));
    }

    #[test]
    fn test_save_preserves_other_fields() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(CONFIG_FILE), r#"{"api_key": "old", "note": "keep"}"#).unwrap();

        save_api_key(&dir, "new").unwrap();

        let stored: Value = read_json(&dir.file(CONFIG_FILE)).unwrap();
        assert_eq!(stored["api_key"], "new");
        assert_eq!(stored["note"], "keep");
    }

    #[test]
    fn test_save_does_not_overwrite_invalid_file() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(CONFIG_FILE), "garbage").unwrap();

        assert!(save_api_key(&dir, "new").is_err());
        assert_eq!(fs::read_to_string(dir.file(CONFIG_FILE)).unwrap(), "garbage");
    }

    #[test]
    fn test_save_rejects_non_object() {
        let (_tmp, dir) = temp_config();
        fs::write(dir.file(CONFIG_FILE), "[1, 2]").unwrap();

        assert!(matches!(
            save_api_key(&dir, "new"),
            Err(ConfigError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_read_api_key_never_writes() {
        let (_tmp, dir) = temp_config();

        assert_eq!(read_api_key(&dir).unwrap(), None);
        assert!(!dir.file(CONFIG_FILE).exists());

        fs::write(dir.file(CONFIG_FILE), r#"{"api_key": ""}"#).unwrap();
        assert_eq!(read_api_key(&dir).unwrap(), None);
        assert_eq!(fs::read_to_string(dir.file(CONFIG_FILE)).unwrap(), r#"{"api_key": ""}"#);

        save_api_key(&dir, "stored").unwrap();
        assert_eq!(read_api_key(&dir).unwrap().as_deref(), Some("stored"));
    }
}
