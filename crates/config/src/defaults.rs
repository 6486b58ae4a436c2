/// API key store, read and written
pub const CONFIG_FILE: &str = "config.json";

/// Plain device inventory
pub const DEVICES_FILE: &str = "devices.json";

/// Pre-resolved device list; takes precedence over [`DEVICES_FILE`]
pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Human-readable names (and addresses when no snapshot is used)
pub const NAMES_FILE: &str = "names.json";

/// Length of a freshly generated API key
pub const API_KEY_LENGTH: usize = 32;

/// Protocol version used when the inventory leaves it blank
pub const DEFAULT_PROTOCOL_VERSION: f64 = 3.1;

/// Config directory used when none is given, relative to the working directory
pub const DEFAULT_CONFIG_DIR: &str = "config";
