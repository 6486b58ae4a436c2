//! Configuration loading for plugd
//!
//! Everything lives in one directory (`./config` by default):
//!
//! - `config.json` - API key store, the only file this crate writes
//! - `snapshot.json` - pre-resolved device list with addresses
//! - `devices.json` - plain device inventory, used when there is no snapshot
//! - `names.json` - device names, with addresses unless a snapshot is used

pub mod api_key;
pub mod defaults;
pub mod error;
pub mod inventory;
pub mod names;
pub mod parser;
pub mod validator;

pub use api_key::*;
pub use defaults::*;
pub use error::{ConfigError, Result};
pub use inventory::*;
pub use names::*;
pub use parser::*;
pub use validator::*;
