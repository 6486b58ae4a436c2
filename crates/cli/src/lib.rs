use clap::{Args, Parser, Subcommand};
use config::DEFAULT_CONFIG_DIR;
use observability::LogFormat;
use server::{DEFAULT_HOST, DEFAULT_HTTP_PORT};
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "plugd")]
#[command(about = "plugd - HTTP control for local smart plugs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the device configuration and serve the HTTP API
    Start(StartArgs),

    /// Load the configuration and build the registry without serving
    Validate {
        /// Directory holding config.json, devices.json/snapshot.json and names.json
        #[arg(short, long, env = "PLUGD_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
        config_dir: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Directory holding config.json, devices.json/snapshot.json and names.json
    #[arg(short, long, env = "PLUGD_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Address to bind the HTTP server to
    #[arg(long, env = "PLUGD_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// HTTP port
    #[arg(short, long, env = "PLUGD_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Base URL of the device-control bridge
    #[arg(long, env = "PLUGD_BRIDGE_URL", default_value = "http://127.0.0.1:8888")]
    pub bridge_url: Url,

    /// Seconds to wait for a device before giving up
    #[arg(long, env = "PLUGD_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Serve Prometheus metrics on this port
    #[arg(long, env = "PLUGD_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Log output format: pretty, json or compact
    #[arg(long, env = "PLUGD_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Include each device's local key in GET /
    #[arg(long, env = "PLUGD_EXPOSE_KEYS")]
    pub expose_keys: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
