//! plugd CLI and server binary
//!
//! Loads the device configuration, then serves the smart-plug HTTP API or,
//! with `validate`, only reports what it loaded.

use anyhow::{Context, Result};
use cli::{Cli, Commands, StartArgs};
use config::{load_api_key, read_api_key, ConfigDir, CONFIG_FILE};
use devices::api::{create_router, ApiKey, DeviceApiState};
use devices::{DeviceRegistry, HttpDeviceControl};
use observability::{init_logging, init_metrics, LogFormat};
use server::{validate_port_available, HttpServer, ServerConfig, ServerExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start(args) => {
            init_logging("plugd", args.log_format)?;
            debug!(?args, "CLI arguments parsed");
            info!("Executing 'start' command");
            start_service(args).await
        }
        Commands::Validate { config_dir } => {
            init_logging("plugd", LogFormat::Pretty)?;
            info!("Executing 'validate' command");
            validate_command(config_dir)
        }
    }
}

/// Load the API key and registry; any failure here aborts startup
fn load_state(dir: &ConfigDir) -> Result<(String, DeviceRegistry)> {
    let api_key = load_api_key(dir).map_err(|e| {
        error!("Failed to load API key: {}", e);
        e
    })?;

    let registry = DeviceRegistry::load(dir).map_err(|e| {
        error!("Failed to build device registry: {}", e);
        e
    })?;

    Ok((api_key, registry))
}

async fn start_service(args: StartArgs) -> Result<()> {
    let dir = ConfigDir::new(args.config_dir.clone());
    info!(config_dir = %dir.root().display(), "Loading configuration");

    let (api_key, registry) = load_state(&dir)?;

    if let Some(port) = args.metrics_port {
        init_metrics(&args.host, port)?;
    }

    let control = HttpDeviceControl::new(
        args.bridge_url.clone(),
        Duration::from_secs(args.timeout_secs),
    )
    .context("Failed to build device-control client")?;
    info!(bridge = %control.base_url(), timeout_secs = args.timeout_secs, "Using device-control bridge");

    let state = DeviceApiState::new(registry, Arc::new(control), ApiKey::new(api_key))
        .with_expose_keys(args.expose_keys);

    let server_config = ServerConfig::new(args.host.clone(), args.port);
    validate_port_available(&server_config).await?;

    info!(
        host = %server_config.host,
        port = server_config.port,
        devices = state.registry.len(),
        "Starting plugd"
    );

    let server = HttpServer::new(server_config, create_router(state));
    server.run_until_signal().await?;

    info!("plugd stopped");
    Ok(())
}

fn validate_command(config_dir: PathBuf) -> Result<()> {
    let dir = ConfigDir::new(config_dir);

    // Read-only: a missing key is reported, not generated
    let api_key = read_api_key(&dir).map_err(|e| {
        error!("Failed to read API key: {}", e);
        e
    })?;
    let registry = DeviceRegistry::load(&dir).map_err(|e| {
        error!("Failed to build device registry: {}", e);
        e
    })?;

    println!("\n=== Configuration Validation Report ===\n");
    println!("Config directory: {}", dir.root().display());
    match api_key {
        Some(_) => println!("API key: present in {}", CONFIG_FILE),
        None => println!("API key: missing, one will be generated on start"),
    }
    println!("Controllable devices ({}):", registry.len());
    for device in registry.records() {
        println!(
            "  [ok] {} (id {}, {}, v{})",
            device.name, device.device_id, device.address, device.version
        );
    }
    println!();
    println!("[ok] Configuration is valid!");
    Ok(())
}
