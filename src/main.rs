use clap::Parser;
use jq300_bridge::config::{Config, load_dotenv};
use jq300_bridge::controller::CachedController;
use jq300_bridge::device::{DeviceList, parse_device_list};
use jq300_bridge::error::Result;
use jq300_bridge::host::{EntityRegistry, spawn_poller};
use jq300_bridge::input::simulation::{default_devices, refresh_readings, run_sensor_simulation};
use jq300_bridge::platform::{DiscoveryInfo, IntegrationContext, setup_platform};
use log::{error, info};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

#[derive(Parser)]
#[command(name = "jq300-bridge")]
#[command(about = "Republish JQ-300 air quality readings as sensor entities")]
struct Cli {
    /// Cloud account username
    #[arg(long)]
    username: Option<String>,

    /// Device id to set up (repeatable, defaults to every device)
    #[arg(long = "device", value_delimiter = ',')]
    devices: Vec<String>,

    /// Seconds between entity polls
    #[arg(long)]
    scan_interval: Option<u64>,

    /// JSON device list for the simulated cloud session
    #[arg(long, env = "JQ300_DEVICES_FILE")]
    devices_file: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(username) = self.username {
            config.account.username = username;
        }
        if !self.devices.is_empty() {
            config.account.device_ids = self.devices;
        }
        if let Some(interval) = self.scan_interval {
            config.polling.scan_interval_secs = interval;
        }
        if let Some(path) = self.devices_file {
            config.simulation.devices_file = Some(path);
        }
    }
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn load_devices(config: &Config) -> Result<DeviceList> {
    match &config.simulation.devices_file {
        Some(path) => parse_device_list(&std::fs::read_to_string(path)?),
        None => Ok(default_devices()),
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_logger();
    info!("Starting JQ-300 bridge");

    let mut config = Config::from_env();
    Cli::parse().apply(&mut config);
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    let devices = match load_devices(&config) {
        Ok(devices) => devices,
        Err(e) => {
            error!("Failed to load device list: {}", e);
            std::process::exit(1);
        }
    };
    info!("Configuration loaded:");
    info!("  Account: {}", config.account.username);
    info!("  Devices: {}", devices.len());
    info!("  Scan interval: {}s", config.polling.scan_interval_secs);

    let controller = Arc::new(CachedController::new(config.account.username.clone()));
    controller.update_devices(devices.clone());
    refresh_readings(&controller, &devices);

    let mut ctx = IntegrationContext::new();
    ctx.register(config.account.username.clone(), controller.clone());

    let device_ids: Vec<String> = if config.account.device_ids.is_empty() {
        devices.keys().cloned().collect()
    } else {
        config.account.device_ids.clone()
    };

    let registry = Arc::new(RwLock::new(EntityRegistry::new()));
    for device_id in device_ids {
        let discovery = DiscoveryInfo::new(config.account.username.clone(), device_id);
        setup_platform(&ctx, &mut *registry.write(), Some(&discovery));
    }

    for entity in registry.read().entities() {
        info!(
            "  {} = {} {}",
            entity.entity_id(),
            entity.state(),
            entity.unit_of_measurement()
        );
    }

    let simulation = run_sensor_simulation(
        controller.clone(),
        devices,
        config.simulation.refresh_interval(),
    );
    let poller = spawn_poller(registry.clone(), config.polling.scan_interval());

    info!("JQ-300 bridge is running, press Ctrl+C to exit");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal");
        }
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
        }
    }

    poller.abort();
    simulation.abort();

    info!("JQ-300 bridge stopped");
}
