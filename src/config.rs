use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    let env_path = Path::new(".env");
    if !env_path.exists() {
        return;
    }

    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(key).is_err() {
            // SAFETY: called from main before the async runtime spawns any threads
            unsafe { std::env::set_var(key, value) };
        }
    }
}

/// Split `.env` content into key/value pairs, skipping blanks and comments.
fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();

            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }

            pairs.push((key, value));
        }
    }

    pairs
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub account: AccountConfig,
    pub polling: PollingConfig,
    pub simulation: SimulationConfig,
}

/// Cloud account the bridge republishes devices for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    /// Devices to set up. Empty means every device in the account's list.
    pub device_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    pub scan_interval_secs: u64,
}

impl PollingConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }
}

/// Settings for the simulated cloud session used by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub refresh_interval_secs: u64,
    /// JSON file holding the cloud's device list; a built-in device is used when unset.
    pub devices_file: Option<PathBuf>,
}

impl SimulationConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: AccountConfig {
                username: "user@example.com".to_string(),
                device_ids: vec![],
            },
            polling: PollingConfig {
                scan_interval_secs: 30,
            },
            simulation: SimulationConfig {
                refresh_interval_secs: 60,
                devices_file: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(username) = std::env::var("JQ300_USERNAME") {
            config.account.username = username;
        }
        if let Ok(ids) = std::env::var("JQ300_DEVICE_IDS") {
            config.account.device_ids = split_list(&ids);
        }
        if let Ok(interval) = std::env::var("JQ300_SCAN_INTERVAL_SECS")
            && let Ok(i) = interval.parse()
        {
            config.polling.scan_interval_secs = i;
        }
        if let Ok(interval) = std::env::var("JQ300_SIM_REFRESH_SECS")
            && let Ok(i) = interval.parse()
        {
            config.simulation.refresh_interval_secs = i;
        }
        if let Ok(path) = std::env::var("JQ300_DEVICES_FILE") {
            config.simulation.devices_file = Some(PathBuf::from(path));
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.account.username.trim().is_empty() {
            return Err(BridgeError::Config("account username is empty".to_string()));
        }
        if self.polling.scan_interval_secs == 0 {
            return Err(BridgeError::Config(
                "scan interval must be at least one second".to_string(),
            ));
        }
        if self.simulation.refresh_interval_secs == 0 {
            return Err(BridgeError::Config(
                "simulation refresh interval must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
