//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::provider::RpcConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub contract: ContractConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider (JSON-RPC node / wallet) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Account used for attendance updates; defaults to the first provider account
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_receipt_poll_interval")]
    pub receipt_poll_interval_ms: u64,

    #[serde(default = "default_receipt_timeout")]
    pub receipt_timeout_ms: u64,

    /// Gas limit attached to transactions; unset lets the node estimate
    #[serde(default)]
    pub gas_limit: Option<u64>,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:7545".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_receipt_poll_interval() -> u64 {
    500
}

fn default_receipt_timeout() -> u64 {
    60_000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            account: None,
            request_timeout_ms: default_request_timeout(),
            receipt_poll_interval_ms: default_receipt_poll_interval(),
            receipt_timeout_ms: default_receipt_timeout(),
            gas_limit: None,
        }
    }
}

impl ProviderConfig {
    /// Settings for the JSON-RPC provider
    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            url: self.url.clone(),
            request_timeout_ms: self.request_timeout_ms,
            receipt_poll_interval_ms: self.receipt_poll_interval_ms,
            receipt_timeout_ms: self.receipt_timeout_ms,
            gas_limit: self.gas_limit,
        }
    }
}

/// Contract artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// Used when the artifact has no deployment for the connected network
    #[serde(default)]
    pub address: Option<String>,
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("./contracts/EmployeeManagementSystem.json")
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
            address: None,
        }
    }
}

/// Count display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_auto_hide")]
    pub auto_hide_ms: u64,
}

fn default_auto_hide() -> u64 {
    3000
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            auto_hide_ms: default_auto_hide(),
        }
    }
}

impl DisplayConfig {
    pub fn auto_hide(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }
}

/// Offline session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_local_accounts")]
    pub accounts: usize,

    #[serde(default = "default_local_network_id")]
    pub network_id: String,
}

fn default_local_accounts() -> usize {
    10
}

fn default_local_network_id() -> String {
    "local".to_string()
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            accounts: default_local_accounts(),
            network_id: default_local_network_id(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("attendance").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Provider overrides
        if let Some(url) = var("ATTENDANCE_RPC_URL") {
            self.provider.url = url;
        }
        if let Some(account) = var("ATTENDANCE_ACCOUNT") {
            self.provider.account = Some(account);
        }

        // Contract overrides
        if let Some(path) = var("ATTENDANCE_ARTIFACT") {
            self.contract.artifact_path = PathBuf::from(path);
        }
        if let Some(address) = var("ATTENDANCE_CONTRACT_ADDRESS") {
            self.contract.address = Some(address);
        }

        // Display overrides
        if let Some(ms) = var("ATTENDANCE_AUTO_HIDE_MS") {
            if let Ok(ms) = ms.parse() {
                self.display.auto_hide_ms = ms;
            }
        }

        // Logging overrides
        if let Some(level) = var("ATTENDANCE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ATTENDANCE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Attendance Client Configuration
#
# Environment variables override these settings:
# - ATTENDANCE_RPC_URL
# - ATTENDANCE_ACCOUNT
# - ATTENDANCE_ARTIFACT
# - ATTENDANCE_CONTRACT_ADDRESS
# - ATTENDANCE_AUTO_HIDE_MS
# - ATTENDANCE_LOG_LEVEL
# - ATTENDANCE_LOG_FORMAT

[provider]
# JSON-RPC endpoint of the node or wallet bridge
url = "http://127.0.0.1:7545"

# Account used for attendance updates (default: first provider account)
# account = "0x32F44FE78943a60250Bc7E4BBf7695A1c5a72E8B"

# Per-request timeout (ms)
request_timeout_ms = 10000

# How often to poll for a transaction receipt (ms)
receipt_poll_interval_ms = 500

# Give up waiting for a receipt after (ms)
receipt_timeout_ms = 60000

# Gas limit attached to transactions (default: estimated by the node,
# which also reports contract rejections before anything is mined)
# gas_limit = 3000000

[contract]
# Compiled contract artifact (ABI + networks)
artifact_path = "./contracts/EmployeeManagementSystem.json"

# Address used when the artifact has no deployment for the network
# address = "0x..."

[display]
# How long a count stays visible (ms)
auto_hide_ms = 3000

[local]
# Accounts available in --local sessions
accounts = 10
network_id = "local"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
