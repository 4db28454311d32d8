//! # Sync Configuration
//!
//! Timing, probability and catalog settings for the simulated sync engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GOODLINK_SIMULATOR_INTERVAL_MS=8000                                │
//! │     GOODLINK_SYNC_FAILURE_RATE=0.1                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/sync/sync.toml (Linux)                                   │
//! │     ~/Library/Application Support/de.goodlink.sync/sync.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [simulator]
//! enabled = true
//! interval_ms = 8000
//! max_quantity_delta = 5
//! notify_threshold = 3
//!
//! [manual_sync]
//! min_delay_ms = 500
//! max_delay_ms = 1500
//! failure_probability = 0.1
//!
//! [retry]
//! delay_ms = 1000
//! success_probability = 0.7
//!
//! [activity]
//! enabled = true
//! min_interval_ms = 5000
//! max_interval_ms = 15000
//!
//! [catalog]
//! skus = ["GL-001", "GL-002", "GL-003", "GL-004", "GL-005"]
//! marketplaces = ["Amazon", "eBay", "OTTO", "Kaufland", "bol.com"]
//!
//! [storage]
//! database_path = "/var/lib/goodlink/goodlink.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use goodlink_core::validation::{validate_marketplace, validate_probability, validate_sku};

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Simulator Settings
// =============================================================================

/// Background quantity mutation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorSettings {
    /// Whether the runner starts the simulator on mount.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Period between ticks (milliseconds). The first tick fires one full
    /// period after start.
    #[serde(default = "default_simulator_interval")]
    pub interval_ms: u64,

    /// Deltas are drawn from `[-max_quantity_delta, +max_quantity_delta]`.
    #[serde(default = "default_max_quantity_delta")]
    pub max_quantity_delta: i64,

    /// A notification is emitted when `|delta|` exceeds this.
    #[serde(default = "default_notify_threshold")]
    pub notify_threshold: i64,
}

fn default_true() -> bool {
    true
}
fn default_simulator_interval() -> u64 {
    8000
}
fn default_max_quantity_delta() -> i64 {
    5
}
fn default_notify_threshold() -> i64 {
    3
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        SimulatorSettings {
            enabled: true,
            interval_ms: default_simulator_interval(),
            max_quantity_delta: default_max_quantity_delta(),
            notify_threshold: default_notify_threshold(),
        }
    }
}

impl SimulatorSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// =============================================================================
// Manual Sync Settings
// =============================================================================

/// Bulk sync timing and failure rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualSyncSettings {
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Probability that one record's attempt ends in `error`.
    #[serde(default = "default_failure_probability")]
    pub failure_probability: f64,
}

fn default_min_delay() -> u64 {
    500
}
fn default_max_delay() -> u64 {
    1500
}
fn default_failure_probability() -> f64 {
    0.1
}

impl Default for ManualSyncSettings {
    fn default() -> Self {
        ManualSyncSettings {
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            failure_probability: default_failure_probability(),
        }
    }
}

// =============================================================================
// Retry Settings
// =============================================================================

/// Single-record retry timing and success rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_retry_delay")]
    pub delay_ms: u64,

    #[serde(default = "default_success_probability")]
    pub success_probability: f64,
}

fn default_retry_delay() -> u64 {
    1000
}
fn default_success_probability() -> f64 {
    0.7
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            delay_ms: default_retry_delay(),
            success_probability: default_success_probability(),
        }
    }
}

impl RetrySettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// =============================================================================
// Activity Feed Settings
// =============================================================================

/// Live activity feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// The feed period is drawn once per start from `[min, max]`.
    #[serde(default = "default_activity_min")]
    pub min_interval_ms: u64,

    #[serde(default = "default_activity_max")]
    pub max_interval_ms: u64,

    #[serde(default = "default_activity_error_probability")]
    pub error_probability: f64,

    /// Probability that an entry carries a quantity change.
    #[serde(default = "default_quantity_change_probability")]
    pub quantity_change_probability: f64,
}

fn default_activity_min() -> u64 {
    5000
}
fn default_activity_max() -> u64 {
    15000
}
fn default_activity_error_probability() -> f64 {
    0.1
}
fn default_quantity_change_probability() -> f64 {
    0.5
}

impl Default for ActivitySettings {
    fn default() -> Self {
        ActivitySettings {
            enabled: true,
            min_interval_ms: default_activity_min(),
            max_interval_ms: default_activity_max(),
            error_probability: default_activity_error_probability(),
            quantity_change_probability: default_quantity_change_probability(),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Candidate keys the simulators draw from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_skus")]
    pub skus: Vec<String>,

    #[serde(default = "default_marketplaces")]
    pub marketplaces: Vec<String>,
}

fn default_skus() -> Vec<String> {
    ["GL-001", "GL-002", "GL-003", "GL-004", "GL-005"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_marketplaces() -> Vec<String> {
    ["Amazon", "eBay", "OTTO", "Kaufland", "bol.com"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            skus: default_skus(),
            marketplaces: default_marketplaces(),
        }
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Where persisted state lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Main Sync Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub simulator: SimulatorSettings,

    #[serde(default)]
    pub manual_sync: ManualSyncSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub activity: ActivitySettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl SyncConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (sync.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading sync config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load sync config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Sync config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if self.simulator.interval_ms == 0 {
            return Err(SyncError::InvalidConfig(
                "simulator.interval_ms must be greater than 0".into(),
            ));
        }

        if self.simulator.max_quantity_delta < 0 {
            return Err(SyncError::InvalidConfig(
                "simulator.max_quantity_delta must not be negative".into(),
            ));
        }

        if self.manual_sync.min_delay_ms > self.manual_sync.max_delay_ms {
            return Err(SyncError::InvalidConfig(format!(
                "manual_sync.min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.manual_sync.min_delay_ms, self.manual_sync.max_delay_ms
            )));
        }

        if self.activity.min_interval_ms == 0
            || self.activity.min_interval_ms > self.activity.max_interval_ms
        {
            return Err(SyncError::InvalidConfig(format!(
                "activity interval range [{}, {}] is invalid",
                self.activity.min_interval_ms, self.activity.max_interval_ms
            )));
        }

        validate_probability("manual_sync.failure_probability", self.manual_sync.failure_probability)?;
        validate_probability("retry.success_probability", self.retry.success_probability)?;
        validate_probability("activity.error_probability", self.activity.error_probability)?;
        validate_probability(
            "activity.quantity_change_probability",
            self.activity.quantity_change_probability,
        )?;

        if self.catalog.skus.is_empty() || self.catalog.marketplaces.is_empty() {
            return Err(SyncError::InvalidConfig(
                "catalog needs at least one sku and one marketplace".into(),
            ));
        }

        for sku in &self.catalog.skus {
            validate_sku(sku)?;
        }
        for marketplace in &self.catalog.marketplaces {
            validate_marketplace(marketplace)?;
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("GOODLINK_SIMULATOR_INTERVAL_MS") {
            match value.parse::<u64>() {
                Ok(ms) => {
                    debug!(interval_ms = ms, "Overriding simulator interval from environment");
                    self.simulator.interval_ms = ms;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid GOODLINK_SIMULATOR_INTERVAL_MS"),
            }
        }

        if let Ok(value) = std::env::var("GOODLINK_SIMULATOR_ENABLED") {
            self.simulator.enabled = parse_flag(&value);
        }

        if let Ok(value) = std::env::var("GOODLINK_ACTIVITY_ENABLED") {
            self.activity.enabled = parse_flag(&value);
        }

        if let Ok(value) = std::env::var("GOODLINK_SYNC_FAILURE_RATE") {
            if let Ok(p) = value.parse::<f64>() {
                self.manual_sync.failure_probability = p;
            }
        }

        if let Ok(value) = std::env::var("GOODLINK_RETRY_SUCCESS_RATE") {
            if let Ok(p) = value.parse::<f64>() {
                self.retry.success_probability = p;
            }
        }

        if let Ok(path) = std::env::var("GOODLINK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("de", "goodlink", "sync")
            .map(|dirs| dirs.config_dir().join("sync.toml"))
    }

    /// Returns the configured database path, or the platform data directory.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.storage.database_path.clone().or_else(|| {
            directories::ProjectDirs::from("de", "goodlink", "sync")
                .map(|dirs| dirs.data_dir().join("goodlink.db"))
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.simulator.interval_ms, 8000);
        assert_eq!(config.simulator.max_quantity_delta, 5);
        assert_eq!(config.manual_sync.min_delay_ms, 500);
        assert_eq!(config.manual_sync.max_delay_ms, 1500);
        assert_eq!(config.retry.delay_ms, 1000);
        assert!((config.retry.success_probability - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.catalog.marketplaces.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SyncConfig::default();

        config.manual_sync.min_delay_ms = 2000;
        assert!(config.validate().is_err());

        config = SyncConfig::default();
        config.retry.success_probability = 1.2;
        assert!(matches!(config.validate(), Err(SyncError::Validation(_))));

        config = SyncConfig::default();
        config.catalog.marketplaces.clear();
        assert!(matches!(config.validate(), Err(SyncError::InvalidConfig(_))));

        config = SyncConfig::default();
        config.simulator.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SyncConfig = toml::from_str(
            r#"
            [retry]
            success_probability = 0.5

            [catalog]
            marketplaces = ["Amazon"]
            "#,
        )
        .unwrap();

        assert!((config.retry.success_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.retry.delay_ms, 1000);
        assert_eq!(config.catalog.marketplaces, vec!["Amazon".to_string()]);
        assert_eq!(config.catalog.skus.len(), 5);
    }

    #[test]
    fn test_toml_serialization() {
        let config = SyncConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[simulator]"));
        assert!(toml_str.contains("[manual_sync]"));
        assert!(toml_str.contains("[catalog]"));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("goodlink-config-{}", std::process::id()))
            .join("sync.toml");

        let mut config = SyncConfig::default();
        config.retry.delay_ms = 250;
        config.catalog.skus = vec!["GL-010".to_string()];
        config.save(Some(path.clone())).unwrap();

        let loaded = SyncConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.retry.delay_ms, 250);
        assert_eq!(loaded.catalog.skus, vec!["GL-010".to_string()]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("off"));
    }
}
