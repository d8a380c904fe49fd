//! Harness configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Files are JSON.

use crate::errors::ConfigError;
use crate::factory::{OrderFactory, DEFAULT_SYMBOLS};
use crate::runner::{ConcurrentConfig, DEFAULT_WORKER_TIMEOUT};
use crate::scenarios::market_stress::MarketStressConfig;
use crate::scenarios::{default_entries, CatalogEntry, ScenarioCatalog};
use crate::scheduler::{BurstConfig, HighFrequencyConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Symbols orders are drawn from
    pub symbols: Vec<String>,
    /// Seed for reproducible runs; entropy when unset
    pub seed: Option<u64>,
    /// Directory receiving the JSON order files
    pub output_dir: PathBuf,
    /// Per-worker completion bound for concurrent runs
    pub worker_timeout_secs: u64,
    pub quick_test: BurstConfig,
    pub high_frequency: HighFrequencyConfig,
    pub market_stress: MarketStressConfig,
    pub concurrent: ConcurrentConfig,
    /// Burst used when the menu selection is not recognised
    pub fallback: BurstConfig,
    pub catalog: Vec<CatalogEntry>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            seed: None,
            output_dir: PathBuf::from("data"),
            worker_timeout_secs: DEFAULT_WORKER_TIMEOUT.as_secs(),
            quick_test: BurstConfig::default(),
            high_frequency: HighFrequencyConfig::default(),
            market_stress: MarketStressConfig::default(),
            concurrent: ConcurrentConfig::default(),
            fallback: BurstConfig { count: 1_000, duration_secs: 2.0 },
            catalog: default_entries(),
        }
    }
}

impl HarnessConfig {
    /// Load and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let config: HarnessConfig = serde_json::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::EmptySymbolSet);
        }
        for burst in [&self.quick_test, &self.fallback] {
            if !burst.duration_secs.is_finite() || burst.duration_secs < 0.0 {
                return Err(ConfigError::InvalidDuration(burst.duration_secs));
            }
        }
        if self.worker_timeout_secs == 0 {
            return Err(ConfigError::InvalidDuration(0.0));
        }
        self.high_frequency.validate()?;
        if self.concurrent.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(0));
        }
        ScenarioCatalog::new(self.catalog.clone())?;
        Ok(())
    }

    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_timeout_secs)
    }

    pub fn build_factory(&self) -> Result<OrderFactory, ConfigError> {
        OrderFactory::new(self.symbols.iter().cloned())
    }

    pub fn build_catalog(&self) -> Result<ScenarioCatalog, ConfigError> {
        ScenarioCatalog::new(self.catalog.clone())
    }
}
