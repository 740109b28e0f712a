//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config.toml structure.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::strategy::params::{BacktestParams, CapitalMode, ValidationMode};

/// Environment variable overriding `data.dir`
pub const DATA_DIR_ENV: &str = "REVERSION_DATA_DIR";

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backtest: BacktestSection,
    pub data: DataSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Backtest parameter section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    /// Capital reported as the first capital curve element
    pub initial_capital: f64,
    /// Enter long when z < -buy_threshold
    pub buy_threshold: f64,
    /// Enter short when z > sell_threshold
    pub sell_threshold: f64,
    /// Cost per unit of position change (price units)
    pub trading_cost: f64,
    /// "seed_only" (reference numbers) or "scaled"
    pub capital_mode: CapitalMode,
    /// "permissive" or "strict" (reject NaN/Inf prices)
    pub validation: ValidationMode,
}

impl Default for BacktestSection {
    fn default() -> Self {
        let params = BacktestParams::default();
        Self {
            initial_capital: params.initial_capital,
            buy_threshold: params.buy_threshold,
            sell_threshold: params.sell_threshold,
            trading_cost: params.trading_cost,
            capital_mode: params.capital_mode,
            validation: params.validation,
        }
    }
}

/// Price data section
#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
    /// Directory holding the CSV datasets
    #[serde(default = "default_data_dir")]
    pub dir: String,
    /// CSV file name inside `dir`
    pub file: String,
    /// Columns to backtest, each as an independent run
    #[serde(default = "default_price_columns")]
    pub price_columns: Vec<String>,
}

fn default_data_dir() -> String {
    "csv_dataset".to_string()
}

fn default_price_columns() -> Vec<String> {
    vec!["Close".to_string()]
}

impl DataSection {
    /// Data directory with environment override and `~` expansion.
    /// Checks REVERSION_DATA_DIR first, falls back to config value
    pub fn get_dir(&self) -> PathBuf {
        self.resolve_dir(std::env::var(DATA_DIR_ENV).ok())
    }

    /// Full path of the dataset file
    pub fn file_path(&self) -> PathBuf {
        self.get_dir().join(&self.file)
    }

    fn resolve_dir(&self, dir_override: Option<String>) -> PathBuf {
        let raw = dir_override.unwrap_or_else(|| self.dir.clone());
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }
}

/// Output section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Rows printed in the console preview
    pub preview_rows: usize,
    /// Optional CSV export path
    pub csv_path: Option<String>,
    /// Optional JSON export path
    pub json_path: Option<String>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            preview_rows: 20,
            csv_path: None,
            json_path: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        BacktestParams::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.data.file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.file cannot be empty".to_string(),
            ));
        }

        if self.data.price_columns.is_empty() {
            return Err(ConfigError::ValidationError(
                "data.price_columns must name at least one column".to_string(),
            ));
        }

        if self.data.price_columns.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "data.price_columns cannot contain empty names".to_string(),
            ));
        }

        Ok(())
    }
}

// Conversion from Config to BacktestParams
impl From<&Config> for BacktestParams {
    fn from(config: &Config) -> Self {
        let b = &config.backtest;
        BacktestParams {
            initial_capital: b.initial_capital,
            buy_threshold: b.buy_threshold,
            sell_threshold: b.sell_threshold,
            trading_cost: b.trading_cost,
            capital_mode: b.capital_mode,
            validation: b.validation,
        }
    }
}
