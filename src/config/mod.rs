//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, DataSection, OutputSection, load_config, DATA_DIR_ENV,
};
