//! Adapters Layer - External System Implementations
//!
//! - CSV: price columns from CSV files (implements `PriceSource`)
//! - Export: report writers (CSV, JSON)
//! - CLI: Command-line interface handlers

pub mod csv_data;
pub mod export;
pub mod cli;

pub use csv_data::CsvPriceSource;
pub use export::{write_report_csv, write_report_json, ExportError};
pub use cli::CliApp;
