use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{BacktestError, PriceSeries};

/// Market data error type
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("Column '{column}' not found (available: {available})")]
    ColumnNotFound { column: String, available: String },

    #[error("Data parsing error at row {row}, column '{column}': {reason}")]
    Parse {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid price series: {0}")]
    InvalidSeries(#[from] BacktestError),
}

/// Description of one column in a tabular price source
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    /// True when every non-empty cell parses as a number
    pub numeric: bool,
}

/// Supplier of price series, one per named column
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Short label for logs (file name, symbol, ...)
    fn name(&self) -> String;

    /// List the columns this source can serve
    async fn columns(&self) -> Result<Vec<ColumnInfo>, MarketDataError>;

    /// Load one column as a chronological price series
    async fn load_prices(&self, column: &str) -> Result<PriceSeries, MarketDataError>;
}
