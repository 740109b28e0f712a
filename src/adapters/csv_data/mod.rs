//! CSV Price Source
//!
//! Serves named numeric columns from a CSV file with a header row. Header
//! names are trimmed so `" Close"` and `"Close"` address the same column.
//!
//! Blank cells follow the validation mode: permissive reads them as NaN (the
//! backtest then propagates it), strict rejects them as a parse error.
//! `columns()` applies the same rule, so every column reported as numeric
//! loads.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::PriceSeries;
use crate::ports::market_data::{ColumnInfo, MarketDataError, PriceSource};
use crate::strategy::ValidationMode;

/// Price source backed by a CSV file on disk
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
    validation: ValidationMode,
}

/// Parsed CSV contents: trimmed headers and raw rows
#[derive(Debug, Clone)]
struct CsvTable {
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            validation: ValidationMode::default(),
        }
    }

    /// Blank-cell handling; strict turns blanks into parse errors
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Resolve `file_name` inside `data_dir`
    pub fn in_dir(data_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(data_dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    async fn read_table(&self) -> Result<CsvTable, MarketDataError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(MarketDataError::FileNotFound(self.path.display().to_string()));
        }
        let bytes = tokio::fs::read(&self.path).await?;
        parse_table(&bytes)
    }
}

/// Parse one trimmed cell under `validation`
fn parse_cell(cell: &str, validation: ValidationMode) -> Result<f64, String> {
    if cell.is_empty() {
        return match validation {
            ValidationMode::Permissive => Ok(f64::NAN),
            ValidationMode::Strict => Err("empty cell".to_string()),
        };
    }
    cell.parse::<f64>().map_err(|e| format!("'{}': {}", cell, e))
}

fn parse_table(bytes: &[u8]) -> Result<CsvTable, MarketDataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

    Ok(CsvTable { headers, rows })
}

impl CsvTable {
    fn column_index(&self, column: &str) -> Result<usize, MarketDataError> {
        let wanted = column.trim();
        self.headers
            .iter()
            .position(|h| h == wanted)
            .ok_or_else(|| MarketDataError::ColumnNotFound {
                column: column.to_string(),
                available: self.headers.join(", "),
            })
    }

    fn extract(&self, column: &str, validation: ValidationMode) -> Result<Vec<f64>, MarketDataError> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let cell = record.get(idx).unwrap_or("").trim();
                parse_cell(cell, validation).map_err(|reason| MarketDataError::Parse {
                    // 1-based data row, header excluded
                    row: row + 1,
                    column: column.to_string(),
                    reason,
                })
            })
            .collect()
    }

    fn describe(&self, validation: ValidationMode) -> Vec<ColumnInfo> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                // A header-only column has no prices to load
                let numeric = !self.rows.is_empty()
                    && self.rows.iter().all(|record| {
                        let cell = record.get(idx).unwrap_or("").trim();
                        parse_cell(cell, validation).is_ok()
                    });
                ColumnInfo {
                    name: name.clone(),
                    numeric,
                }
            })
            .collect()
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    async fn columns(&self) -> Result<Vec<ColumnInfo>, MarketDataError> {
        Ok(self.read_table().await?.describe(self.validation))
    }

    async fn load_prices(&self, column: &str) -> Result<PriceSeries, MarketDataError> {
        let table = self.read_table().await?;
        let prices = table.extract(column, self.validation)?;
        tracing::debug!("Loaded {} prices from {}:{}", prices.len(), self.name(), column);
        Ok(PriceSeries::new(prices)?)
    }
}
