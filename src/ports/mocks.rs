use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;

use crate::domain::PriceSeries;
use crate::ports::market_data::{ColumnInfo, MarketDataError, PriceSource};

/// Mock price source that records calls and serves configured columns
#[derive(Debug, Default, Clone)]
pub struct MockPriceSource {
    calls: Arc<Mutex<Vec<String>>>,
    columns: Arc<Mutex<HashMap<String, Vec<f64>>>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to serve `prices` under `column`
    pub fn with_column(self, column: &str, prices: Vec<f64>) -> Self {
        self.columns.lock().unwrap().insert(column.to_string(), prices);
        self
    }

    /// Get all recorded load calls
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    fn name(&self) -> String {
        "mock".to_string()
    }

    async fn columns(&self) -> Result<Vec<ColumnInfo>, MarketDataError> {
        let mut names: Vec<String> = self.columns.lock().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names
            .into_iter()
            .map(|name| ColumnInfo { name, numeric: true })
            .collect())
    }

    async fn load_prices(&self, column: &str) -> Result<PriceSeries, MarketDataError> {
        self.calls.lock().unwrap().push(column.to_string());
        let columns = self.columns.lock().unwrap();
        match columns.get(column) {
            Some(prices) => Ok(PriceSeries::new(prices.clone())?),
            None => {
                let mut available: Vec<&str> = columns.keys().map(String::as_str).collect();
                available.sort();
                Err(MarketDataError::ColumnNotFound {
                    column: column.to_string(),
                    available: available.join(", "),
                })
            }
        }
    }
}
