//! Price Series
//!
//! Ordered, chronological, non-empty sequence of prices fed to the backtester.

use serde::Serialize;

use crate::domain::error::BacktestError;

/// Immutable chronological price sequence (index 0 is the oldest price)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Create a series; fails when `prices` is empty.
    ///
    /// Non-finite values are accepted and propagate through the backtest.
    /// Use [`PriceSeries::new_strict`] to reject them up front.
    pub fn new(prices: Vec<f64>) -> Result<Self, BacktestError> {
        if prices.is_empty() {
            return Err(BacktestError::InvalidInput(
                "price series is empty".to_string(),
            ));
        }
        Ok(Self { prices })
    }

    /// Create a series rejecting NaN and infinite prices
    pub fn new_strict(prices: Vec<f64>) -> Result<Self, BacktestError> {
        let series = Self::new(prices)?;
        series.ensure_finite()?;
        Ok(series)
    }

    /// Fails with the index of the first non-finite price, if any
    pub fn ensure_finite(&self) -> Result<(), BacktestError> {
        ensure_finite(&self.prices)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    pub fn first(&self) -> f64 {
        self.prices[0]
    }

    pub fn last(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.prices
    }
}

impl TryFrom<Vec<f64>> for PriceSeries {
    type Error = BacktestError;

    fn try_from(prices: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(prices)
    }
}

impl AsRef<[f64]> for PriceSeries {
    fn as_ref(&self) -> &[f64] {
        &self.prices
    }
}

fn ensure_finite(prices: &[f64]) -> Result<(), BacktestError> {
    match prices.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(BacktestError::InvalidInput(format!(
            "non-finite price {} at index {}",
            prices[index], index
        ))),
        None => Ok(()),
    }
}
