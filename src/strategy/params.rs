//! Backtest Parameters
//!
//! Configuration structs for the streaming mean reversion backtest.
//! Defaults reproduce the reference run: capital 100, thresholds 1.0, no cost.

use serde::{Deserialize, Serialize};

/// How `initial_capital` relates to the compounded capital curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapitalMode {
    /// Compounding starts from 1.0; `initial_capital` is only reported as
    /// the first curve element. Matches the reference numbers exactly.
    #[default]
    SeedOnly,
    /// Compounding starts from `initial_capital`, so every curve element is
    /// in account units.
    Scaled,
}

/// Input checks applied before the fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Only an empty series is rejected; NaN/Inf (and blank CSV cells,
    /// read as NaN) propagate as values. A zero reference price makes the
    /// rest of the capital curve NaN.
    #[default]
    Permissive,
    /// Non-finite prices, blank CSV cells and a zero reference price are
    /// rejected with an error
    Strict,
}

/// Parameters of one backtest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestParams {
    /// Capital reported as the first element of the capital curve
    pub initial_capital: f64,
    /// Negative Z-score magnitude that triggers a long position
    pub buy_threshold: f64,
    /// Positive Z-score magnitude that triggers a short position
    pub sell_threshold: f64,
    /// Cost per unit of position change, in price units
    pub trading_cost: f64,
    pub capital_mode: CapitalMode,
    pub validation: ValidationMode,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            initial_capital: 100.0,
            buy_threshold: 1.0,
            sell_threshold: 1.0,
            trading_cost: 0.0,
            capital_mode: CapitalMode::SeedOnly,
            validation: ValidationMode::Permissive,
        }
    }
}

impl BacktestParams {
    /// Set both entry thresholds at once
    pub fn with_thresholds(mut self, buy: f64, sell: f64) -> Self {
        self.buy_threshold = buy;
        self.sell_threshold = sell;
        self
    }

    pub fn with_trading_cost(mut self, cost: f64) -> Self {
        self.trading_cost = cost;
        self
    }

    pub fn with_initial_capital(mut self, capital: f64) -> Self {
        self.initial_capital = capital;
        self
    }

    pub fn with_capital_mode(mut self, mode: CapitalMode) -> Self {
        self.capital_mode = mode;
        self
    }

    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }

    /// Internal capital the compounding starts from
    pub fn capital_seed(&self) -> f64 {
        match self.capital_mode {
            CapitalMode::SeedOnly => 1.0,
            CapitalMode::Scaled => self.initial_capital,
        }
    }

    /// Validate parameter ranges.
    ///
    /// Thresholds are magnitudes and must be non-negative; a negative buy
    /// threshold would go long on z-scores above the mean.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(ParamsError::InvalidInitialCapital(self.initial_capital));
        }
        if !self.buy_threshold.is_finite() || self.buy_threshold < 0.0 {
            return Err(ParamsError::InvalidBuyThreshold(self.buy_threshold));
        }
        if !self.sell_threshold.is_finite() || self.sell_threshold < 0.0 {
            return Err(ParamsError::InvalidSellThreshold(self.sell_threshold));
        }
        if !self.trading_cost.is_finite() || self.trading_cost < 0.0 {
            return Err(ParamsError::InvalidTradingCost(self.trading_cost));
        }
        Ok(())
    }
}

/// Parameter validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("Invalid initial capital: {0} (must be finite and > 0)")]
    InvalidInitialCapital(f64),
    #[error("Invalid buy threshold: {0} (must be finite and >= 0)")]
    InvalidBuyThreshold(f64),
    #[error("Invalid sell threshold: {0} (must be finite and >= 0)")]
    InvalidSellThreshold(f64),
    #[error("Invalid trading cost: {0} (must be finite and >= 0)")]
    InvalidTradingCost(f64),
}
