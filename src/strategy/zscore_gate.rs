//! Z-Score Gate
//!
//! Contrarian decision rule applied to the running Z-score:
//! - z < -buy_threshold  → Long (price stretched below its mean)
//! - z >  sell_threshold → Short (price stretched above its mean)
//! - otherwise           → Flat
//!
//! Both comparisons are strict, so a z-score sitting exactly on a threshold
//! stays flat. NaN never triggers.

use crate::domain::Position;
use crate::strategy::params::BacktestParams;

/// Result of z-score calculation for one price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreResult {
    /// Current z-score value
    pub z_score: f64,
    /// Running mean used in calculation
    pub mean: f64,
    /// Running standard deviation
    pub std_dev: f64,
    /// Current price
    pub current_price: f64,
}

impl ZScoreResult {
    /// Check if z-score indicates oversold (below negative threshold)
    pub fn is_oversold(&self, threshold: f64) -> bool {
        self.z_score < -threshold
    }

    /// Check if z-score indicates overbought (above positive threshold)
    pub fn is_overbought(&self, threshold: f64) -> bool {
        self.z_score > threshold
    }
}

/// Maps z-scores to positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreGate {
    buy_threshold: f64,
    sell_threshold: f64,
}

impl ZScoreGate {
    pub fn new(buy_threshold: f64, sell_threshold: f64) -> Self {
        Self {
            buy_threshold,
            sell_threshold,
        }
    }

    pub fn from_params(params: &BacktestParams) -> Self {
        Self::new(params.buy_threshold, params.sell_threshold)
    }

    /// Position to hold after observing `result`
    pub fn decide(&self, result: &ZScoreResult) -> Position {
        if result.is_oversold(self.buy_threshold) {
            Position::Long
        } else if result.is_overbought(self.sell_threshold) {
            Position::Short
        } else {
            Position::Flat
        }
    }

    pub fn buy_threshold(&self) -> f64 {
        self.buy_threshold
    }

    pub fn sell_threshold(&self) -> f64 {
        self.sell_threshold
    }
}

impl Default for ZScoreGate {
    fn default() -> Self {
        Self::from_params(&BacktestParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_z(z_score: f64) -> ZScoreResult {
        ZScoreResult {
            z_score,
            mean: 100.0,
            std_dev: 2.0,
            current_price: 100.0 + 2.0 * z_score,
        }
    }

    #[test]
    fn test_oversold_goes_long() {
        let gate = ZScoreGate::default();
        assert_eq!(gate.decide(&result_with_z(-1.5)), Position::Long);
    }

    #[test]
    fn test_overbought_goes_short() {
        let gate = ZScoreGate::default();
        assert_eq!(gate.decide(&result_with_z(1.5)), Position::Short);
    }

    #[test]
    fn test_neutral_is_flat() {
        let gate = ZScoreGate::default();
        assert_eq!(gate.decide(&result_with_z(0.3)), Position::Flat);
        assert_eq!(gate.decide(&result_with_z(-0.9)), Position::Flat);
    }

    #[test]
    fn test_threshold_ties_do_not_trigger() {
        let gate = ZScoreGate::new(1.0, 1.0);
        assert_eq!(gate.decide(&result_with_z(1.0)), Position::Flat);
        assert_eq!(gate.decide(&result_with_z(-1.0)), Position::Flat);
    }

    #[test]
    fn test_asymmetric_thresholds() {
        let gate = ZScoreGate::new(0.5, 2.0);
        assert_eq!(gate.decide(&result_with_z(-0.6)), Position::Long);
        assert_eq!(gate.decide(&result_with_z(1.9)), Position::Flat);
        assert_eq!(gate.decide(&result_with_z(2.1)), Position::Short);
    }

    #[test]
    fn test_nan_is_flat() {
        let gate = ZScoreGate::default();
        assert_eq!(gate.decide(&result_with_z(f64::NAN)), Position::Flat);
    }

    #[test]
    fn test_zscore_result_methods() {
        let result = ZScoreResult {
            z_score: -2.5,
            mean: 100.0,
            std_dev: 2.0,
            current_price: 95.0,
        };

        assert!(result.is_oversold(2.0));
        assert!(!result.is_overbought(2.0));
    }
}
