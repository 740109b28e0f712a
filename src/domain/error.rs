use thiserror::Error;

/// Failures raised by the backtest core.
///
/// Numeric degeneracies (zero variance, NaN prices, extreme jumps) are not
/// errors; they flow through as computed values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
